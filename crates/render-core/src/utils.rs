/// Convert a Y-down coordinate measured from the page top into the Y-up
/// output frame.
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

/// Bottom edge, in the Y-up frame, of a box whose top edge sits `top` below
/// the page top.
pub fn box_bottom(top: f32, height: f32, page_height: f32) -> f32 {
    flip_y(top, page_height) - height
}
