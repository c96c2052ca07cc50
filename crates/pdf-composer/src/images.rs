use crate::error::ComposerError;
use lopdf::{Document, ObjectId, Stream, dictionary};

/// Adds an 8-bit RGBA bitmap as a DeviceRGB image XObject. Transparency is
/// carried by a DeviceGray `/SMask`, omitted when every pixel is opaque.
pub fn add_rgba_image(
    doc: &mut Document,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<ObjectId, ComposerError> {
    let pixels = width as usize * height as usize;
    if rgba.len() != pixels * 4 || pixels == 0 {
        return Err(ComposerError::ImageDataLength {
            width,
            height,
            expected: pixels * 4,
            actual: rgba.len(),
        });
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
        alpha.push(pixel[3]);
    }

    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    if alpha.iter().any(|a| *a != u8::MAX) {
        let smask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha,
        ));
        image_dict.set("SMask", smask_id);
    }

    Ok(doc.add_object(Stream::new(image_dict, rgb)))
}
