use crate::defaults::PlacementDefaults;
use crate::drag::DragSession;
use crate::error::StoreError;
use crate::keyboard::{NudgeDirection, NudgeStep, ResizeRequest, nudged};
use crate::tool::ActiveTool;
use overstamp_model::limits::{IMAGE_DIMENSION_MAX, IMAGE_DIMENSION_MIN};
use overstamp_model::{
    Annotation, AnnotationKind, AnnotationPatch, ImagePatch, NewImage, NewText,
};
use overstamp_types::{
    AnnotationId, ClientPoint, NormalizedPoint, ResourceUri, Size, SurfaceRect, clamp_within,
    normalize,
};

/// Annotations of the loaded document plus the editor's interaction state.
#[derive(Debug, Default)]
pub struct PlacementStore {
    items: Vec<Annotation>,
    tool: ActiveTool,
    drag: Option<DragSession>,
    page_count: Option<u32>,
    defaults: PlacementDefaults,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: PlacementDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &PlacementDefaults {
        &self.defaults
    }

    /// Page count of the decoded document, used to validate new placements.
    /// `None` while no document is loaded; only `page >= 1` is checked then.
    pub fn set_page_count(&mut self, page_count: Option<u32>) {
        self.page_count = page_count;
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    // Tool state

    pub fn active_tool(&self) -> &ActiveTool {
        &self.tool
    }

    pub fn start_text_placement(&mut self) {
        self.tool = ActiveTool::Text;
    }

    pub fn start_image_placement(&mut self, image: impl Into<ResourceUri>) {
        self.tool = ActiveTool::Image(image.into());
    }

    pub fn stop_tool(&mut self) {
        self.tool = ActiveTool::None;
    }

    // Queries

    pub fn annotations(&self) -> &[Annotation] {
        &self.items
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.items.iter().find(|a| a.id() == id)
    }

    /// Annotations targeting `page`, in insertion order.
    pub fn annotations_on_page(&self, page: u32) -> impl Iterator<Item = &Annotation> {
        self.items.iter().filter(move |a| a.page() == page)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // Creation

    pub fn add_text(&mut self, fields: NewText) -> Result<AnnotationId, StoreError> {
        self.check_page(fields.page)?;
        let annotation = Annotation::Text(fields.into_annotation(&self.defaults.text));
        Ok(self.insert(annotation))
    }

    pub fn add_image(&mut self, fields: NewImage) -> Result<AnnotationId, StoreError> {
        self.check_page(fields.page)?;
        let annotation = Annotation::Image(fields.into_annotation());
        Ok(self.insert(annotation))
    }

    /// A click on a page surface while a tool is active.
    ///
    /// With the text tool, `text` is what the user entered; an empty or
    /// missing entry places nothing. The tool stops after any attempt. With
    /// no tool, or when the page has no rendered surface yet (the document is
    /// still loading), the click is ignored.
    pub fn place_at(
        &mut self,
        page: u32,
        pointer: ClientPoint,
        surface: Option<SurfaceRect>,
        text: Option<String>,
    ) -> Result<Option<AnnotationId>, StoreError> {
        let Some(surface) = surface else {
            log::debug!("Ignoring click on page {} without a rendered surface", page);
            return Ok(None);
        };
        let position = normalize(pointer, surface);
        let display = Size::new(surface.width, surface.height);

        let placed = match std::mem::take(&mut self.tool) {
            ActiveTool::None => return Ok(None),
            ActiveTool::Text => match text.filter(|t| !t.is_empty()) {
                Some(text) => Some(self.add_text(NewText::new(page, position, display, text))?),
                None => None,
            },
            ActiveTool::Image(image_src) => {
                let size = self.defaults.image_size();
                Some(self.add_image(NewImage::new(page, position, display, image_src, size))?)
            }
        };
        Ok(placed)
    }

    fn check_page(&self, page: u32) -> Result<(), StoreError> {
        let page_count = self.page_count.unwrap_or(u32::MAX);
        if page == 0 || page > page_count {
            return Err(StoreError::PageOutOfRange { page, page_count });
        }
        Ok(())
    }

    fn insert(&mut self, annotation: Annotation) -> AnnotationId {
        let id = annotation.id();
        log::debug!(
            "Placed {} annotation {} on page {} at ({:.3}, {:.3})",
            annotation.kind(),
            id,
            annotation.page(),
            annotation.placement().x(),
            annotation.placement().y()
        );
        self.items.push(annotation);
        id
    }

    fn get_mut(&mut self, id: AnnotationId) -> Result<&mut Annotation, StoreError> {
        self.items
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or(StoreError::NotFound(id))
    }

    // Mutation

    pub fn update_annotation(
        &mut self,
        id: AnnotationId,
        patch: impl Into<AnnotationPatch>,
    ) -> Result<(), StoreError> {
        let patch = patch.into();
        let annotation = self.get_mut(id)?;
        annotation
            .apply(&patch)
            .map_err(|_| StoreError::VariantMismatch {
                id,
                actual: annotation.kind(),
                requested: patch.kind().unwrap_or(annotation.kind()),
            })
    }

    pub fn move_annotation(&mut self, id: AnnotationId, point: NormalizedPoint) -> Result<(), StoreError> {
        self.get_mut(id)?.move_to(point);
        Ok(())
    }

    /// Duplicates an annotation with a fresh id, offset by 0.02 on both axes
    /// (capped at 0.98). Returns `None` for an unknown id.
    pub fn clone_annotation(&mut self, id: AnnotationId) -> Option<AnnotationId> {
        let copy = self.get(id)?.duplicate();
        Some(self.insert(copy))
    }

    pub fn remove_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.items.iter().position(|a| a.id() == id)?;
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        Some(self.items.remove(index))
    }

    /// Removes every annotation and resets the tool and any drag.
    pub fn clear_all(&mut self) {
        self.items.clear();
        self.tool = ActiveTool::None;
        self.drag = None;
    }

    /// Feeds back the box a text annotation rendered at. Returns whether the
    /// stored measurement changed.
    pub fn record_measurement(&mut self, id: AnnotationId, size: Size) -> Result<bool, StoreError> {
        match self.get_mut(id)? {
            Annotation::Text(text) => Ok(text.record_measurement(size)),
            Annotation::Image(_) => Err(StoreError::VariantMismatch {
                id,
                actual: AnnotationKind::Image,
                requested: AnnotationKind::Text,
            }),
        }
    }

    /// Keyboard move by one (or ten) pixels of the page's current surface.
    pub fn nudge(
        &mut self,
        id: AnnotationId,
        direction: NudgeDirection,
        step: NudgeStep,
        surface: SurfaceRect,
    ) -> Result<NormalizedPoint, StoreError> {
        let annotation = self.get_mut(id)?;
        let target = nudged(annotation.placement().position(), direction, step, surface);
        annotation.move_to(target);
        Ok(target)
    }

    /// Sets one image dimension; with `lock_aspect` the other follows the
    /// current aspect ratio. Both end up within `[20, 1000]`.
    pub fn resize_image(
        &mut self,
        id: AnnotationId,
        request: ResizeRequest,
        lock_aspect: bool,
    ) -> Result<(), StoreError> {
        let ratio = match self.get(id) {
            Some(Annotation::Image(image)) => image.aspect_ratio(),
            Some(Annotation::Text(_)) => {
                return Err(StoreError::VariantMismatch {
                    id,
                    actual: AnnotationKind::Text,
                    requested: AnnotationKind::Image,
                });
            }
            None => return Err(StoreError::NotFound(id)),
        };

        let patch = match (request, lock_aspect) {
            (ResizeRequest::Width(width), true) => {
                let width = locked_dimension(width, ratio);
                ImagePatch {
                    width: Some(width),
                    height: Some(width / ratio),
                    ..ImagePatch::default()
                }
            }
            (ResizeRequest::Height(height), true) => {
                let height = locked_dimension(height, 1.0 / ratio);
                ImagePatch {
                    width: Some(height * ratio),
                    height: Some(height),
                    ..ImagePatch::default()
                }
            }
            (ResizeRequest::Width(width), false) => ImagePatch {
                width: Some(width),
                ..ImagePatch::default()
            },
            (ResizeRequest::Height(height), false) => ImagePatch {
                height: Some(height),
                ..ImagePatch::default()
            },
        };
        self.update_annotation(id, patch)
    }

    // Dragging

    pub fn begin_drag(&mut self, id: AnnotationId, page: u32) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        self.drag = Some(DragSession { id, page });
        Ok(())
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag
    }

    /// A pointer move over `page`. The position is recomputed against the
    /// surface as it is now, not as it was when the drag began. Moves over
    /// any other page are ignored.
    pub fn drag_to(
        &mut self,
        page: u32,
        pointer: ClientPoint,
        surface: SurfaceRect,
    ) -> Option<NormalizedPoint> {
        let session = self.drag?;
        if session.page != page {
            return None;
        }
        let target = normalize(pointer, surface);
        match self.get_mut(session.id) {
            Ok(annotation) => {
                annotation.move_to(target);
                Some(target)
            }
            Err(_) => {
                self.drag = None;
                None
            }
        }
    }

    pub fn end_drag(&mut self) -> Option<AnnotationId> {
        self.drag.take().map(|d| d.id)
    }
}

/// Clamps a requested side so that it and the side derived from it
/// (`requested / ratio`) both stay within the image limits. Ratios too
/// extreme for both to fit favour the requested side.
fn locked_dimension(requested: f32, ratio: f32) -> f32 {
    let low = IMAGE_DIMENSION_MIN.max(IMAGE_DIMENSION_MIN * ratio);
    let high = IMAGE_DIMENSION_MAX.min(IMAGE_DIMENSION_MAX * ratio);
    if low > high {
        return clamp_within(requested, IMAGE_DIMENSION_MIN, IMAGE_DIMENSION_MAX);
    }
    clamp_within(requested, low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use overstamp_model::{TextAlign, TextPatch};
    use overstamp_types::Color;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn display() -> Size {
        Size::new(800.0, 1035.0)
    }

    fn store_with_text(x: f32, y: f32) -> (PlacementStore, AnnotationId) {
        init_logger();
        let mut store = PlacementStore::new();
        store.set_page_count(Some(3));
        let id = store
            .add_text(NewText::new(1, NormalizedPoint::new(x, y), display(), "Firma"))
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_tool_state_machine() {
        let mut store = PlacementStore::new();
        assert_eq!(store.active_tool(), &ActiveTool::None);
        store.start_text_placement();
        assert_eq!(store.active_tool(), &ActiveTool::Text);
        store.start_image_placement("/signatures/a.png");
        assert_eq!(store.active_tool(), &ActiveTool::Image("/signatures/a.png".into()));
        store.stop_tool();
        assert!(!store.active_tool().is_active());
    }

    #[test]
    fn test_add_text_applies_defaults() {
        let (store, id) = store_with_text(0.1, 0.1);
        let text = store.get(id).unwrap().as_text().unwrap();
        assert_eq!(text.color(), Color::INK);
        assert_eq!(text.font_size(), 14.0);
        assert_eq!(text.font_family().as_str(), "Inter, system-ui, sans-serif");
    }

    #[test]
    fn test_add_rejects_pages_outside_document() {
        let (mut store, _) = store_with_text(0.1, 0.1);
        let err = store
            .add_text(NewText::new(4, NormalizedPoint::new(0.1, 0.1), display(), "x"))
            .unwrap_err();
        assert_eq!(err, StoreError::PageOutOfRange { page: 4, page_count: 3 });
        assert!(store
            .add_text(NewText::new(0, NormalizedPoint::new(0.1, 0.1), display(), "x"))
            .is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clone_offsets_by_two_percent() {
        let (mut store, id) = store_with_text(0.5, 0.5);
        let copy_id = store.clone_annotation(id).unwrap();
        assert_ne!(copy_id, id);

        let original = store.get(id).unwrap().clone();
        let copy = store.get(copy_id).unwrap();
        assert!((copy.placement().x() - 0.52).abs() < 1e-6);
        assert!((copy.placement().y() - 0.52).abs() < 1e-6);
        assert_eq!(copy.as_text().unwrap().text(), original.as_text().unwrap().text());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_clone_near_edge_never_exceeds_limit() {
        let (mut store, id) = store_with_text(0.99, 0.99);
        let copy_id = store.clone_annotation(id).unwrap();
        let copy = store.get(copy_id).unwrap();
        assert!((copy.placement().x() - 0.98).abs() < 1e-6);
        assert!(copy.placement().y() <= 0.98);
    }

    #[test]
    fn test_clone_unknown_id() {
        let (mut store, _) = store_with_text(0.5, 0.5);
        assert_eq!(store.clone_annotation(AnnotationId::new()), None);
    }

    #[test]
    fn test_update_and_move_preserve_id() {
        let (mut store, id) = store_with_text(0.5, 0.5);
        store
            .update_annotation(
                id,
                TextPatch {
                    text_align: Some(TextAlign::Right),
                    ..TextPatch::text("Otra")
                },
            )
            .unwrap();
        store.move_annotation(id, NormalizedPoint { x: 2.0, y: 0.25 }).unwrap();

        let annotation = store.get(id).unwrap();
        assert_eq!(annotation.id(), id);
        assert_eq!(annotation.as_text().unwrap().text(), "Otra");
        assert_eq!(annotation.placement().x(), 1.0);
        assert_eq!(annotation.placement().y(), 0.25);
    }

    #[test]
    fn test_update_with_wrong_variant() {
        let (mut store, id) = store_with_text(0.5, 0.5);
        let err = store
            .update_annotation(id, ImagePatch { width: Some(50.0), ..ImagePatch::default() })
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::VariantMismatch {
                id,
                actual: AnnotationKind::Text,
                requested: AnnotationKind::Image
            }
        );
        assert!(matches!(
            store.update_annotation(AnnotationId::new(), TextPatch::text("x")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut store, id) = store_with_text(0.5, 0.5);
        store.start_text_placement();
        let other = store.clone_annotation(id).unwrap();

        assert!(store.remove_annotation(id).is_some());
        assert!(store.remove_annotation(id).is_none());
        assert!(store.get(other).is_some());

        store.clear_all();
        assert!(store.is_empty());
        assert_eq!(store.active_tool(), &ActiveTool::None);
    }

    #[test]
    fn test_place_text_with_active_tool() {
        let mut store = PlacementStore::new();
        store.set_page_count(Some(2));
        store.start_text_placement();
        let surface = SurfaceRect::new(100.0, 50.0, 800.0, 1000.0);

        let id = store
            .place_at(2, ClientPoint::new(500.0, 300.0), Some(surface), Some("Hola".into()))
            .unwrap()
            .unwrap();
        let annotation = store.get(id).unwrap();
        assert_eq!(annotation.page(), 2);
        assert!((annotation.placement().x() - 0.5).abs() < 1e-6);
        assert!((annotation.placement().y() - 0.25).abs() < 1e-6);
        assert_eq!(annotation.placement().display_size(), Size::new(800.0, 1000.0));
        assert_eq!(store.active_tool(), &ActiveTool::None);
    }

    #[test]
    fn test_place_with_empty_text_stops_tool() {
        let mut store = PlacementStore::new();
        store.start_text_placement();
        let placed = store
            .place_at(1, ClientPoint::new(1.0, 1.0), Some(SurfaceRect::sized(10.0, 10.0)), Some(String::new()))
            .unwrap();
        assert_eq!(placed, None);
        assert!(store.is_empty());
        assert_eq!(store.active_tool(), &ActiveTool::None);
    }

    #[test]
    fn test_click_without_surface_or_tool_is_ignored() {
        let mut store = PlacementStore::new();
        store.start_text_placement();
        let placed = store
            .place_at(1, ClientPoint::new(1.0, 1.0), None, Some("x".into()))
            .unwrap();
        assert_eq!(placed, None);
        // Still armed for the click that lands once the page is rendered.
        assert_eq!(store.active_tool(), &ActiveTool::Text);

        store.stop_tool();
        let placed = store
            .place_at(1, ClientPoint::new(1.0, 1.0), Some(SurfaceRect::sized(10.0, 10.0)), Some("x".into()))
            .unwrap();
        assert_eq!(placed, None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_place_image_uses_default_size() {
        let mut store = PlacementStore::new();
        store.start_image_placement("/signatures/firma.png");
        let id = store
            .place_at(1, ClientPoint::new(0.0, 0.0), Some(SurfaceRect::sized(600.0, 800.0)), None)
            .unwrap()
            .unwrap();
        let image = store.get(id).unwrap().as_image().unwrap();
        assert_eq!(image.image_src().as_str(), "/signatures/firma.png");
        assert_eq!((image.width(), image.height()), (150.0, 75.0));
        assert!(!store.active_tool().is_active());
    }

    #[test]
    fn test_drag_uses_current_surface_and_start_page() {
        let (mut store, id) = store_with_text(0.1, 0.1);
        store.begin_drag(id, 1).unwrap();

        let before_reflow = SurfaceRect::new(0.0, 0.0, 800.0, 1000.0);
        let moved = store.drag_to(1, ClientPoint::new(400.0, 500.0), before_reflow).unwrap();
        assert_eq!(moved, NormalizedPoint { x: 0.5, y: 0.5 });

        // The surface shrank; the same pointer now maps further right.
        let after_reflow = SurfaceRect::new(0.0, 0.0, 500.0, 1000.0);
        let moved = store.drag_to(1, ClientPoint::new(400.0, 500.0), after_reflow).unwrap();
        assert!((moved.x - 0.8).abs() < 1e-6);

        assert_eq!(store.drag_to(2, ClientPoint::new(0.0, 0.0), after_reflow), None);
        assert!((store.get(id).unwrap().placement().x() - 0.8).abs() < 1e-6);

        assert_eq!(store.end_drag(), Some(id));
        assert_eq!(store.drag_to(1, ClientPoint::new(0.0, 0.0), after_reflow), None);
    }

    #[test]
    fn test_begin_drag_unknown_id() {
        let mut store = PlacementStore::new();
        assert!(store.begin_drag(AnnotationId::new(), 1).is_err());
        assert_eq!(store.drag_session(), None);
    }

    #[test]
    fn test_record_measurement_only_for_text() {
        let (mut store, id) = store_with_text(0.5, 0.5);
        assert!(store.record_measurement(id, Size::new(60.0, 18.0)).unwrap());
        assert!(!store.record_measurement(id, Size::new(60.2, 18.0)).unwrap());

        let image = store
            .add_image(NewImage::new(1, NormalizedPoint::new(0.1, 0.1), display(), "a.png", Size::new(100.0, 50.0)))
            .unwrap();
        assert!(matches!(
            store.record_measurement(image, Size::new(1.0, 1.0)),
            Err(StoreError::VariantMismatch { .. })
        ));
    }

    #[test]
    fn test_nudge_moves_by_surface_pixels() {
        let (mut store, id) = store_with_text(0.5, 0.5);
        let surface = SurfaceRect::sized(1000.0, 500.0);
        let p = store.nudge(id, NudgeDirection::Right, NudgeStep::Coarse, surface).unwrap();
        assert!((p.x - 0.51).abs() < 1e-6);
        let p = store.nudge(id, NudgeDirection::Down, NudgeStep::Fine, surface).unwrap();
        assert!((p.y - 0.502).abs() < 1e-6);
    }

    #[test]
    fn test_resize_image_with_and_without_lock() {
        let mut store = PlacementStore::new();
        let id = store
            .add_image(NewImage::new(1, NormalizedPoint::new(0.1, 0.1), display(), "a.png", Size::new(200.0, 100.0)))
            .unwrap();

        store.resize_image(id, ResizeRequest::Width(300.0), true).unwrap();
        let image = store.get(id).unwrap().as_image().unwrap();
        assert_eq!((image.width(), image.height()), (300.0, 150.0));

        store.resize_image(id, ResizeRequest::Height(40.0), false).unwrap();
        let image = store.get(id).unwrap().as_image().unwrap();
        assert_eq!((image.width(), image.height()), (300.0, 40.0));

        store.resize_image(id, ResizeRequest::Width(5000.0), false).unwrap();
        assert_eq!(store.get(id).unwrap().as_image().unwrap().width(), 1000.0);
    }

    #[test]
    fn test_locked_resize_keeps_ratio_at_the_limits() {
        let mut store = PlacementStore::new();
        let id = store
            .add_image(NewImage::new(1, NormalizedPoint::new(0.1, 0.1), display(), "a.png", Size::new(200.0, 100.0)))
            .unwrap();
        let size = |store: &PlacementStore| {
            let image = store.get(id).unwrap().as_image().unwrap();
            (image.width(), image.height())
        };

        store.resize_image(id, ResizeRequest::Width(30.0), true).unwrap();
        assert_eq!(size(&store), (40.0, 20.0));

        store.resize_image(id, ResizeRequest::Width(1000.0), true).unwrap();
        assert_eq!(size(&store), (1000.0, 500.0));

        store.resize_image(id, ResizeRequest::Height(900.0), true).unwrap();
        assert_eq!(size(&store), (1000.0, 500.0));

        store.resize_image(id, ResizeRequest::Height(10.0), true).unwrap();
        assert_eq!(size(&store), (40.0, 20.0));
    }

    #[test]
    fn test_annotations_on_page() {
        let (mut store, first) = store_with_text(0.1, 0.1);
        store
            .add_text(NewText::new(2, NormalizedPoint::new(0.1, 0.1), display(), "p2"))
            .unwrap();
        let third = store.clone_annotation(first).unwrap();

        let on_first: Vec<_> = store.annotations_on_page(1).map(|a| a.id()).collect();
        assert_eq!(on_first, vec![first, third]);
        assert_eq!(store.annotations_on_page(3).count(), 0);
    }
}
