//! PDF page utilities for stamping new content onto an existing document.
//!
//! This crate provides low-level PDF manipulation using lopdf:
//! - Content overlaying that isolates the new content from the page's own
//!   graphics state
//! - Page geometry and inherited page attributes
//! - Per-page resource dictionaries with collision-free names
//! - Font (standard and embedded TrueType) and image XObject creation

mod error;
mod fonts;
mod images;
mod resources;

pub use error::ComposerError;
pub use fonts::{TrueTypeProgram, add_standard_font, add_truetype_font};
pub use images::add_rgba_image;
pub use resources::PageResources;

use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// Guards against `/Parent` cycles in malformed page trees.
const MAX_TREE_DEPTH: usize = 64;

/// Looks up an inheritable page attribute (`/Resources`, `/MediaBox`, ...)
/// on the page or the nearest ancestor that defines it. References are
/// resolved.
pub fn find_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, ComposerError> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let Some(id) = current else {
            return Ok(None);
        };
        let dict = doc.get_object(id)?.as_dict()?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve(doc, value)?));
        }
        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
    }
    Err(ComposerError::Other(format!(
        "page tree above {:?} is deeper than {} levels",
        page_id, MAX_TREE_DEPTH
    )))
}

/// Follows a reference to the object it points at.
pub fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, ComposerError> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Width and height of a page's MediaBox, in points.
pub fn page_dimensions(doc: &Document, page_id: ObjectId) -> Result<(f32, f32), ComposerError> {
    let [x0, y0, x1, y1] = media_box(doc, page_id)?;
    Ok((x1 - x0, y1 - y0))
}

/// Lower-left corner of a page's MediaBox. Usually `(0, 0)`.
pub fn page_origin(doc: &Document, page_id: ObjectId) -> Result<(f32, f32), ComposerError> {
    let [x0, y0, _, _] = media_box(doc, page_id)?;
    Ok((x0, y0))
}

/// The MediaBox as `[llx, lly, urx, ury]`, corners normalized.
fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f32; 4], ComposerError> {
    let media_box = find_inherited(doc, page_id, b"MediaBox")?
        .ok_or(ComposerError::MissingMediaBox(page_id))?;
    let values = media_box
        .as_array()?
        .iter()
        .map(|o| number(resolve(doc, o).ok()?))
        .collect::<Option<Vec<f32>>>()
        .filter(|v| v.len() == 4)
        .ok_or(ComposerError::MissingMediaBox(page_id))?;
    let corners = [
        values[0].min(values[2]),
        values[1].min(values[3]),
        values[0].max(values[2]),
        values[1].max(values[3]),
    ];
    if corners[2] - corners[0] == 0.0 || corners[3] - corners[1] == 0.0 {
        return Err(ComposerError::MissingMediaBox(page_id));
    }
    Ok(corners)
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

/// Adds a new content stream to an existing page, drawn on top of it.
///
/// The page's existing streams are bracketed by `q`/`Q` so that whatever
/// transformation or color state they leave behind is undone before
/// `content` runs; `content` itself runs inside its own `q`/`Q` pair. A page
/// without `/Contents` simply gets the new stream.
pub fn overlay_content(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> Result<(), ComposerError> {
    let existing = {
        let page_dict = doc.get_object(page_id)?.as_dict()?;
        match page_dict.get(b"Contents") {
            Err(_) => Vec::new(),
            Ok(Object::Array(items)) => items.clone(),
            Ok(Object::Reference(id)) => match doc.get_object(*id)? {
                Object::Array(items) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(other) => {
                return Err(ComposerError::Other(format!(
                    "Page {:?} has an unexpected /Contents object: {:?}",
                    page_id, other
                )));
            }
        }
    };

    let mut overlay = Vec::with_capacity(content.len() + 8);
    let mut contents = Vec::with_capacity(existing.len() + 2);
    if existing.is_empty() {
        overlay.extend_from_slice(b"q\n");
    } else {
        let save_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        // The last existing stream may end without whitespace.
        overlay.extend_from_slice(b"\nQ\nq\n");
    }
    overlay.extend_from_slice(&content);
    overlay.extend_from_slice(b"\nQ\n");

    let overlay_id = doc.add_object(Stream::new(dictionary! {}, overlay));
    contents.push(Object::Reference(overlay_id));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page_dict.set("Contents", Object::Array(contents));
    log::debug!("Overlaid content stream {:?} on page {:?}", overlay_id, page_id);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

    /// A document with `num_pages` Letter pages, each showing "<prefix> N" in
    /// Helvetica registered as `/F1`. MediaBox and Resources live on the
    /// page tree root and are inherited.
    pub fn create_dummy_pdf(num_pages: u32, text_prefix: &str) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids = vec![];
        for i in 1..=num_pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{} {}", text_prefix, i).into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id.into());
        }

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => num_pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
        };
        doc.objects.insert(pages_id, pages_dict.into());

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    pub fn first_page(doc: &Document) -> ObjectId {
        *doc.get_pages().get(&1).unwrap()
    }
}
