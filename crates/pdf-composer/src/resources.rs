use crate::error::ComposerError;
use crate::{find_inherited, resolve};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// An owned, editable copy of a page's effective `/Resources`.
///
/// Resources are frequently inherited from the page tree or shared between
/// pages through a reference. Editing a private copy and storing it directly
/// on the page keeps other pages untouched while preserving everything the
/// page's existing content relies on.
#[derive(Debug, Clone)]
pub struct PageResources {
    page_id: ObjectId,
    resources: Dictionary,
    fonts: Dictionary,
    xobjects: Dictionary,
}

impl PageResources {
    pub fn load(doc: &Document, page_id: ObjectId) -> Result<Self, ComposerError> {
        let mut resources = match find_inherited(doc, page_id, b"Resources")? {
            Some(Object::Dictionary(dict)) => dict.clone(),
            Some(other) => {
                log::warn!(
                    "Ignoring malformed /Resources on page {:?}: {:?}",
                    page_id,
                    other
                );
                Dictionary::new()
            }
            None => Dictionary::new(),
        };
        let fonts = take_sub_dict(doc, &mut resources, b"Font")?;
        let xobjects = take_sub_dict(doc, &mut resources, b"XObject")?;
        Ok(Self {
            page_id,
            resources,
            fonts,
            xobjects,
        })
    }

    /// Registers `font_id` and returns the name content streams should use.
    /// A font already present under some name keeps that name.
    pub fn add_font(&mut self, prefix: &str, font_id: ObjectId) -> String {
        register(&mut self.fonts, prefix, font_id)
    }

    pub fn add_xobject(&mut self, prefix: &str, xobject_id: ObjectId) -> String {
        register(&mut self.xobjects, prefix, xobject_id)
    }

    pub fn font_names(&self) -> impl Iterator<Item = String> + '_ {
        self.fonts
            .iter()
            .map(|(k, _)| String::from_utf8_lossy(k).into_owned())
    }

    /// Writes the edited dictionary onto the page itself.
    pub fn store(mut self, doc: &mut Document) -> Result<(), ComposerError> {
        if !self.fonts.is_empty() {
            self.resources.set("Font", Object::Dictionary(self.fonts));
        }
        if !self.xobjects.is_empty() {
            self.resources.set("XObject", Object::Dictionary(self.xobjects));
        }
        let page_dict = doc.get_object_mut(self.page_id)?.as_dict_mut()?;
        page_dict.set("Resources", Object::Dictionary(self.resources));
        Ok(())
    }
}

/// Removes `key` from `resources` and returns it as an owned dictionary,
/// following a reference if needed.
fn take_sub_dict(
    doc: &Document,
    resources: &mut Dictionary,
    key: &[u8],
) -> Result<Dictionary, ComposerError> {
    let Some(value) = resources.remove(key) else {
        return Ok(Dictionary::new());
    };
    match resolve(doc, &value)? {
        Object::Dictionary(dict) => Ok(dict.clone()),
        other => {
            log::warn!(
                "Replacing malformed /{} resource entry: {:?}",
                String::from_utf8_lossy(key),
                other
            );
            Ok(Dictionary::new())
        }
    }
}

fn register(dict: &mut Dictionary, prefix: &str, id: ObjectId) -> String {
    let existing = dict.iter().find_map(|(name, value)| match value {
        Object::Reference(r) if *r == id => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    });
    if let Some(name) = existing {
        return name;
    }

    let name = (1..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|candidate| !dict.has(candidate.as_bytes()))
        .unwrap_or_else(|| prefix.to_string());
    dict.set(name.as_bytes().to_vec(), Object::Reference(id));
    name
}
