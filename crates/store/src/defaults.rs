use overstamp_model::TextDefaults;
use overstamp_types::Size;
use serde::{Deserialize, Serialize};

/// Initial values for annotations placed by clicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementDefaults {
    #[serde(flatten)]
    pub text: TextDefaults,
    /// Size in display pixels of a freshly placed image.
    pub image_width: f32,
    pub image_height: f32,
}

impl Default for PlacementDefaults {
    fn default() -> Self {
        Self {
            text: TextDefaults::default(),
            image_width: 150.0,
            image_height: 75.0,
        }
    }
}

impl PlacementDefaults {
    pub fn image_size(&self) -> Size {
        Size::new(self.image_width, self.image_height)
    }
}
