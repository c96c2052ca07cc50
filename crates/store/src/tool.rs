use overstamp_types::ResourceUri;

/// What a click on a page surface does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveTool {
    #[default]
    None,
    /// The next click places a text annotation.
    Text,
    /// The next click places this image.
    Image(ResourceUri),
}

impl ActiveTool {
    pub fn is_active(&self) -> bool {
        !matches!(self, ActiveTool::None)
    }
}
