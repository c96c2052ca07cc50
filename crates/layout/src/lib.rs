//! Font metrics and text block layout shared by live measurement and export.
//!
//! Layout happens in a Y-down frame relative to the block's top-left corner.
//! Converting into a document's coordinate space is the exporter's job.

mod afm;
pub mod block;
pub mod encoding;
pub mod fonts;
pub mod metrics;
pub mod truetype;

pub use self::block::{
    BASELINE_RATIO, LineLayout, TextBlock, TextBlockParams, align_offset, layout_text_block,
    split_lines,
};
pub use self::encoding::encode_win_ansi;
pub use self::fonts::{FontKey, FontLibrary, LoadedFont, ResolvedFont};
pub use self::metrics::{FontMetrics, StandardFont};
pub use self::truetype::TrueTypeFont;
