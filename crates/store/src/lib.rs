//! The single owned source of truth for placed annotations.
//!
//! [`PlacementStore`] holds the annotations of the loaded document together
//! with the editor's active tool and any drag in progress. All mutations are
//! synchronous and last-write-wins.

mod defaults;
mod drag;
mod error;
mod keyboard;
mod store;
mod tool;

pub use defaults::PlacementDefaults;
pub use drag::DragSession;
pub use error::StoreError;
pub use keyboard::{NudgeDirection, NudgeStep, ResizeRequest};
pub use store::PlacementStore;
pub use tool::ActiveTool;
