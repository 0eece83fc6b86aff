pub mod engine;
pub mod input;
pub mod persist;
pub mod shortcuts;
pub mod store;
pub mod tools;

pub use engine::{Engine, SaveRequest};
pub use input::{InputEvent, OverlayBounds};
pub use persist::{Autosave, DEBOUNCE_MS, SaveStatus};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{AnnotationStore, StoreCommand};
pub use tools::{Tool, ToolContext, ToolKind};
