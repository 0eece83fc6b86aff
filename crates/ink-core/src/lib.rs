pub mod geom;
pub mod id;
pub mod model;
pub mod path;

pub use geom::{Point, Rect};
pub use id::AnnotationId;
pub use model::*;
pub use path::{PathCmd, PathData, emit_path, parse_path};
