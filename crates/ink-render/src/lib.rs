pub mod display;
pub mod hit;
pub mod svg;

pub use display::{DisplayItem, HIGHLIGHT_ALPHA, NOTE_MARKER_RADIUS, Preview, build_display_list};
pub use hit::{HIT_TOLERANCE, hit_test, hit_test_all, note_at};
pub use svg::export_svg;
