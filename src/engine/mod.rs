//! Pure resolution over a loaded schema: which fields are visible, which
//! options each select offers, and how a single edit propagates through the
//! value set. No I/O, no suspension points; the caller re-runs these whenever
//! the schema or a value changes.

mod consistency;
mod options;
mod validate;
mod visibility;

pub use consistency::{merge_values, on_field_change};
pub use options::resolve_options;
pub use validate::validate_for_submission;
pub use visibility::is_visible;
