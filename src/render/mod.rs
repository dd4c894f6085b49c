//! Rendering of outline records.

mod json;

pub use json::{to_json, JsonFormat};
