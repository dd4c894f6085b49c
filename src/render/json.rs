//! JSON rendering for outline records.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::OutlineResult;

/// Indentation used for pretty output.
const INDENT: &[u8] = b"    ";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with 4-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline record to JSON.
///
/// Non-ASCII text is written as UTF-8, not escaped.
pub fn to_json(result: &OutlineResult, format: JsonFormat) -> Result<String> {
    let bytes = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
            result
                .serialize(&mut ser)
                .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
            buf
        }
        JsonFormat::Compact => serde_json::to_vec(result)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?,
    };

    String::from_utf8(bytes).map_err(|e| Error::Render(format!("JSON encoding error: {}", e)))
}
