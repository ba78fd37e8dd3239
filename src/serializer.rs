//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different on-disk format. The
//! engine never looks inside a record; it only hands values to this trait.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts single records to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// File extension (without the dot) used for records in this format.
    fn extension(&self) -> &str;

    /// Encode one record.
    fn serialize<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized;

    /// Decode one record.
    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned;
}

/// JSON serializer. Pretty output is tab-indented; both modes end the file
/// with a single newline.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    pretty: bool,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::pretty()
    }
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Pretty-printed JSON with tab indentation. This is the default.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Whether output is indented.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Serializer for JsonSerializer {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize<T>(&self, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let mut buf = Vec::with_capacity(128);
        let encoded = if self.pretty {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)
        } else {
            let mut ser = serde_json::Serializer::new(&mut buf);
            value.serialize(&mut ser)
        };
        encoded.map_err(|e| Error::Serialize(e.to_string()))?;
        buf.push(b'\n');
        Ok(buf)
    }

    fn deserialize<T>(&self, bytes: &[u8]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialize(e.to_string()))
    }
}
