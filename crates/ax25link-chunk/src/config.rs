use ax25link_frame::MAX_WIRE_LEN;
use serde::{Deserialize, Serialize};

/// How reassembly places chunk data in the output matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkOrdering {
    /// Place each chunk at `chunk_index * chunk_capacity` and require every
    /// index exactly once.
    #[default]
    ByIndex,
    /// Append chunks in container order. The container must already be in
    /// index order; reordering or loss goes undetected beyond a size check.
    Arrival,
}

/// Limits and reassembly policy for the chunk protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Maximum matrix rows.
    pub max_rows: u16,
    /// Maximum matrix columns.
    pub max_cols: u16,
    /// Safety ceiling for a container length prefix.
    pub max_frame_len: usize,
    /// Placement policy used by reassembly.
    pub ordering: ChunkOrdering,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_rows: 1024,
            max_cols: 1024,
            max_frame_len: MAX_WIRE_LEN,
            ordering: ChunkOrdering::ByIndex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_serializes_kebab_case() {
        let json = serde_json::to_string(&ChunkOrdering::ByIndex).unwrap();
        assert_eq!(json, "\"by-index\"");
        let parsed: ChunkConfig = serde_json::from_str(r#"{"ordering":"arrival"}"#).unwrap();
        assert_eq!(parsed.ordering, ChunkOrdering::Arrival);
        assert_eq!(parsed.max_rows, 1024);
    }
}
