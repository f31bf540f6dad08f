//! Wire format for the remote runs document.
//!
//! The data source is a single JSON document with a top-level `runs` array
//! of flat records. There is no record identifier; identity is the
//! (game, section, category) string triple.

use serde::{Deserialize, Serialize};

/// One flat run record as it appears in runs.json.
///
/// A record missing any required field fails deserialization of the whole
/// document, which is surfaced as a data-load error rather than a partial
/// tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub game: String,
    pub section: String,
    pub category: String,
    pub runner: String,
    pub time: String,
    /// Optional link to video proof. Absent in JSON maps to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

/// Top-level shape of the remote document.
#[derive(Debug, Clone, Deserialize)]
pub struct RunsDocument {
    pub runs: Vec<RunRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_video_deserializes() {
        let json = r#"{"game":"Foo","section":"Any%","category":"Main","runner":"X","time":"1:00"}"#;
        let record: RunRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.video, None);
    }

    #[test]
    fn test_record_missing_required_field_is_an_error() {
        let json = r#"{"section":"Any%","category":"Main","runner":"X","time":"1:00"}"#;
        assert!(serde_json::from_str::<RunRecord>(json).is_err());
    }

    #[test]
    fn test_document_parses_runs_array() {
        let json = r#"{"runs":[{"game":"Foo","section":"Any%","category":"Main","runner":"X","time":"1:00","video":"https://example.com/v"}]}"#;
        let doc: RunsDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.runs.len(), 1);
        assert_eq!(doc.runs[0].video.as_deref(), Some("https://example.com/v"));
    }
}
