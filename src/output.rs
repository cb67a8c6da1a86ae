//! JSON output types for CLI responses.
//!
//! The CLI always prints exactly one JSON object and exits 0; the
//! `success` field carries the outcome. These shapes are the agent
//! contract and must stay stable:
//!
//! ```json
//! {"success": true, "editedFiles": [{"filename": "pkg.mod", "location": 0}]}
//! {"success": false, "errorMsg": "...", "trace": "..."}
//! ```

use serde::Serialize;

use crate::error::MoveError;

/// One module edited by a motion.
#[derive(Debug, Clone, Serialize)]
pub struct EditedFile {
    /// Dotted module name.
    pub filename: String,
    /// Reserved; always 0.
    pub location: u32,
}

/// Success payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSuccess {
    pub success: bool,
    pub edited_files: Vec<EditedFile>,
}

impl MoveSuccess {
    pub fn new(edited: Vec<String>) -> Self {
        Self {
            success: true,
            edited_files: edited
                .into_iter()
                .map(|filename| EditedFile {
                    filename,
                    location: 0,
                })
                .collect(),
        }
    }
}

/// Failure payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFailure {
    pub success: bool,
    pub error_msg: String,
    pub trace: String,
}

impl From<&MoveError> for MoveFailure {
    fn from(err: &MoveError) -> Self {
        Self {
            success: false,
            error_msg: err.to_string(),
            trace: err.trace(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let report = MoveSuccess::new(vec!["mod1".to_owned(), "pkg.mod2".to_owned()]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["editedFiles"][0]["filename"], "mod1");
        assert_eq!(json["editedFiles"][0]["location"], 0);
        assert_eq!(json["editedFiles"][1]["filename"], "pkg.mod2");
    }

    #[test]
    fn failure_shape() {
        let err = MoveError::SymbolNotFound { line: 3, col: 7 };
        let json = serde_json::to_value(MoveFailure::from(&err)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errorMsg"], "no symbol found at L3 C7");
        assert!(json["trace"].as_str().unwrap().contains("L3 C7"));
    }
}
