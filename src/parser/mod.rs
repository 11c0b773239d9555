//! Reads the comment lists produced by the external comment
//! parser and prepares them for the hierarchy builder.

pub mod tags;

use crate::error::{DocError, Result};
use crate::model::RawComment;
use crate::predicates::is_private;
use std::path::Path;

/// Parse a dox-style JSON comment list.
///
/// Tag streams are folded and the copyright header and private comments are
/// dropped, so the result can be handed to the hierarchy builder directly.
pub fn parse_comments(content: &str) -> Result<Vec<RawComment>> {
    let comments: Vec<RawComment> = serde_json::from_str(content)?;
    prepare(comments)
}

/// Parse a comment list file based on its extension.
pub fn parse_file(path: &Path, content: &str) -> Result<Vec<RawComment>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_comments(content),
        _ => Err(DocError::UnsupportedInput(path.to_path_buf())),
    }
}

/// Fold tag streams and drop comments that never make it into the docs.
pub fn prepare(comments: Vec<RawComment>) -> Result<Vec<RawComment>> {
    comments
        .into_iter()
        .filter(|comment| !is_copyright_header(comment) && !is_private(comment))
        .map(|mut comment| -> Result<RawComment> {
            comment.tags = tags::reduce(std::mem::take(&mut comment.tags), comment.line)?;
            Ok(comment)
        })
        .collect()
}

/// The license header at the top of a file: starts with "Copyright", on line 1.
fn is_copyright_header(comment: &RawComment) -> bool {
    comment.line == 1 && comment.description_text().starts_with("Copyright")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_copyright_and_private() {
        let json = r#"[
            {"description": "Copyright 2016 aixigo AG", "line": 1},
            {"description": "Copyright notice elsewhere", "line": 5},
            {"description": "hidden", "isPrivate": true, "line": 9},
            {"description": "ignored", "ignore": true, "line": 12},
            {"description": "kept", "line": 20}
        ]"#;
        let comments = parse_comments(json).unwrap();
        let descriptions: Vec<_> = comments.iter().map(|c| c.description_text()).collect();
        assert_eq!(descriptions, vec!["Copyright notice elsewhere", "kept"]);
    }

    #[test]
    fn rejects_orphan_continuation() {
        let json = r#"[{"line": 4, "tags": [{"string": "no tag before me"}]}]"#;
        let err = parse_comments(json).unwrap_err();
        assert!(matches!(err, DocError::OrphanContinuation { line: 4 }));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_file(Path::new("types.js"), "[]").unwrap_err();
        assert!(matches!(err, DocError::UnsupportedInput(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_comments("{"), Err(DocError::Json(_))));
    }
}
