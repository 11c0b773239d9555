//! Tag-stream reducer.
//!
//! The comment parser emits one record per tag line. Lines that carry no tag
//! type continue the text of the tag before them, so the stream is folded
//! with an explicit `{tags, current}` state instead of patching the previous
//! element in place.

use crate::error::{DocError, Result};
use crate::model::{Description, Tag};

#[derive(Default)]
struct TagFold {
    tags: Vec<Tag>,
    /// Index of the tag continuation lines attach to
    current: Option<usize>,
}

impl TagFold {
    fn push(mut self, tag: Tag, line: usize) -> Result<Self> {
        if tag.tag_type.is_some() {
            self.current = Some(self.tags.len());
            self.tags.push(tag);
            return Ok(self);
        }

        let index = self.current.ok_or(DocError::OrphanContinuation { line })?;
        continue_tag(&mut self.tags[index], tag.text());
        Ok(self)
    }
}

/// Append a continuation line to a tag's raw string and description.
fn continue_tag(tag: &mut Tag, text: &str) {
    if text.is_empty() {
        return;
    }
    // Without a split-off description the tag text is its raw string.
    let mut desc = tag.text().to_string();
    append_line(&mut desc, text);
    append_line(&mut tag.string, text);
    tag.description = Some(Description::Text(desc));
}

fn append_line(target: &mut String, text: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(text);
}

/// Fold a raw tag stream into complete tags.
///
/// `line` is the source line of the owning comment and only used for the error.
pub fn reduce(stream: Vec<Tag>, line: usize) -> Result<Vec<Tag>> {
    stream
        .into_iter()
        .try_fold(TagFold::default(), |fold, tag| fold.push(tag, line))
        .map(|fold| fold.tags)
}
