//! Table-of-contents entries and their markdown rendering.
//!
//! Anchors are explicit `<a id>` targets written by the renderer, so the
//! entries link to the same `Name` / `Container.member` fragments the link
//! rewriter produces instead of GitHub heading slugs.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub anchor: String,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, anchor: impl Into<String>) -> Self {
        TocEntry {
            title: title.into(),
            anchor: anchor.into(),
            children: Vec::new(),
        }
    }
}

/// Generate a table-of-contents link.
pub fn render_toc_link(entry: &TocEntry) -> String {
    format!("[{}](#{})", entry.title, entry.anchor)
}

/// Render entries as a nested markdown list, two spaces per level.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let mut lines = Vec::new();
    for entry in entries {
        push_item(&mut lines, entry, 0);
    }
    lines.join("\n")
}

fn push_item(lines: &mut Vec<String>, entry: &TocEntry, depth: usize) {
    lines.push(format!("{}- {}", "  ".repeat(depth), render_toc_link(entry)));
    for child in &entry.children {
        push_item(lines, child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toc_link() {
        assert_eq!(render_toc_link(&TocEntry::new("func()", "func")), "[func()](#func)");
    }

    #[test]
    fn nested_toc() {
        let mut pair = TocEntry::new("Pair", "Pair");
        pair.children.push(TocEntry::new("Pair#add()", "Pair.add"));
        let entries = vec![pair, TocEntry::new("Rectangle", "Rectangle")];
        assert_eq!(
            render_toc(&entries),
            "- [Pair](#Pair)\n  - [Pair#add()](#Pair.add)\n- [Rectangle](#Rectangle)"
        );
    }

    #[test]
    fn empty_toc() {
        assert_eq!(render_toc(&[]), "");
    }
}
