//! Free-text transforms applied to descriptions.

use regex::Regex;
use std::sync::LazyLock;

static RE_SIMPLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@link[ ]*([^}]+)\}").unwrap());

static RE_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*-]").unwrap());

static RE_EMPTY_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Explicit line break understood inside markdown table cells.
pub const LINE_BREAK: &str = "<br>";

/// `{@link target}` → `[target](#target)`, without any symbol lookup.
pub fn placeholder_links(text: &str) -> String {
    RE_SIMPLE_LINK.replace_all(text, "[$1](#$1)").into_owned()
}

/// Flatten tag descriptions for table cells.
///
/// Lines are trimmed. A newline becomes [`LINE_BREAK`] when the next line
/// starts a list item or follows a blank line, otherwise a single space.
/// Apply once, at render time.
pub fn convert_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_empty = false;
    for (i, line) in text.split('\n').map(str::trim).enumerate() {
        if i > 0 {
            let forced = previous_empty || RE_LIST_ITEM.is_match(line);
            out.push_str(if forced { LINE_BREAK } else { " " });
        }
        out.push_str(line);
        previous_empty = line.is_empty();
    }
    out
}

/// Light transform for top-level descriptions: trailing whitespace per line
/// and surrounding blank lines go, structure stays.
pub fn tidy(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Collapse runs of blank lines and end with a single newline.
pub fn reduce_empty_lines(text: &str) -> String {
    let mut out = RE_EMPTY_LINES.replace_all(text, "\n\n").into_owned();
    while out.ends_with("\n\n") {
        out.pop();
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
