//! Per-file transformers bound to the file's module and the completed symbol
//! index: `{@link}` rewriting and type rendering.

use crate::index::SymbolIndex;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::LazyLock;

/// Link target used when a referenced module is not documented anywhere.
pub const UNKNOWN_TARGET: &str = "unknown";

// {@link[plain] [Module][#Local[.Property]][()] [Title]}
static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\{@link(plain)?\b\s*",
        r"([^\s#(){}]+)?",
        r"(?:#([^\s.(){}]+)(?:\.([^\s(){}]+))?)?",
        r"(\(\))?",
        r"(?:\s+([^}]*?))?\s*\}"
    ))
    .unwrap()
});

/// One parsed `{@link}` reference.
struct LinkRef<'t> {
    plain: bool,
    module: Option<&'t str>,
    local: Option<&'t str>,
    property: Option<&'t str>,
    callable: bool,
    title: Option<&'t str>,
}

impl<'t> LinkRef<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).filter(|s| !s.is_empty());
        LinkRef {
            plain: caps.get(1).is_some(),
            module: group(2),
            local: group(3),
            property: group(4),
            callable: caps.get(5).is_some(),
            title: group(6),
        }
    }

    /// `Local` or `Local.Property`, the symbol the link points at.
    fn symbol(&self) -> Option<String> {
        match (self.local, self.property) {
            (Some(local), Some(property)) => Some(format!("{}.{}", local, property)),
            (Some(local), None) => Some(local.to_string()),
            _ => None,
        }
    }

    /// `#Local` or `#Local.Property`; empty without a local part.
    fn fragment(&self) -> String {
        self.symbol().map(|s| format!("#{}", s)).unwrap_or_default()
    }

    fn text(&self) -> String {
        match self.title {
            Some(title) => title.to_string(),
            None => format!(
                "{}{}{}",
                self.module.unwrap_or(""),
                self.fragment(),
                if self.callable { "()" } else { "" }
            ),
        }
    }
}

/// Link and type rendering for one output file.
#[derive(Debug, Clone)]
pub struct Transformers {
    module_name: Option<String>,
    local_symbols: HashSet<String>,
    index: Rc<SymbolIndex>,
}

impl Transformers {
    pub fn new(module_name: Option<String>, local_symbols: &[String], index: Rc<SymbolIndex>) -> Self {
        Transformers {
            module_name,
            local_symbols: local_symbols.iter().cloned().collect(),
            index,
        }
    }

    /// Rewrite every `{@link}` in `text` into a markdown link.
    ///
    /// `@linkplain` renders a plain link, `@link` a code-styled one.
    pub fn replace_links(&self, text: &str) -> String {
        RE_LINK
            .replace_all(text, |caps: &Captures| {
                let link = LinkRef::from_captures(caps);
                let text = link.text();
                let target = self.target(&link);
                if link.plain {
                    format!("[{}]({})", text, target)
                } else {
                    format!("[`{}`]({})", text, target)
                }
            })
            .into_owned()
    }

    /// Link references in `text` pointing at an unknown module or at a
    /// symbol its module does not declare.
    pub fn unresolved_links(&self, text: &str) -> Vec<String> {
        RE_LINK
            .captures_iter(text)
            .filter(|caps| !self.resolves(&LinkRef::from_captures(caps)))
            .map(|caps| caps[0].to_string())
            .collect()
    }

    /// A type name, linked when it is documented in this file or elsewhere.
    pub fn render_type(&self, type_name: &str) -> String {
        if self.local_symbols.contains(type_name) {
            return format!("[`{}`](#{})", type_name, type_name);
        }
        match self.index.file_for_symbol(type_name) {
            Some(file) => format!("[`{}`]({}#{})", type_name, file, type_name),
            None => format!("`{}`", type_name),
        }
    }

    pub fn render_types(&self, types: &[String]) -> String {
        types
            .iter()
            .map(|t| self.render_type(t))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn is_own_module(&self, module: &str) -> bool {
        self.module_name.as_deref() == Some(module)
    }

    fn resolves(&self, link: &LinkRef) -> bool {
        let symbol = link.symbol();
        match link.module {
            Some(module) if !self.is_own_module(module) => {
                self.index.file_for_module(module).is_some()
                    && symbol.map_or(true, |s| {
                        self.index
                            .file_for_symbol(&format!("{}#{}", module, s))
                            .is_some()
                    })
            }
            _ => symbol.map_or(true, |s| self.local_symbols.contains(&s)),
        }
    }

    fn target(&self, link: &LinkRef) -> String {
        let fragment = link.fragment();
        match link.module {
            Some(module) if !self.is_own_module(module) => {
                let file = self.index.file_for_module(module).unwrap_or(UNKNOWN_TARGET);
                format!("{}{}", file, fragment)
            }
            _ if fragment.is_empty() => "#".to_string(),
            _ => fragment,
        }
    }
}
