//! Raw comment records as produced by the comment parser, and the
//! normalized items the hierarchy builder works with.

use serde::{Deserialize, Serialize};

/// Name given to items for which neither a tag nor the parser context yields one.
pub const UNKNOWN_NAME: &str = "- unknown -";

/// Type list used when the parser found no explicit type.
pub const WILDCARD_TYPE: &str = "*";

/// One documentation block, as delivered by a dox-compatible comment parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawComment {
    pub tags: Vec<Tag>,
    pub description: Option<Description>,
    pub ctx: Option<Context>,
    pub line: usize,
    pub is_constructor: bool,
    pub is_private: bool,
    pub ignore: bool,
}

impl RawComment {
    /// Tags whose type is one of `types`, in declaration order.
    pub fn tags_by_type<'a>(&'a self, types: &'a [&str]) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.tag_type.as_deref().is_some_and(|t| types.contains(&t)))
    }

    /// First tag whose type is one of `types`.
    pub fn first_tag<'a>(&'a self, types: &'a [&str]) -> Option<&'a Tag> {
        self.tags_by_type(types).next()
    }

    pub fn has_tag(&self, tag_type: &str) -> bool {
        self.first_tag(&[tag_type]).is_some()
    }

    pub fn description_text(&self) -> &str {
        self.description.as_ref().map_or("", Description::text)
    }

    pub fn ctx_kind(&self) -> Option<&ContextKind> {
        self.ctx.as_ref().map(|ctx| &ctx.kind)
    }
}

/// Description is either plain text or dox's `{full, summary, body}` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Parts {
        #[serde(default)]
        full: String,
        #[serde(default)]
        summary: String,
        #[serde(default)]
        body: String,
    },
}

impl Description {
    pub fn text(&self) -> &str {
        match self {
            Description::Text(text) => text,
            Description::Parts { full, .. } => full,
        }
    }
}

/// A single annotation of a comment. A tag without `type` is a continuation
/// of the preceding tag (see [`crate::parser::tags`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tag {
    #[serde(rename = "type")]
    pub tag_type: Option<String>,
    pub string: String,
    pub name: Option<String>,
    pub types: Vec<String>,
    pub optional: bool,
    pub description: Option<Description>,
    /// Set by dox for `@extends`/`@augments`
    pub other_class: Option<String>,
}

impl Tag {
    pub fn new(tag_type: &str, string: &str) -> Self {
        Tag {
            tag_type: Some(tag_type.to_string()),
            string: string.to_string(),
            ..Default::default()
        }
    }

    /// Text of the tag: its description if the parser split one off, the raw string otherwise.
    pub fn text(&self) -> &str {
        match &self.description {
            Some(desc) => desc.text(),
            None => &self.string,
        }
    }
}

/// Source construct the parser found right after a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "type")]
    pub kind: ContextKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub constructor: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Method,
    Function,
    Property,
    Declaration,
    Class,
    Constructor,
    #[serde(other)]
    Other,
}

/// Normalized form of a [`RawComment`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub description: String,
    pub params: Vec<Param>,
    /// Top-level call arguments (object-parameter properties folded into their root)
    pub params_for_args_list: Vec<String>,
    pub returns: Option<Return>,
    /// Text of an `@deprecated` tag; empty string when deprecated without explanation
    pub deprecated: Option<String>,
    pub extends_type: Option<String>,
    pub children: Vec<Item>,
    #[serde(skip)]
    pub raw: RawComment,
}

impl Item {
    /// First type of the first `@type` tag, if any.
    pub fn first_type(&self) -> Option<&str> {
        self.raw
            .first_tag(&["type"])
            .and_then(|tag| tag.types.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: String,
    pub types: Vec<String>,
    pub description: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Return {
    pub name: Option<String>,
    pub types: Vec<String>,
    pub description: String,
}
