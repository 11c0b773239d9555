//! Turns one raw comment into an [`Item`].

use crate::model::{Item, Param, RawComment, Return, Tag, UNKNOWN_NAME, WILDCARD_TYPE};
use crate::text;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `[name]` or `[name=default]`, one bracket wrapper at most
static RE_BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]=]*)(?:=[^\]]*)?\]$").unwrap());

/// How `{@link ...}` markup in descriptions is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Keep the markup for the cross-file link rewriter
    #[default]
    Deferred,
    /// Replace with `[target](#target)`; for single-file runs without a symbol index
    Placeholder,
}

/// Normalize one comment. Pure apart from taking ownership of the comment.
pub fn normalize(raw: RawComment, links: LinkMode) -> Item {
    let name = raw
        .first_tag(&["name", "directive", "injection", "module"])
        .map(|tag| tag.string.trim())
        .filter(|name| !name.is_empty())
        .or_else(|| raw.ctx.as_ref().and_then(|ctx| ctx.name.as_deref()))
        .unwrap_or(UNKNOWN_NAME)
        .to_string();

    let description = prepare_text(raw.description_text(), links);
    let params = params(&raw, links);
    let params_for_args_list = args_list(&params);

    let returns = raw.first_tag(&["return", "returns"]).map(|tag| Return {
        name: tag.name.clone(),
        types: types_or_wildcard(tag),
        description: prepare_text(tag.text(), links),
    });

    let deprecated = raw
        .first_tag(&["deprecated"])
        .map(|tag| prepare_text(tag.text(), links));

    Item {
        name,
        description,
        params,
        params_for_args_list,
        returns,
        deprecated,
        extends_type: None,
        children: Vec::new(),
        raw,
    }
}

fn prepare_text(text: &str, links: LinkMode) -> String {
    match links {
        LinkMode::Deferred => text.trim().to_string(),
        LinkMode::Placeholder => text::placeholder_links(text).trim().to_string(),
    }
}

fn types_or_wildcard(tag: &Tag) -> Vec<String> {
    if tag.types.is_empty() {
        vec![WILDCARD_TYPE.to_string()]
    } else {
        tag.types.clone()
    }
}

/// Strip one bracket wrapper; brackets mark the parameter optional.
fn clean_param_name(raw_name: &str) -> (String, bool) {
    let raw_name = raw_name.trim();
    match RE_BRACKETED.captures(raw_name) {
        Some(caps) => (caps[1].trim().to_string(), true),
        None => (raw_name.to_string(), false),
    }
}

/// Every proper dotted prefix of a parameter path: `a.b.c` → `a`, `a.b`.
fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices('.').map(move |(i, _)| &name[..i])
}

/// `@param` tags in declaration order.
///
/// A property of an optional object parameter is optional too, so optional
/// names are collected while walking the tags.
fn params(raw: &RawComment, links: LinkMode) -> Vec<Param> {
    let mut optional: HashSet<String> = HashSet::new();

    raw.tags_by_type(&["param"])
        .map(|tag| {
            let (name, bracketed) = clean_param_name(tag.name.as_deref().unwrap_or(""));
            let is_optional = tag.optional
                || bracketed
                || ancestors(&name).any(|parent| optional.contains(parent));
            if is_optional {
                optional.insert(name.clone());
            }
            Param {
                name,
                types: types_or_wildcard(tag),
                description: prepare_text(tag.text(), links),
                optional: is_optional,
            }
        })
        .collect()
}

/// Call arguments: documented object properties (`opts.x`) are not arguments
/// of their own, they only contribute their root parameter once.
fn args_list(params: &[Param]) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    for param in params {
        let root = param.name.split('.').next().unwrap_or(&param.name);
        if !args.iter().any(|arg| arg == root) {
            args.push(root.to_string());
        }
    }
    args
}
