//! Classification predicates over normalized items and raw comments.

use crate::hierarchy::HierarchyNode;
use crate::model::{ContextKind, Item, RawComment};

/// Name of the synthetic root that collects free-standing items.
pub const GLOBAL_BUCKET_NAME: &str = "__global__";

pub fn is_global_bucket(node: &HierarchyNode) -> bool {
    matches!(node, HierarchyNode::Global { .. })
}

pub fn is_module(item: &Item) -> bool {
    item.raw.has_tag("module")
}

pub fn is_injection(item: &Item) -> bool {
    item.raw.has_tag("injection")
}

pub fn is_directive(item: &Item) -> bool {
    item.raw.has_tag("directive")
}

/// Whether an item documents something callable.
///
/// Parser context wins; otherwise a `Function` `@type`, and finally the mere
/// presence of `@param`/`@return` tags.
pub fn is_function(item: &Item) -> bool {
    let raw = &item.raw;
    if matches!(raw.ctx_kind(), Some(ContextKind::Method | ContextKind::Function)) {
        return true;
    }

    let function_typed = raw
        .tags_by_type(&["type"])
        .any(|tag| tag.types.iter().any(|t| t == "Function" || t == "function"));
    if function_typed {
        return true;
    }

    raw.first_tag(&["param", "return", "returns"]).is_some()
}

/// Private and ignored comments are removed before hierarchy building.
pub fn is_private(raw: &RawComment) -> bool {
    raw.is_private || raw.ignore
}

pub fn not<T: ?Sized>(pred: impl Fn(&T) -> bool) -> impl Fn(&T) -> bool {
    move |value| !pred(value)
}

pub fn and<T: ?Sized>(
    first: impl Fn(&T) -> bool,
    second: impl Fn(&T) -> bool,
) -> impl Fn(&T) -> bool {
    move |value| first(value) && second(value)
}
