//! Folds the ordered comments of one file into root nodes
//! (global bucket, containers, placeholder shells) with their members, and
//! collects the symbols the file declares.
//!
//! Order matters: members attach to containers declared earlier, and a member
//! naming a container that has not been declared yet creates a shell that the
//! later declaration fills in.

use crate::model::{ContextKind, Item, RawComment};
use crate::normalize::{normalize, LinkMode};
use crate::predicates::{is_directive, is_injection, is_module, GLOBAL_BUCKET_NAME};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A root of the comment hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HierarchyNode {
    /// Free-standing items of the file, including the module header
    Global { children: Vec<Item> },
    /// A declared class, injectable or directive; members live in `children`
    Container(Item),
    /// A container only known from its members so far
    Shell { name: String, children: Vec<Item> },
}

impl HierarchyNode {
    pub fn name(&self) -> &str {
        match self {
            HierarchyNode::Global { .. } => GLOBAL_BUCKET_NAME,
            HierarchyNode::Container(item) => &item.name,
            HierarchyNode::Shell { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[Item] {
        match self {
            HierarchyNode::Global { children } | HierarchyNode::Shell { children, .. } => children,
            HierarchyNode::Container(item) => &item.children,
        }
    }

    /// The declaring comment; `None` for the global bucket and shells.
    pub fn item(&self) -> Option<&Item> {
        match self {
            HierarchyNode::Container(item) => Some(item),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> &mut Vec<Item> {
        match self {
            HierarchyNode::Global { children } | HierarchyNode::Shell { children, .. } => children,
            HierarchyNode::Container(item) => &mut item.children,
        }
    }
}

/// Result of folding one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    /// Name of the last `@module` header seen
    pub module_name: Option<String>,
    /// The module header carries an `@ignore` tag
    pub module_hidden: bool,
    pub roots: Vec<HierarchyNode>,
    /// Declared names: roots, containers, `Container.member` and free items
    pub symbols: Vec<String>,
}

/// Accumulator threaded through the fold.
#[derive(Default)]
struct HierarchyBuilder {
    hierarchy: Hierarchy,
    /// Containers and shells by name, as indices into `roots`
    containers: HashMap<String, usize>,
    global: Option<usize>,
    links: LinkMode,
}

impl HierarchyBuilder {
    fn add(mut self, raw: RawComment) -> Self {
        let mut item = normalize(raw, self.links);
        debug!(name = %item.name, line = item.raw.line, ?item, "normalized comment");

        let module_header = is_module(&item);
        if module_header {
            self.hierarchy.module_name = Some(item.name.clone());
            self.hierarchy.module_hidden = item.raw.has_tag("ignore");
            // Context found after a module header most likely belongs to
            // undocumented code that happens to follow it.
            item.raw.ctx = None;
        }

        if is_root(&item) {
            self.add_root(item);
        } else if let Some(container) = belongs_to(&item.raw) {
            self.attach_member(container, item);
        } else {
            self.attach_global(item, module_header);
        }
        self
    }

    fn add_root(&mut self, mut item: Item) {
        item.extends_type = item
            .raw
            .first_tag(&["extends", "augments"])
            .and_then(|tag| tag.other_class.clone().or_else(|| non_empty(&tag.string)));

        match self.containers.get(&item.name) {
            Some(&index) => self.reconcile(index, item),
            None => {
                self.hierarchy.symbols.push(item.name.clone());
                self.containers.insert(item.name.clone(), self.hierarchy.roots.len());
                self.hierarchy.roots.push(HierarchyNode::Container(item));
            }
        }
    }

    /// Replace a shell (or an earlier declaration) with `item`, keeping the
    /// members attached so far.
    fn reconcile(&mut self, index: usize, mut item: Item) {
        let node = &mut self.hierarchy.roots[index];
        let mut children = std::mem::take(node.children_mut());
        children.append(&mut item.children);
        item.children = children;
        *node = HierarchyNode::Container(item);
    }

    fn attach_member(&mut self, container: String, item: Item) {
        let symbols = &mut self.hierarchy.symbols;
        if !symbols.contains(&container) {
            symbols.push(container.clone());
        }
        symbols.push(format!("{}.{}", container, item.name));

        match self.containers.get(&container) {
            Some(&index) => self.hierarchy.roots[index].children_mut().push(item),
            None => {
                self.containers.insert(container.clone(), self.hierarchy.roots.len());
                self.hierarchy.roots.push(HierarchyNode::Shell {
                    name: container,
                    children: vec![item],
                });
            }
        }
    }

    fn attach_global(&mut self, item: Item, module_header: bool) {
        if !module_header {
            self.hierarchy.symbols.push(item.name.clone());
        }
        match self.global {
            Some(index) => self.hierarchy.roots[index].children_mut().push(item),
            None => {
                self.global = Some(self.hierarchy.roots.len());
                self.hierarchy.roots.push(HierarchyNode::Global {
                    children: vec![item],
                });
            }
        }
    }
}

/// Constructors, injectables, directives and declarations are always roots.
fn is_root(item: &Item) -> bool {
    item.raw.is_constructor
        || is_injection(item)
        || is_directive(item)
        || item.raw.ctx_kind() == Some(&ContextKind::Declaration)
}

/// Container of a member: `@memberof`, else the parser's constructor, else its receiver.
fn belongs_to(raw: &RawComment) -> Option<String> {
    raw.first_tag(&["memberof", "memberOf"])
        .and_then(|tag| non_empty(&tag.string))
        .or_else(|| {
            let ctx = raw.ctx.as_ref()?;
            ctx.constructor
                .as_deref()
                .or(ctx.receiver.as_deref())
                .and_then(non_empty)
        })
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Fold the prepared comments of one file, in source order.
pub fn build_hierarchy(comments: Vec<RawComment>, links: LinkMode) -> Hierarchy {
    let builder = HierarchyBuilder {
        links,
        ..Default::default()
    };
    comments
        .into_iter()
        .fold(builder, HierarchyBuilder::add)
        .hierarchy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Context, Tag};

    fn ctx(kind: ContextKind, name: &str) -> Option<Context> {
        Some(Context {
            kind,
            name: Some(name.to_string()),
            constructor: None,
            receiver: None,
        })
    }

    fn constructor(name: &str) -> RawComment {
        RawComment {
            tags: vec![Tag::new("constructor", "")],
            is_constructor: true,
            ctx: ctx(ContextKind::Function, name),
            ..Default::default()
        }
    }

    fn member_of(container: &str, name: &str) -> RawComment {
        RawComment {
            tags: vec![Tag::new("memberof", container)],
            ctx: ctx(ContextKind::Method, name),
            ..Default::default()
        }
    }

    fn free_function(name: &str) -> RawComment {
        RawComment {
            ctx: ctx(ContextKind::Function, name),
            ..Default::default()
        }
    }

    fn module(name: &str) -> RawComment {
        RawComment {
            tags: vec![Tag::new("module", name)],
            ..Default::default()
        }
    }

    fn child_names(node: &HierarchyNode) -> Vec<&str> {
        node.children().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn constructor_then_members() {
        let hierarchy = build_hierarchy(
            vec![constructor("Pair"), member_of("Pair", "add"), member_of("Pair", "sub")],
            LinkMode::Deferred,
        );
        assert_eq!(hierarchy.roots.len(), 1);
        assert_eq!(hierarchy.roots[0].name(), "Pair");
        assert_eq!(child_names(&hierarchy.roots[0]), vec!["add", "sub"]);
    }

    #[test]
    fn members_before_constructor() {
        let early = build_hierarchy(
            vec![member_of("Pair", "add"), member_of("Pair", "sub"), constructor("Pair")],
            LinkMode::Deferred,
        );
        let late = build_hierarchy(
            vec![constructor("Pair"), member_of("Pair", "add"), member_of("Pair", "sub")],
            LinkMode::Deferred,
        );
        assert_eq!(early.roots.len(), 1);
        assert!(matches!(early.roots[0], HierarchyNode::Container(_)));
        assert_eq!(child_names(&early.roots[0]), child_names(&late.roots[0]));
        assert!(early.roots[0].item().unwrap().raw.is_constructor);
    }

    #[test]
    fn unresolved_container_stays_shell() {
        let hierarchy = build_hierarchy(vec![member_of("Widget", "render")], LinkMode::Deferred);
        assert!(matches!(&hierarchy.roots[0], HierarchyNode::Shell { name, .. } if name == "Widget"));
        assert!(hierarchy.roots[0].item().is_none());
    }

    #[test]
    fn constructor_context_and_receiver() {
        let mut method = free_function("grow");
        method.ctx.as_mut().unwrap().constructor = Some("Rectangle".to_string());
        let mut es_method = free_function("aMethod");
        es_method.ctx.as_mut().unwrap().receiver = Some("Base".to_string());

        let hierarchy = build_hierarchy(
            vec![constructor("Rectangle"), method, es_method],
            LinkMode::Deferred,
        );
        assert_eq!(child_names(&hierarchy.roots[0]), vec!["grow"]);
        assert_eq!(hierarchy.roots[1].name(), "Base");
        assert_eq!(child_names(&hierarchy.roots[1]), vec!["aMethod"]);
    }

    #[test]
    fn free_items_go_to_global_bucket() {
        let hierarchy = build_hierarchy(
            vec![module("simple"), free_function("func"), constructor("Pair")],
            LinkMode::Deferred,
        );
        assert_eq!(hierarchy.roots.len(), 2);
        assert!(crate::predicates::is_global_bucket(&hierarchy.roots[0]));
        assert_eq!(child_names(&hierarchy.roots[0]), vec!["simple", "func"]);
        assert_eq!(hierarchy.module_name.as_deref(), Some("simple"));
        assert_eq!(hierarchy.symbols, vec!["func", "Pair"]);
    }

    #[test]
    fn module_header_drops_context() {
        // The header is followed by an undocumented declaration the parser
        // attached to it; it must not become a root of its own.
        let mut header = module("simple");
        header.ctx = ctx(ContextKind::Declaration, "INTERNAL_TWELVE");
        let hierarchy = build_hierarchy(vec![header], LinkMode::Deferred);
        assert!(matches!(hierarchy.roots[0], HierarchyNode::Global { .. }));
        assert!(hierarchy.roots[0].children()[0].raw.ctx.is_none());
        assert!(hierarchy.symbols.is_empty());
    }

    #[test]
    fn last_module_header_wins() {
        let mut hidden = module("second");
        hidden.tags.push(Tag::new("ignore", ""));
        let hierarchy = build_hierarchy(vec![module("first"), hidden], LinkMode::Deferred);
        assert_eq!(hierarchy.module_name.as_deref(), Some("second"));
        assert!(hierarchy.module_hidden);
    }

    #[test]
    fn declaration_context_is_root() {
        let declaration = RawComment {
            ctx: ctx(ContextKind::Declaration, "SuperBase"),
            tags: vec![Tag {
                other_class: Some("Base".to_string()),
                ..Tag::new("extends", "Base")
            }],
            ..Default::default()
        };
        let hierarchy = build_hierarchy(vec![declaration], LinkMode::Deferred);
        let item = hierarchy.roots[0].item().unwrap();
        assert_eq!(item.name, "SuperBase");
        assert_eq!(item.extends_type.as_deref(), Some("Base"));
    }

    #[test]
    fn injections_and_directives_are_roots() {
        let service = RawComment {
            tags: vec![Tag::new("injection", "axFlowService")],
            ..Default::default()
        };
        let directive = RawComment {
            tags: vec![Tag::new("directive", "axId")],
            ..Default::default()
        };
        let hierarchy = build_hierarchy(vec![service, directive], LinkMode::Deferred);
        let names: Vec<_> = hierarchy.roots.iter().map(HierarchyNode::name).collect();
        assert_eq!(names, vec!["axFlowService", "axId"]);
    }

    #[test]
    fn member_symbols() {
        let hierarchy = build_hierarchy(
            vec![member_of("Pair", "add"), member_of("Pair", "sub"), constructor("Pair")],
            LinkMode::Deferred,
        );
        assert_eq!(hierarchy.symbols, vec!["Pair", "Pair.add", "Pair.sub"]);
    }

    #[test]
    fn roots_keep_first_appearance_order() {
        let hierarchy = build_hierarchy(
            vec![
                member_of("Late", "m"),
                free_function("f"),
                constructor("Early"),
                constructor("Late"),
            ],
            LinkMode::Deferred,
        );
        let names: Vec<_> = hierarchy.roots.iter().map(HierarchyNode::name).collect();
        assert_eq!(names, vec!["Late", GLOBAL_BUCKET_NAME, "Early"]);
    }
}
