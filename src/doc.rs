//! Render data for one output file: the module header, its free members and
//! the types, injectable services and directives with their members, plus
//! the transformers bound to the file.

use crate::hierarchy::{Hierarchy, HierarchyNode};
use crate::links::Transformers;
use crate::model::Item;
use crate::predicates::{and, is_directive, is_function, is_global_bucket, is_injection, is_module, not};
use crate::toc::TocEntry;
use serde::Serialize;

/// A documented member with its display name and anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// `name` for module members, `Type#name` for type members
    pub full_name: String,
    /// `name` or `Type.name`, matching the link rewriter's fragments
    pub anchor: String,
    pub item: Item,
}

impl Member {
    fn module_member(item: &Item) -> Self {
        Member {
            full_name: item.name.clone(),
            anchor: item.name.clone(),
            item: item.clone(),
        }
    }

    fn type_member(type_name: &str, item: &Item) -> Self {
        Member {
            full_name: format!("{}#{}", type_name, item.name),
            anchor: format!("{}.{}", type_name, item.name),
            item: item.clone(),
        }
    }

    fn toc_entry(&self) -> TocEntry {
        let parens = if is_function(&self.item) { "()" } else { "" };
        TocEntry::new(format!("{}{}", self.full_name, parens), &self.anchor)
    }
}

/// A container root: class, injectable service or directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDoc {
    pub name: String,
    /// Declaring comment without its children; `None` for undeclared shells
    pub item: Option<Item>,
    pub members: Vec<Member>,
}

impl TypeDoc {
    fn from_node(node: &HierarchyNode) -> Self {
        let name = node.name().to_string();
        let members = node
            .children()
            .iter()
            .map(|child| Member::type_member(&name, child))
            .collect();
        let item = node.item().map(|item| Item {
            children: Vec::new(),
            ..item.clone()
        });
        TypeDoc { name, item, members }
    }

    fn toc_entry(&self) -> TocEntry {
        let mut entry = TocEntry::new(&self.name, &self.name);
        entry.children = self.members.iter().map(Member::toc_entry).collect();
        entry
    }
}

/// Everything a template needs to render one file, without further lookups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDoc {
    pub source_filename: String,
    pub target_filename: String,
    pub module: Option<Item>,
    pub members: Vec<Member>,
    pub types: Vec<TypeDoc>,
    pub injectables: Vec<TypeDoc>,
    pub directives: Vec<TypeDoc>,
    #[serde(skip)]
    pub transformers: Transformers,
}

/// Lift an item predicate to roots; shells and the global bucket never match.
fn holds(pred: fn(&Item) -> bool) -> impl Fn(&HierarchyNode) -> bool {
    move |node| node.item().is_some_and(pred)
}

fn select(roots: &[HierarchyNode], pred: impl Fn(&HierarchyNode) -> bool) -> Vec<TypeDoc> {
    roots
        .iter()
        .filter(|node| pred(node))
        .map(TypeDoc::from_node)
        .collect()
}

impl ModuleDoc {
    pub fn new(
        source_filename: &str,
        target_filename: &str,
        hierarchy: &Hierarchy,
        transformers: Transformers,
    ) -> Self {
        let roots = &hierarchy.roots;
        let global: Vec<&Item> = roots
            .iter()
            .filter(|node| is_global_bucket(node))
            .flat_map(HierarchyNode::children)
            .collect();

        // The last header wins, as it does for the module name.
        let module = global.iter().rev().find(|item| is_module(item)).map(|item| (*item).clone());
        let not_module = not(is_module);
        let members = global
            .iter()
            .filter(|item| not_module(item))
            .map(|item| Member::module_member(item))
            .collect();

        ModuleDoc {
            source_filename: source_filename.to_string(),
            target_filename: target_filename.to_string(),
            module,
            members,
            types: select(
                roots,
                and(not(is_global_bucket), and(not(holds(is_injection)), not(holds(is_directive)))),
            ),
            injectables: select(roots, and(not(is_global_bucket), holds(is_injection))),
            directives: select(roots, and(not(is_global_bucket), holds(is_directive))),
            transformers,
        }
    }

    pub fn members_toc(&self) -> Vec<TocEntry> {
        self.members.iter().map(Member::toc_entry).collect()
    }

    pub fn types_toc(types: &[TypeDoc]) -> Vec<TocEntry> {
        types.iter().map(TypeDoc::toc_entry).collect()
    }

    /// Every item of the file: module header, members, containers and their members.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        let containers = self
            .types
            .iter()
            .chain(&self.injectables)
            .chain(&self.directives)
            .flat_map(|t| t.item.iter().chain(t.members.iter().map(|m| &m.item)));
        self.module
            .iter()
            .chain(self.members.iter().map(|m| &m.item))
            .chain(containers)
    }
}
