//! GitHub-flavored markdown renderer.
//!
//! Layout: module title and description, contents, module members, then
//! types, injectable services and directives with their members. Headings
//! carry explicit anchors named like the link rewriter's fragments.

use crate::doc::{Member, ModuleDoc, TypeDoc};
use crate::error::Result;
use crate::links::Transformers;
use crate::model::Item;
use crate::predicates::is_function;
use crate::render::Renderer;
use crate::text::{convert_line_breaks, reduce_empty_lines, tidy};
use crate::toc::{self, TocEntry};

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &ModuleDoc) -> Result<String> {
        let t = &doc.transformers;
        let mut lines: Vec<String> = Vec::new();

        if let Some(ref module) = doc.module {
            lines.push(format!("# {}\n", module.name));
            push_description(&mut lines, t, module);
        }

        let sections: [(&str, &[TypeDoc]); 3] = [
            ("Types", doc.types.as_slice()),
            ("Injectable Services", doc.injectables.as_slice()),
            ("Directives", doc.directives.as_slice()),
        ];

        // Contents
        let mut contents: Vec<(&str, Vec<TocEntry>)> = vec![("Module Members", doc.members_toc())];
        contents.extend(
            sections
                .iter()
                .map(|(title, types)| (*title, ModuleDoc::types_toc(types))),
        );
        contents.retain(|(_, entries)| !entries.is_empty());
        if !contents.is_empty() {
            lines.push("## Contents\n".to_string());
            for (title, entries) in &contents {
                lines.push(format!("**{}**\n", title));
                lines.push(toc::render_toc(entries));
                lines.push(String::new());
            }
        }

        // Module members
        if !doc.members.is_empty() {
            lines.push("## Module Members\n".to_string());
            for member in &doc.members {
                lines.push(render_member(t, member));
            }
        }

        for (title, types) in sections {
            if types.is_empty() {
                continue;
            }
            lines.push(format!("## {}\n", title));
            for type_doc in types {
                lines.push(render_type_doc(t, type_doc));
            }
        }

        Ok(reduce_empty_lines(&lines.join("\n")))
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Render a container with its own documentation and its members.
fn render_type_doc(t: &Transformers, type_doc: &TypeDoc) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("### {}{}\n", anchor(&type_doc.name), type_doc.name));

    if let Some(ref item) = type_doc.item {
        if let Some(ref base) = item.extends_type {
            lines.push(format!("> extends {}\n", t.render_type(base)));
        }
        push_deprecation(&mut lines, t, item);
        push_description(&mut lines, t, item);
        push_params(&mut lines, t, item);
        push_returns(&mut lines, t, item);
    }

    for member in &type_doc.members {
        lines.push(render_member(t, member));
    }
    lines.join("\n")
}

/// Render a member as a function block or, when not callable, a property block.
fn render_member(t: &Transformers, member: &Member) -> String {
    let item = &member.item;
    let mut lines: Vec<String> = Vec::new();

    if is_function(item) {
        let args = if item.params_for_args_list.is_empty() {
            String::new()
        } else {
            format!(" {} ", item.params_for_args_list.join(", "))
        };
        lines.push(format!("#### {}{}({})\n", anchor(&member.anchor), member.full_name, args));
    } else {
        let type_suffix = item
            .first_type()
            .map(|ty| format!(" {}", t.render_type(ty)))
            .unwrap_or_default();
        lines.push(format!("#### {}{}{}\n", anchor(&member.anchor), member.full_name, type_suffix));
    }

    push_deprecation(&mut lines, t, item);
    push_description(&mut lines, t, item);
    push_params(&mut lines, t, item);
    push_returns(&mut lines, t, item);
    lines.join("\n")
}

fn anchor(id: &str) -> String {
    format!("<a id=\"{}\"></a>", id)
}

fn push_description(lines: &mut Vec<String>, t: &Transformers, item: &Item) {
    let description = tidy(&t.replace_links(&item.description));
    if !description.is_empty() {
        lines.push(description);
        lines.push(String::new());
    }
}

fn push_deprecation(lines: &mut Vec<String>, t: &Transformers, item: &Item) {
    match item.deprecated.as_deref() {
        Some("") => lines.push("> **Deprecated**\n".to_string()),
        Some(reason) => lines.push(format!(
            "> **Deprecated:** {}\n",
            convert_line_breaks(&t.replace_links(reason))
        )),
        None => {}
    }
}

fn push_params(lines: &mut Vec<String>, t: &Transformers, item: &Item) {
    if item.params.is_empty() {
        return;
    }
    lines.push("##### Parameters\n".to_string());
    lines.push("| Property | Type | Description |".to_string());
    lines.push("| -------- | ---- | ----------- |".to_string());
    for param in &item.params {
        let name = if param.optional {
            format!("_{}_", param.name)
        } else {
            param.name.clone()
        };
        lines.push(format!(
            "| {} | {} | {} |",
            name,
            t.render_types(&param.types),
            convert_line_breaks(&t.replace_links(&param.description))
        ));
    }
    lines.push(String::new());
}

fn push_returns(lines: &mut Vec<String>, t: &Transformers, item: &Item) {
    let Some(ref returns) = item.returns else {
        return;
    };
    lines.push("##### Returns\n".to_string());
    lines.push("| Type | Description |".to_string());
    lines.push("| ---- | ----------- |".to_string());
    lines.push(format!(
        "| {} | {} |",
        t.render_types(&returns.types),
        convert_line_breaks(&t.replace_links(&returns.description))
    ));
    lines.push(String::new());
}
