//! Two-pass documentation run over all input files.
//!
//! Pass 1 builds every file's hierarchy and fills the symbol index; pass 2
//! binds transformers to the completed index. A link in any file may point
//! into any other file, so no file is rewritten before all are collected.

use crate::doc::ModuleDoc;
use crate::error::Result;
use crate::hierarchy::{build_hierarchy, Hierarchy};
use crate::index::{DuplicateModuleRegistry, SymbolIndex};
use crate::links::Transformers;
use crate::model::RawComment;
use crate::normalize::LinkMode;
use crate::render::markdown::MarkdownRenderer;
use crate::render::Renderer;
use std::rc::Rc;
use tracing::debug;

/// One input file with its already parsed and prepared comments.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub source_filename: String,
    pub target_filename: String,
    pub comments: Vec<RawComment>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Drop files without a module header or with a hidden (`@ignore`) one
    pub only_public_modules: bool,
}

/// Result for one input file, in input order; `doc` is `None` for dropped files.
#[derive(Debug, Clone)]
pub struct FileOutput {
    pub source_filename: String,
    pub target_filename: String,
    pub doc: Option<ModuleDoc>,
}

/// Run both passes. Diagnostics go to `warn(filename, message)` and never
/// stop generation.
pub fn create_docs_for_files(
    files: Vec<SourceFile>,
    options: &Options,
    mut warn: impl FnMut(&str, &str),
) -> Vec<FileOutput> {
    let mut index = SymbolIndex::new();
    let mut registry = DuplicateModuleRegistry::new();

    // Pass 1: collect modules and symbols
    let mut collected: Vec<(String, String, Option<Hierarchy>)> = Vec::with_capacity(files.len());
    for file in files {
        let hierarchy = build_hierarchy(file.comments, LinkMode::Deferred);
        let public = hierarchy.module_name.is_some() && !hierarchy.module_hidden;

        if options.only_public_modules && !public {
            debug!(file = %file.source_filename, "skipping file without public module");
            collected.push((file.source_filename, file.target_filename, None));
            continue;
        }

        match &hierarchy.module_name {
            Some(module) => registry.register(module, &file.source_filename),
            None => warn(&file.source_filename, "no top-level module declared"),
        }
        index.register(
            hierarchy.module_name.as_deref(),
            &hierarchy.symbols,
            &file.target_filename,
        );
        collected.push((file.source_filename, file.target_filename, Some(hierarchy)));
    }

    // Pass 2: bind transformers to the complete index
    let index = Rc::new(index);
    let outputs = collected
        .into_iter()
        .map(|(source_filename, target_filename, hierarchy)| {
            let doc = hierarchy.map(|hierarchy| {
                let transformers = Transformers::new(
                    hierarchy.module_name.clone(),
                    &hierarchy.symbols,
                    Rc::clone(&index),
                );
                let doc = ModuleDoc::new(&source_filename, &target_filename, &hierarchy, transformers);
                report_unresolved_links(&doc, &mut warn);
                doc
            });
            FileOutput {
                source_filename,
                target_filename,
                doc,
            }
        })
        .collect();

    for (module, files) in registry.duplicates() {
        warn(
            &files[0],
            &format!(
                "module \"{}\" is declared in multiple files: {}",
                module,
                files.join(", ")
            ),
        );
    }

    outputs
}

/// Single-file run without a cross-file index: links become `[target](#target)`.
pub fn create_doc(source_filename: &str, target_filename: &str, comments: Vec<RawComment>) -> ModuleDoc {
    let hierarchy = build_hierarchy(comments, LinkMode::Placeholder);
    let transformers = Transformers::new(
        hierarchy.module_name.clone(),
        &hierarchy.symbols,
        Rc::new(SymbolIndex::new()),
    );
    ModuleDoc::new(source_filename, target_filename, &hierarchy, transformers)
}

/// Markdown for a single comment list, as printed by the stdin mode.
pub fn create_markdown(source_filename: &str, comments: Vec<RawComment>) -> Result<String> {
    let doc = create_doc(source_filename, source_filename, comments);
    MarkdownRenderer.render(&doc)
}

fn report_unresolved_links(doc: &ModuleDoc, warn: &mut impl FnMut(&str, &str)) {
    let transformers = &doc.transformers;
    for item in doc.items() {
        let texts = std::iter::once(item.description.as_str())
            .chain(item.deprecated.as_deref())
            .chain(item.params.iter().map(|p| p.description.as_str()))
            .chain(item.returns.iter().map(|r| r.description.as_str()));
        for text in texts {
            for link in transformers.unresolved_links(text) {
                warn(&doc.source_filename, &format!("unresolved link target {}", link));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Context, ContextKind, Description, Tag};

    fn module(name: &str) -> RawComment {
        RawComment {
            tags: vec![Tag::new("module", name)],
            ..Default::default()
        }
    }

    fn constructor(name: &str, description: &str) -> RawComment {
        RawComment {
            tags: vec![Tag::new("constructor", "")],
            description: Some(Description::Text(description.to_string())),
            is_constructor: true,
            ctx: Some(Context {
                kind: ContextKind::Function,
                name: Some(name.to_string()),
                constructor: None,
                receiver: None,
            }),
            ..Default::default()
        }
    }

    fn file(name: &str, comments: Vec<RawComment>) -> SourceFile {
        SourceFile {
            source_filename: format!("{}.json", name),
            target_filename: format!("{}.md", name),
            comments,
        }
    }

    fn run(files: Vec<SourceFile>, options: Options) -> (Vec<FileOutput>, Vec<(String, String)>) {
        let mut warnings = Vec::new();
        let outputs = create_docs_for_files(files, &options, |file, message| {
            warnings.push((file.to_string(), message.to_string()))
        });
        (outputs, warnings)
    }

    fn description_of(output: &FileOutput, type_name: &str) -> String {
        let doc = output.doc.as_ref().unwrap();
        let ty = doc.types.iter().find(|t| t.name == type_name).unwrap();
        doc.transformers
            .replace_links(&ty.item.as_ref().unwrap().description)
    }

    #[test]
    fn cross_file_links_resolve() {
        let alpha = file("a", vec![module("Alpha"), constructor("Widget", "Local {@link #Widget}")]);
        let beta = file("b", vec![module("Beta"), constructor("Gadget", "Uses {@link Alpha#Widget}")]);
        let (outputs, warnings) = run(vec![beta, alpha], Options::default());

        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(description_of(&outputs[0], "Gadget"), "Uses [`Alpha#Widget`](a.md#Widget)");
        assert_eq!(description_of(&outputs[1], "Widget"), "Local [`#Widget`](#Widget)");
    }

    #[test]
    fn missing_symbols_are_reported() {
        let alpha = file("a", vec![module("Alpha"), constructor("Widget", "See {@link #Gizmo}")]);
        let beta = file("b", vec![module("Beta"), constructor("Gadget", "Uses {@link Alpha#Nope}")]);
        let (_, warnings) = run(vec![alpha, beta], Options::default());

        assert_eq!(
            warnings,
            vec![
                ("a.json".to_string(), "unresolved link target {@link #Gizmo}".to_string()),
                ("b.json".to_string(), "unresolved link target {@link Alpha#Nope}".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_modules_warn_once() {
        let (outputs, warnings) = run(
            vec![
                file("one", vec![module("Foo")]),
                file("two", vec![module("Foo")]),
            ],
            Options::default(),
        );
        assert!(outputs.iter().all(|o| o.doc.is_some()));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].1.contains("one.json"));
        assert!(warnings[0].1.contains("two.json"));
    }

    #[test]
    fn missing_module_warns_but_renders() {
        let (outputs, warnings) = run(
            vec![file("loose", vec![constructor("Thing", "")])],
            Options::default(),
        );
        assert!(outputs[0].doc.is_some());
        assert_eq!(
            warnings,
            vec![("loose.json".to_string(), "no top-level module declared".to_string())]
        );
    }

    #[test]
    fn only_public_modules_drops_before_registration() {
        let mut hidden = module("Secret");
        hidden.tags.push(Tag::new("ignore", ""));
        let secret = file("secret", vec![hidden, constructor("Hidden", "")]);
        let loose = file("loose", vec![constructor("Loose", "")]);
        let public = file(
            "public",
            vec![module("Public"), constructor("Open", "See {@link Secret#Hidden}")],
        );

        let (outputs, warnings) = run(
            vec![secret, loose, public],
            Options {
                only_public_modules: true,
            },
        );
        assert!(outputs[0].doc.is_none());
        assert!(outputs[1].doc.is_none());
        let doc = outputs[2].doc.as_ref().unwrap();
        assert_eq!(doc.transformers.render_type("Hidden"), "`Hidden`");
        assert_eq!(
            description_of(&outputs[2], "Open"),
            "See [`Secret#Hidden`](unknown#Hidden)"
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].1.contains("unresolved link target {@link Secret#Hidden}"));
    }

    #[test]
    fn single_file_uses_placeholders() {
        let doc = create_doc(
            "types.json",
            "types.md",
            vec![module("types"), constructor("Rectangle", "Uses {@link #Pair} instances")],
        );
        assert_eq!(
            doc.types[0].item.as_ref().unwrap().description,
            "Uses [#Pair](##Pair) instances"
        );
    }

    #[test]
    fn single_file_markdown() {
        let md = create_markdown(
            "<stdin>",
            vec![module("types"), constructor("Rectangle", "Uses {@link #Pair} instances")],
        )
        .unwrap();
        assert!(md.starts_with("# types\n"));
        assert!(md.contains("### <a id=\"Rectangle\"></a>Rectangle\n"));
        assert!(md.contains("Uses [#Pair](##Pair) instances"));
    }
}
