//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the ModuleDoc with every `{@link}` already rewritten, so
//! consumers need neither the symbol index nor the transformers.

use crate::doc::{Member, ModuleDoc};
use crate::error::Result;
use crate::links::Transformers;
use crate::model::Item;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &ModuleDoc) -> Result<String> {
        let mut resolved = doc.clone();
        let t = &doc.transformers;

        if let Some(ref mut module) = resolved.module {
            resolve_links(t, module);
        }
        resolve_members(t, &mut resolved.members);
        for type_doc in resolved
            .types
            .iter_mut()
            .chain(resolved.injectables.iter_mut())
            .chain(resolved.directives.iter_mut())
        {
            if let Some(ref mut item) = type_doc.item {
                resolve_links(t, item);
            }
            resolve_members(t, &mut type_doc.members);
        }

        let mut out = serde_json::to_string_pretty(&resolved)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn resolve_members(t: &Transformers, members: &mut [Member]) {
    for member in members {
        resolve_links(t, &mut member.item);
    }
}

fn resolve_links(t: &Transformers, item: &mut Item) {
    item.description = t.replace_links(&item.description);
    if let Some(ref mut deprecated) = item.deprecated {
        *deprecated = t.replace_links(deprecated);
    }
    for param in &mut item.params {
        param.description = t.replace_links(&param.description);
    }
    if let Some(ref mut returns) = item.returns {
        returns.description = t.replace_links(&returns.description);
    }
}
