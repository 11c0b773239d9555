//! Cross-file symbol index and duplicate module registry.
//!
//! Both live for exactly one generation run and are filled during the
//! collection pass, before any link is rewritten.

use std::collections::{BTreeMap, HashMap};

/// Where modules and symbols are documented, by target file name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolIndex {
    modules: HashMap<String, String>,
    symbols: HashMap<String, String>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and its symbols for `target_file`.
    ///
    /// Symbols are stored both bare and as `module#symbol`. Later
    /// registrations win.
    pub fn register<'a>(
        &mut self,
        module_name: Option<&str>,
        symbols: impl IntoIterator<Item = &'a String>,
        target_file: &str,
    ) {
        if let Some(module) = module_name {
            self.modules.insert(module.to_string(), target_file.to_string());
        }
        for symbol in symbols {
            self.symbols.insert(symbol.clone(), target_file.to_string());
            if let Some(module) = module_name {
                self.symbols
                    .insert(format!("{}#{}", module, symbol), target_file.to_string());
            }
        }
    }

    pub fn file_for_module(&self, module_name: &str) -> Option<&str> {
        self.modules.get(module_name).map(String::as_str)
    }

    pub fn file_for_symbol(&self, symbol: &str) -> Option<&str> {
        self.symbols.get(symbol).map(String::as_str)
    }
}

/// Source files per declared module name.
#[derive(Debug, Default, Clone)]
pub struct DuplicateModuleRegistry {
    modules: BTreeMap<String, Vec<String>>,
}

impl DuplicateModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module_name: &str, source_file: &str) {
        let files = self.modules.entry(module_name.to_string()).or_default();
        if !files.iter().any(|f| f == source_file) {
            files.push(source_file.to_string());
        }
    }

    /// Modules declared by more than one distinct file, sorted by module name.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.modules
            .iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(module, files)| (module.as_str(), files.as_slice()))
    }
}
