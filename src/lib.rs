//! doxdown — cross-linked markdown documentation from parsed JSDoc comments.
//!
//! Input is the JSON comment list of a dox-compatible comment parser, one per
//! source file. Comments are grouped into a container hierarchy per file, all
//! files contribute to a shared symbol index, and `{@link}` references are
//! then rewritten into links across the generated files.

pub mod builder;
pub mod doc;
pub mod error;
pub mod hierarchy;
pub mod index;
pub mod links;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod predicates;
pub mod render;
pub mod text;
pub mod toc;

pub use builder::{create_doc, create_docs_for_files, create_markdown, FileOutput, Options, SourceFile};
pub use error::{DocError, Result};
