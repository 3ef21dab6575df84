//! Compiler Output AST
//!
//! Typed intermediate representation for generated code, with equivalence,
//! tree rewriting and read-only analyses over it.

#![deny(clippy::all)]

// Core modules
pub mod error;
pub mod parse_util;

// Output AST
pub mod output;

// Re-exports
pub use error::{OutputAstError, Result};
pub use output::analysis::{collect_external_references, find_read_var_names};
pub use output::ast_transformer::AstTransformer;
pub use output::recursive_visitor::RecursiveAstVisitor;
pub use output::source_span::{
    apply_source_span_to_expression_if_needed, apply_source_span_to_statement_if_needed,
};
pub use parse_util::{ParseLocation, ParseSourceFile, ParseSourceSpan};
