//! Output Module
//!
//! Target-agnostic output AST plus the traversal machinery built on it.

pub mod analysis;
pub mod ast_transformer;
pub mod jsdoc;
pub mod output_ast;
pub mod recursive_visitor;
pub mod source_span;
