//! Output AST Errors
//!
//! Every failure here is a construction-time defect in the caller building
//! the tree; nothing is retried or recovered inside the crate.

use crate::output::output_ast::BuiltinVar;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputAstError {
    #[error("Built in variable {0} can not be assigned to.")]
    BuiltinVariableAssignment(BuiltinVar),

    #[error("{0} can not be used as an assignment target")]
    UnassignableExpression(&'static str),

    #[error("JSDoc text cannot contain \"/*\" and \"*/\": {0:?}")]
    InvalidJsDocText(String),
}

pub type Result<T> = std::result::Result<T, OutputAstError>;
