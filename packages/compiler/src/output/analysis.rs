//! Output AST Analyses
//!
//! Collectors built on `RecursiveAstVisitor`.

use crate::output::output_ast::{
    ClassStmt, DeclareFunctionStmt, ExternalExpr, ExternalReference, ReadVarExpr, Statement,
};
use crate::output::recursive_visitor::RecursiveAstVisitor;
use indexmap::IndexSet;
use std::any::Any;

/// Names of all plain variables read in `stmts`, in first-read order.
/// Builtin variables are skipped, and so are the bodies of nested function
/// and class declarations since their locals live in another scope.
pub fn find_read_var_names(stmts: &[Statement]) -> IndexSet<String> {
    let mut finder = ReadVarNameFinder::default();
    finder.visit_all_statements(stmts, &mut ());
    tracing::debug!(count = finder.names.len(), "collected free variable reads");
    finder.names
}

#[derive(Default)]
struct ReadVarNameFinder {
    names: IndexSet<String>,
}

impl RecursiveAstVisitor for ReadVarNameFinder {
    fn visit_declare_function_stmt(
        &mut self,
        _stmt: &DeclareFunctionStmt,
        _context: &mut dyn Any,
    ) {
    }

    fn visit_declare_class_stmt(&mut self, _stmt: &ClassStmt, _context: &mut dyn Any) {}

    fn visit_read_var_expr(&mut self, expr: &ReadVarExpr, _context: &mut dyn Any) {
        if let Some(name) = expr.name() {
            self.names.insert(name.to_string());
        }
    }
}

/// Every external reference in `stmts`, in visitation order. Duplicates are
/// kept.
pub fn collect_external_references(stmts: &[Statement]) -> Vec<ExternalReference> {
    let mut finder = ExternalReferenceFinder::default();
    finder.visit_all_statements(stmts, &mut ());
    tracing::debug!(
        count = finder.references.len(),
        "collected external references"
    );
    finder.references
}

#[derive(Default)]
struct ExternalReferenceFinder {
    references: Vec<ExternalReference>,
}

impl RecursiveAstVisitor for ExternalReferenceFinder {
    fn visit_external_expr(&mut self, expr: &ExternalExpr, context: &mut dyn Any) {
        self.references.push(expr.value.clone());
        if let Some(type_params) = &expr.type_params {
            for ty in type_params {
                self.visit_type_annotation(ty, context);
            }
        }
    }
}
