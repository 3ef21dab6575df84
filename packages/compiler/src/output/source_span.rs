//! Source Span Backfill
//!
//! Assigns a source span to every node of a tree that does not have one yet.
//! Nodes that already carry a span keep it; their span-less descendants are
//! still filled in.

use crate::output::ast_transformer::AstTransformer;
use crate::output::output_ast::{Expression, Statement};
use crate::parse_util::ParseSourceSpan;
use std::any::Any;

struct ApplySourceSpanTransformer<'a> {
    source_span: &'a ParseSourceSpan,
}

impl AstTransformer for ApplySourceSpanTransformer<'_> {
    fn transform_expr(&mut self, expr: Expression, _context: &mut dyn Any) -> Expression {
        if expr.source_span().is_some() {
            return expr;
        }
        tracing::trace!(kind = expr.node_kind(), "backfilling source span");
        expr.with_source_span(Some(self.source_span.clone()))
    }

    fn transform_stmt(&mut self, stmt: Statement, _context: &mut dyn Any) -> Statement {
        if stmt.source_span().is_some() {
            return stmt;
        }
        tracing::trace!(kind = stmt.node_kind(), "backfilling source span");
        stmt.with_source_span(Some(self.source_span.clone()))
    }
}

pub fn apply_source_span_to_expression_if_needed(
    expr: Expression,
    source_span: Option<&ParseSourceSpan>,
) -> Expression {
    let Some(source_span) = source_span else {
        tracing::debug!("no source span given, expression left as is");
        return expr;
    };
    ApplySourceSpanTransformer { source_span }.visit_expr(&expr, &mut ())
}

pub fn apply_source_span_to_statement_if_needed(
    stmt: Statement,
    source_span: Option<&ParseSourceSpan>,
) -> Statement {
    let Some(source_span) = source_span else {
        tracing::debug!("no source span given, statement left as is");
        return stmt;
    };
    ApplySourceSpanTransformer { source_span }.visit_stmt(&stmt, &mut ())
}
