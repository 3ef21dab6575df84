use compiler_output_ast::output::output_ast::*;
use compiler_output_ast::parse_util::{ParseLocation, ParseSourceFile, ParseSourceSpan};
use compiler_output_ast::{
    apply_source_span_to_expression_if_needed, apply_source_span_to_statement_if_needed,
};
use std::sync::Arc;

fn span(start: usize, end: usize) -> ParseSourceSpan {
    let file = Arc::new(ParseSourceFile::new("const value = a + 1;", "app.ts"));
    ParseSourceSpan::new(
        ParseLocation::new(file.clone(), start, 0, start),
        ParseLocation::new(file, end, 0, end),
    )
}

fn binary_parts(expr: &Expression) -> (&Expression, &Expression) {
    match expr {
        Expression::BinaryOp(binary) => (&*binary.lhs, &*binary.rhs),
        other => panic!("expected a binary operator expression, got {}", other.node_kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fill_every_missing_span() {
        let l = span(14, 19);
        let expr = variable("a", None, None).plus(literal(1, None, None), None);
        let result = apply_source_span_to_expression_if_needed(expr, Some(&l));

        assert_eq!(result.source_span(), Some(&l));
        let (lhs, rhs) = binary_parts(&result);
        assert_eq!(lhs.source_span(), Some(&l));
        assert_eq!(rhs.source_span(), Some(&l));
    }

    #[test]
    fn should_keep_existing_root_span_and_fill_descendants() {
        let l = span(14, 19);
        let l2 = span(0, 5);
        let expr = variable("a", None, None).plus(literal(1, None, None), Some(l2.clone()));
        let result = apply_source_span_to_expression_if_needed(expr, Some(&l));

        assert_eq!(result.source_span(), Some(&l2));
        let (lhs, rhs) = binary_parts(&result);
        assert_eq!(lhs.source_span(), Some(&l));
        assert_eq!(rhs.source_span(), Some(&l));
    }

    #[test]
    fn should_keep_existing_descendant_spans() {
        let l = span(14, 19);
        let own = span(14, 15);
        let lhs: Expression = ReadVarExpr::new("a", None, Some(own.clone())).into();
        let expr = BinaryOperatorExpr::new(BinaryOperator::Plus, lhs, literal(1, None, None), None, None);
        let result = apply_source_span_to_expression_if_needed(expr.into(), Some(&l));

        let (lhs, rhs) = binary_parts(&result);
        assert_eq!(lhs.source_span(), Some(&own));
        assert_eq!(rhs.source_span(), Some(&l));
    }

    #[test]
    fn should_only_change_source_spans() {
        let l = span(0, 5);
        let expr = variable("a", None, None)
            .prop("b", None)
            .call_method("c", vec![literal_arr(vec![literal(1, None, None), variable("d", None, None)])], None)
            .cast(STRING_TYPE.clone(), None);
        let result = apply_source_span_to_expression_if_needed(expr.clone(), Some(&l));
        assert!(result.is_equivalent(&expr));
        assert!(matches!(
            result.type_(),
            Some(Type::Builtin(BuiltinType { name: BuiltinTypeName::String, .. }))
        ));
    }

    #[test]
    fn should_be_idempotent() {
        let l = span(14, 19);
        let stmt = variable("x", None, None).set(variable("a", None, None).plus(literal(1, None, None), None)).unwrap().to_stmt();
        let once = apply_source_span_to_statement_if_needed(stmt, Some(&l));
        let twice = apply_source_span_to_statement_if_needed(once.clone(), Some(&l));
        assert_eq!(format!("{:?}", once), format!("{:?}", twice));
        assert_eq!(twice.source_span(), Some(&l));
    }

    #[test]
    fn should_return_input_when_no_span_given() {
        let expr = variable("a", None, None).plus(literal(1, None, None), None);
        let result = apply_source_span_to_expression_if_needed(expr, None);
        assert!(result.source_span().is_none());
        let (lhs, _) = binary_parts(&result);
        assert!(lhs.source_span().is_none());

        let stmt = apply_source_span_to_statement_if_needed(variable("a", None, None).to_stmt(), None);
        assert!(stmt.source_span().is_none());
    }

    #[test]
    fn should_fill_statements_in_nested_bodies() {
        let l = span(0, 5);
        let stmt: Statement = TryCatchStmt::new(
            vec![ReturnStatement::new(variable("a", None, None), None).into()],
            vec![CommentStmt::new("ignored", false, None).into()],
            None,
        )
        .into();
        let Statement::TryCatch(result) = apply_source_span_to_statement_if_needed(stmt, Some(&l))
        else {
            panic!("expected a try/catch statement");
        };
        assert_eq!(result.source_span.as_ref(), Some(&l));
        assert_eq!(result.body_stmts[0].source_span(), Some(&l));
        assert_eq!(result.catch_stmts[0].source_span(), Some(&l));
    }
}
