use compiler_output_ast::output::jsdoc::JSDocTag;
use compiler_output_ast::output::output_ast::*;
use compiler_output_ast::AstTransformer;
use std::any::Any;

struct Identity;

impl AstTransformer for Identity {}

/// Renames every plain variable read.
struct Renamer {
    from: &'static str,
    to: &'static str,
}

impl AstTransformer for Renamer {
    fn transform_expr(&mut self, expr: Expression, _context: &mut dyn Any) -> Expression {
        match expr {
            Expression::ReadVar(read) if read.name() == Some(self.from) => {
                ReadVarExpr::new(self.to, read.type_, read.source_span).into()
            }
            other => other,
        }
    }
}

/// Counts statements through the opaque context.
struct StatementCounter;

impl AstTransformer for StatementCounter {
    fn transform_stmt(&mut self, stmt: Statement, context: &mut dyn Any) -> Statement {
        if let Some(count) = context.downcast_mut::<usize>() {
            *count += 1;
        }
        stmt
    }
}

fn sample_program() -> Vec<Statement> {
    let body = vec![
        DeclareVarStmt::new(
            "tmp",
            Some(variable("a", None, None).key(literal(0, None, None), None, None)),
            Some(INT_TYPE.clone()),
            StmtModifier::FINAL,
            None,
        )
        .into(),
        if_stmt(
            not(variable("tmp", None, None), None),
            vec![ThrowStmt::new(
                variable("Error", None, None).instantiate(vec![literal("boom", None, None)], None, None),
                None,
            )
            .into()],
            Some(vec![ReturnStatement::new(
                variable("tmp", None, None).conditional(literal(1, None, None), Some(literal(2, None, None)), None),
                None,
            )
            .into()]),
        ),
    ];
    let class = ClassStmt::new(
        "Holder",
        Some(variable("Base", None, None)),
        vec![ClassField::new(
            "items",
            None,
            StmtModifier::empty(),
            Some(literal_arr(vec![variable("a", None, None), literal(1, None, None)])),
        )],
        vec![ClassGetter::new(
            "size",
            vec![ReturnStatement::new(
                THIS_EXPR.clone().prop("items", None).prop("length", None),
                None,
            )
            .into()],
            None,
            StmtModifier::empty(),
        )],
        ClassMethod::new(None, vec![FnParam::new("a", None)], vec![], None, StmtModifier::empty()),
        vec![ClassMethod::new(
            Some("run".to_string()),
            vec![],
            vec![THIS_EXPR
                .clone()
                .call_method("go", vec![variable("a", None, None)], None)
                .to_stmt()],
            None,
            StmtModifier::empty(),
        )],
        StmtModifier::EXPORTED,
        None,
    );
    vec![
        JSDocCommentStmt::new(vec![JSDocTag::text("helpers")], None).into(),
        CommentStmt::new("generated", false, None).into(),
        FunctionExpr::new(vec![FnParam::new("a", None)], body, None, None, None)
            .to_decl_stmt("pick", StmtModifier::EXPORTED)
            .into(),
        class.into(),
        TryCatchStmt::new(
            vec![variable("a", None, None).set(literal_map(
                vec![LiteralMapEntry::new("k", variable("a", None, None), true)],
                None,
            ))
            .unwrap()
            .to_stmt()],
            vec![CATCH_ERROR_VAR.clone().prop("message", None).to_stmt()],
            None,
        )
        .into(),
        Expression::from(CommaExpr::new(
            vec![
                assert_not_null(variable("a", None, None), None),
                variable("a", None, None).cast(DYNAMIC_TYPE.clone(), None),
            ],
            None,
        ))
        .to_stmt(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_rebuild_an_equivalent_tree_with_identity_hooks() {
        let program = sample_program();
        let rebuilt = Identity.visit_all_statements(&program, &mut ());
        assert!(are_all_equivalent(&program, &rebuilt));
    }

    #[test]
    fn should_keep_function_expression_names() {
        let named = fn_expr(vec![], vec![], None, None, Some("inner".to_string()));
        let Expression::Fn(rebuilt) = Identity.visit_expr(&named, &mut ()) else {
            panic!("expected a function expression");
        };
        assert_eq!(rebuilt.name.as_deref(), Some("inner"));
    }

    #[test]
    fn should_keep_scalar_fields_and_types() {
        let decl: Statement = DeclareVarStmt::new(
            "x",
            Some(literal(1, None, None)),
            Some(STRING_TYPE.clone()),
            StmtModifier::FINAL | StmtModifier::EXPORTED,
            None,
        )
        .into();
        let Statement::DeclareVar(rebuilt) = Identity.visit_stmt(&decl, &mut ()) else {
            panic!("expected a variable declaration");
        };
        assert_eq!(rebuilt.modifiers, StmtModifier::FINAL | StmtModifier::EXPORTED);
        assert!(matches!(
            rebuilt.type_,
            Some(Type::Builtin(BuiltinType { name: BuiltinTypeName::String, .. }))
        ));
    }

    #[test]
    fn should_apply_expression_hook_everywhere() {
        let program = sample_program();
        let renamed = Renamer { from: "a", to: "b" }.visit_all_statements(&program, &mut ());
        assert!(!are_all_equivalent(&program, &renamed));

        // Renaming back restores the original tree.
        let restored = Renamer { from: "b", to: "a" }.visit_all_statements(&renamed, &mut ());
        assert!(are_all_equivalent(&program, &restored));
    }

    #[test]
    fn should_descend_into_nested_bodies() {
        let nested = fn_expr(
            vec![],
            vec![ReturnStatement::new(variable("a", None, None), None).into()],
            None,
            None,
            None,
        );
        let renamed = Renamer { from: "a", to: "z" }.visit_expr(&nested, &mut ());
        let Expression::Fn(func) = renamed else {
            panic!("expected a function expression");
        };
        let Statement::Return(ret) = &func.statements[0] else {
            panic!("expected a return statement");
        };
        assert!(ret.value.is_equivalent(&variable("z", None, None)));
    }

    #[test]
    fn should_pass_context_to_statement_hook() {
        let program = sample_program();
        let mut count = 0usize;
        StatementCounter.visit_all_statements(&program, &mut count);
        // 6 top-level statements, 2 in the function body, 2 in the if branches,
        // 1 getter body, 1 method body, 1 try body, 1 catch body.
        assert_eq!(count, 14);
    }
}
