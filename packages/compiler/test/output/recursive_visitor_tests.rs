use compiler_output_ast::output::output_ast::*;
use compiler_output_ast::{collect_external_references, find_read_var_names, RecursiveAstVisitor};
use std::any::Any;

/// Records the kind of every expression and type node, in hook order.
#[derive(Default)]
struct KindRecorder {
    kinds: Vec<&'static str>,
}

impl RecursiveAstVisitor for KindRecorder {
    fn visit_expression(&mut self, ast: &Expression, context: &mut dyn Any) {
        self.kinds.push(ast.node_kind());
        if let Some(ty) = ast.type_() {
            self.visit_type_annotation(ty, context);
        }
    }

    fn visit_type(&mut self, ty: &Type, _context: &mut dyn Any) {
        self.kinds.push(match ty {
            Type::Builtin(_) => "BuiltinType",
            Type::Expression(_) => "ExpressionType",
            Type::Array(_) => "ArrayType",
            Type::Map(_) => "MapType",
        });
    }
}

/// Counts reads but never looks inside function expressions.
struct ShallowReadCounter;

impl RecursiveAstVisitor for ShallowReadCounter {
    fn visit_function_expr(&mut self, _expr: &FunctionExpr, _context: &mut dyn Any) {}

    fn visit_read_var_expr(&mut self, _expr: &ReadVarExpr, context: &mut dyn Any) {
        if let Some(count) = context.downcast_mut::<usize>() {
            *count += 1;
        }
    }
}

fn external(module: &str, name: &str) -> ExternalReference {
    ExternalReference::new(Some(module.to_string()), Some(name.to_string()))
}

fn point_class() -> Statement {
    ClassStmt::new(
        "Point",
        None,
        vec![ClassField::new("x", None, StmtModifier::empty(), None)],
        vec![],
        ClassMethod::new(None, vec![], vec![], None, StmtModifier::empty()),
        vec![ClassMethod::new(
            Some("getX".to_string()),
            vec![],
            vec![ReturnStatement::new(THIS_EXPR.clone().prop("x", None), None).into()],
            None,
            StmtModifier::empty(),
        )],
        StmtModifier::empty(),
        None,
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_visit_children_before_the_node_itself() {
        let expr = variable("a", None, None).plus(literal(1, None, None), None);
        let mut recorder = KindRecorder::default();
        recorder.visit_expr(&expr, &mut ());
        assert_eq!(
            recorder.kinds,
            vec!["ReadVarExpr", "LiteralExpr", "BinaryOperatorExpr"]
        );
    }

    #[test]
    fn should_visit_type_annotations() {
        let typed = LiteralExpr::new(
            "s",
            Some(Type::Array(ArrayType {
                of: Box::new(STRING_TYPE.clone()),
                modifiers: TypeModifier::empty(),
            })),
            None,
        );
        let mut recorder = KindRecorder::default();
        recorder.visit_expr(&typed.into(), &mut ());
        assert_eq!(recorder.kinds, vec!["LiteralExpr", "BuiltinType", "ArrayType"]);
    }

    #[test]
    fn should_visit_external_type_parameters() {
        let expr = import_expr(
            external("rxjs", "Observable"),
            Some(vec![import_type(external("./model", "User"), None, TypeModifier::empty())]),
            None,
        );
        let mut recorder = KindRecorder::default();
        recorder.visit_expr(&expr, &mut ());
        assert_eq!(
            recorder.kinds,
            vec!["ExternalExpr", "ExpressionType", "ExternalExpr"]
        );
    }

    #[test]
    fn should_prune_overridden_subtrees() {
        let stmts = vec![
            variable("a", None, None).to_stmt(),
            fn_expr(
                vec![],
                vec![variable("b", None, None).to_stmt(), variable("c", None, None).to_stmt()],
                None,
                None,
                None,
            )
            .to_stmt(),
        ];
        let mut count = 0usize;
        ShallowReadCounter.visit_all_statements(&stmts, &mut count);
        assert_eq!(count, 1);
    }

    #[test]
    fn should_exclude_reads_inside_nested_function_declarations() {
        let inner = FunctionExpr::new(
            vec![],
            vec![ReturnStatement::new(variable("y", None, None), None).into()],
            None,
            None,
            None,
        )
        .to_decl_stmt("inner", StmtModifier::empty());
        let stmts = vec![variable("x", None, None).to_stmt(), inner.into()];
        let names = find_read_var_names(&stmts);
        assert_eq!(names.len(), 1);
        assert!(names.contains("x"));
        assert!(!names.contains("y"));
    }

    #[test]
    fn should_exclude_reads_inside_nested_classes() {
        let stmts = vec![
            point_class(),
            DeclareVarStmt::new(
                "p",
                Some(variable("Point", None, None).instantiate(vec![variable("seed", None, None)], None, None)),
                None,
                StmtModifier::empty(),
                None,
            )
            .into(),
        ];
        let names: Vec<_> = find_read_var_names(&stmts).into_iter().collect();
        assert_eq!(names, vec!["Point".to_string(), "seed".to_string()]);
    }

    #[test]
    fn should_find_no_external_references_in_plain_class() {
        assert!(collect_external_references(&[point_class()]).is_empty());
    }

    #[test]
    fn should_collect_external_references_from_every_position() {
        let stmts = vec![
            DeclareVarStmt::new(
                "svc",
                Some(import_expr(external("@angular/core", "inject"), None, None).call_fn(
                    vec![import_expr(external("./svc", "Service"), None, None)],
                    None,
                )),
                None,
                StmtModifier::FINAL,
                None,
            )
            .into(),
            if_stmt(
                variable("svc", None, None),
                vec![ThrowStmt::new(
                    import_expr(external("./errors", "Failure"), None, None).instantiate(
                        vec![],
                        None,
                        None,
                    ),
                    None,
                )
                .into()],
                None,
            ),
        ];
        let names: Vec<_> = collect_external_references(&stmts)
            .into_iter()
            .filter_map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["inject", "Service", "Failure"]);
    }

    #[test]
    fn should_collect_external_references_from_class_member_types() {
        let dep_type = || import_type(external("./dep", "Dep"), None, TypeModifier::empty());
        let stmts = vec![ClassStmt::new(
            "Widget",
            None,
            vec![],
            vec![ClassGetter::new(
                "current",
                vec![ReturnStatement::new(THIS_EXPR.clone().prop("dep", None), None).into()],
                Some(dep_type()),
                StmtModifier::empty(),
            )],
            ClassMethod::new(
                None,
                vec![FnParam::new("dep", Some(dep_type()))],
                vec![],
                None,
                StmtModifier::empty(),
            ),
            vec![ClassMethod::new(
                Some("replace".to_string()),
                vec![FnParam::new("next", None)],
                vec![],
                Some(dep_type()),
                StmtModifier::empty(),
            )],
            StmtModifier::empty(),
            None,
        )
        .into()];
        let refs = collect_external_references(&stmts);
        assert_eq!(refs.len(), 3);
        assert!(refs.iter().all(|r| r.name.as_deref() == Some("Dep")));
    }
}
