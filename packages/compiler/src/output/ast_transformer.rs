//! AST Transformer
//!
//! Rebuilds an output AST bottom-up. Every non-leaf node is reconstructed
//! from its transformed children, then handed to `transform_expr` or
//! `transform_stmt`. Implementors usually override only those two hooks.

use crate::output::output_ast::*;
use std::any::Any;

pub trait AstTransformer {
    /// Called with every freshly built expression.
    fn transform_expr(&mut self, expr: Expression, _context: &mut dyn Any) -> Expression {
        expr
    }

    /// Called with every freshly built statement.
    fn transform_stmt(&mut self, stmt: Statement, _context: &mut dyn Any) -> Statement {
        stmt
    }

    fn visit_expr(&mut self, expr: &Expression, context: &mut dyn Any) -> Expression {
        match expr {
            Expression::ReadVar(e) => self.visit_read_var_expr(e, context),
            Expression::WriteVar(e) => self.visit_write_var_expr(e, context),
            Expression::WriteKey(e) => self.visit_write_key_expr(e, context),
            Expression::WriteProp(e) => self.visit_write_prop_expr(e, context),
            Expression::InvokeMethod(e) => self.visit_invoke_method_expr(e, context),
            Expression::InvokeFn(e) => self.visit_invoke_function_expr(e, context),
            Expression::Instantiate(e) => self.visit_instantiate_expr(e, context),
            Expression::Literal(e) => self.visit_literal_expr(e, context),
            Expression::External(e) => self.visit_external_expr(e, context),
            Expression::Conditional(e) => self.visit_conditional_expr(e, context),
            Expression::NotExpr(e) => self.visit_not_expr(e, context),
            Expression::AssertNotNull(e) => self.visit_assert_not_null_expr(e, context),
            Expression::Cast(e) => self.visit_cast_expr(e, context),
            Expression::Fn(e) => self.visit_function_expr(e, context),
            Expression::BinaryOp(e) => self.visit_binary_operator_expr(e, context),
            Expression::ReadProp(e) => self.visit_read_prop_expr(e, context),
            Expression::ReadKey(e) => self.visit_read_key_expr(e, context),
            Expression::LiteralArray(e) => self.visit_literal_array_expr(e, context),
            Expression::LiteralMap(e) => self.visit_literal_map_expr(e, context),
            Expression::CommaExpr(e) => self.visit_comma_expr(e, context),
        }
    }

    fn visit_stmt(&mut self, stmt: &Statement, context: &mut dyn Any) -> Statement {
        match stmt {
            Statement::DeclareVar(s) => self.visit_declare_var_stmt(s, context),
            Statement::DeclareFn(s) => self.visit_declare_function_stmt(s, context),
            Statement::Expression(s) => self.visit_expression_stmt(s, context),
            Statement::Return(s) => self.visit_return_stmt(s, context),
            Statement::DeclareClass(s) => self.visit_declare_class_stmt(s, context),
            Statement::IfStmt(s) => self.visit_if_stmt(s, context),
            Statement::TryCatch(s) => self.visit_try_catch_stmt(s, context),
            Statement::Throw(s) => self.visit_throw_stmt(s, context),
            Statement::Comment(s) => self.visit_comment_stmt(s, context),
            Statement::JSDocComment(s) => self.visit_jsdoc_comment_stmt(s, context),
        }
    }

    fn visit_all_expressions(
        &mut self,
        exprs: &[Expression],
        context: &mut dyn Any,
    ) -> Vec<Expression> {
        exprs.iter().map(|e| self.visit_expr(e, context)).collect()
    }

    fn visit_all_statements(&mut self, stmts: &[Statement], context: &mut dyn Any) -> Vec<Statement> {
        stmts.iter().map(|s| self.visit_stmt(s, context)).collect()
    }

    // Expressions

    fn visit_read_var_expr(&mut self, expr: &ReadVarExpr, context: &mut dyn Any) -> Expression {
        self.transform_expr(expr.clone().into(), context)
    }

    fn visit_write_var_expr(&mut self, expr: &WriteVarExpr, context: &mut dyn Any) -> Expression {
        let value = self.visit_expr(&expr.value, context);
        let rebuilt = WriteVarExpr {
            name: expr.name.clone(),
            value: Box::new(value),
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_write_key_expr(&mut self, expr: &WriteKeyExpr, context: &mut dyn Any) -> Expression {
        let receiver = self.visit_expr(&expr.receiver, context);
        let index = self.visit_expr(&expr.index, context);
        let value = self.visit_expr(&expr.value, context);
        let rebuilt = WriteKeyExpr {
            receiver: Box::new(receiver),
            index: Box::new(index),
            value: Box::new(value),
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_write_prop_expr(&mut self, expr: &WritePropExpr, context: &mut dyn Any) -> Expression {
        let receiver = self.visit_expr(&expr.receiver, context);
        let value = self.visit_expr(&expr.value, context);
        let rebuilt = WritePropExpr {
            receiver: Box::new(receiver),
            name: expr.name.clone(),
            value: Box::new(value),
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_invoke_method_expr(
        &mut self,
        expr: &InvokeMethodExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let receiver = self.visit_expr(&expr.receiver, context);
        let args = self.visit_all_expressions(&expr.args, context);
        let rebuilt = InvokeMethodExpr {
            receiver: Box::new(receiver),
            method: expr.method.clone(),
            args,
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_invoke_function_expr(
        &mut self,
        expr: &InvokeFunctionExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let fn_ = self.visit_expr(&expr.fn_, context);
        let args = self.visit_all_expressions(&expr.args, context);
        let rebuilt = InvokeFunctionExpr {
            fn_: Box::new(fn_),
            args,
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_instantiate_expr(
        &mut self,
        expr: &InstantiateExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let class_expr = self.visit_expr(&expr.class_expr, context);
        let args = self.visit_all_expressions(&expr.args, context);
        let rebuilt = InstantiateExpr {
            class_expr: Box::new(class_expr),
            args,
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_literal_expr(&mut self, expr: &LiteralExpr, context: &mut dyn Any) -> Expression {
        self.transform_expr(expr.clone().into(), context)
    }

    fn visit_external_expr(&mut self, expr: &ExternalExpr, context: &mut dyn Any) -> Expression {
        self.transform_expr(expr.clone().into(), context)
    }

    fn visit_conditional_expr(
        &mut self,
        expr: &ConditionalExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let condition = self.visit_expr(&expr.condition, context);
        let true_case = self.visit_expr(&expr.true_case, context);
        let false_case = expr
            .false_case
            .as_ref()
            .map(|e| Box::new(self.visit_expr(e, context)));
        let rebuilt = ConditionalExpr {
            condition: Box::new(condition),
            true_case: Box::new(true_case),
            false_case,
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_not_expr(&mut self, expr: &NotExpr, context: &mut dyn Any) -> Expression {
        let condition = self.visit_expr(&expr.condition, context);
        let rebuilt = NotExpr::new(condition, expr.source_span.clone());
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_assert_not_null_expr(
        &mut self,
        expr: &AssertNotNullExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let condition = self.visit_expr(&expr.condition, context);
        let rebuilt = AssertNotNullExpr {
            condition: Box::new(condition),
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_cast_expr(&mut self, expr: &CastExpr, context: &mut dyn Any) -> Expression {
        let value = self.visit_expr(&expr.value, context);
        let rebuilt = CastExpr::new(value, expr.type_.clone(), expr.source_span.clone());
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_function_expr(&mut self, expr: &FunctionExpr, context: &mut dyn Any) -> Expression {
        let statements = self.visit_all_statements(&expr.statements, context);
        let rebuilt = FunctionExpr::new(
            expr.params.clone(),
            statements,
            expr.type_.clone(),
            expr.source_span.clone(),
            expr.name.clone(),
        );
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_binary_operator_expr(
        &mut self,
        expr: &BinaryOperatorExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let lhs = self.visit_expr(&expr.lhs, context);
        let rhs = self.visit_expr(&expr.rhs, context);
        let rebuilt = BinaryOperatorExpr {
            operator: expr.operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_read_prop_expr(&mut self, expr: &ReadPropExpr, context: &mut dyn Any) -> Expression {
        let receiver = self.visit_expr(&expr.receiver, context);
        let rebuilt = ReadPropExpr::new(
            receiver,
            expr.name.clone(),
            expr.type_.clone(),
            expr.source_span.clone(),
        );
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_read_key_expr(&mut self, expr: &ReadKeyExpr, context: &mut dyn Any) -> Expression {
        let receiver = self.visit_expr(&expr.receiver, context);
        let index = self.visit_expr(&expr.index, context);
        let rebuilt = ReadKeyExpr::new(
            receiver,
            index,
            expr.type_.clone(),
            expr.source_span.clone(),
        );
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_literal_array_expr(
        &mut self,
        expr: &LiteralArrayExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let entries = self.visit_all_expressions(&expr.entries, context);
        let rebuilt = LiteralArrayExpr::new(entries, expr.type_.clone(), expr.source_span.clone());
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_literal_map_expr(
        &mut self,
        expr: &LiteralMapExpr,
        context: &mut dyn Any,
    ) -> Expression {
        let entries = expr
            .entries
            .iter()
            .map(|entry| {
                LiteralMapEntry::new(
                    entry.key.clone(),
                    self.visit_expr(&entry.value, context),
                    entry.quoted,
                )
            })
            .collect();
        let rebuilt = LiteralMapExpr {
            entries,
            type_: expr.type_.clone(),
            source_span: expr.source_span.clone(),
        };
        self.transform_expr(rebuilt.into(), context)
    }

    fn visit_comma_expr(&mut self, expr: &CommaExpr, context: &mut dyn Any) -> Expression {
        let parts = self.visit_all_expressions(&expr.parts, context);
        let rebuilt = CommaExpr::new(parts, expr.source_span.clone());
        self.transform_expr(rebuilt.into(), context)
    }

    // Statements

    fn visit_declare_var_stmt(&mut self, stmt: &DeclareVarStmt, context: &mut dyn Any) -> Statement {
        let value = stmt
            .value
            .as_ref()
            .map(|v| Box::new(self.visit_expr(v, context)));
        let rebuilt = DeclareVarStmt {
            name: stmt.name.clone(),
            value,
            type_: stmt.type_.clone(),
            modifiers: stmt.modifiers,
            source_span: stmt.source_span.clone(),
        };
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_declare_function_stmt(
        &mut self,
        stmt: &DeclareFunctionStmt,
        context: &mut dyn Any,
    ) -> Statement {
        let statements = self.visit_all_statements(&stmt.statements, context);
        let rebuilt = DeclareFunctionStmt::new(
            stmt.name.clone(),
            stmt.params.clone(),
            statements,
            stmt.type_.clone(),
            stmt.modifiers,
            stmt.source_span.clone(),
        );
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_expression_stmt(
        &mut self,
        stmt: &ExpressionStatement,
        context: &mut dyn Any,
    ) -> Statement {
        let expr = self.visit_expr(&stmt.expr, context);
        let rebuilt = ExpressionStatement::new(expr, stmt.source_span.clone());
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnStatement, context: &mut dyn Any) -> Statement {
        let value = self.visit_expr(&stmt.value, context);
        let rebuilt = ReturnStatement::new(value, stmt.source_span.clone());
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_declare_class_stmt(&mut self, stmt: &ClassStmt, context: &mut dyn Any) -> Statement {
        let parent = stmt
            .parent
            .as_ref()
            .map(|p| Box::new(self.visit_expr(p, context)));
        let fields = stmt
            .fields
            .iter()
            .map(|field| ClassField {
                name: field.name.clone(),
                type_: field.type_.clone(),
                modifiers: field.modifiers,
                initializer: field
                    .initializer
                    .as_ref()
                    .map(|init| Box::new(self.visit_expr(init, context))),
            })
            .collect();
        let getters = stmt
            .getters
            .iter()
            .map(|getter| {
                ClassGetter::new(
                    getter.name.clone(),
                    self.visit_all_statements(&getter.body, context),
                    getter.type_.clone(),
                    getter.modifiers,
                )
            })
            .collect();
        let constructor_method = self.visit_class_method(&stmt.constructor_method, context);
        let methods = stmt
            .methods
            .iter()
            .map(|method| self.visit_class_method(method, context))
            .collect();
        let rebuilt = ClassStmt {
            name: stmt.name.clone(),
            parent,
            fields,
            getters,
            constructor_method,
            methods,
            modifiers: stmt.modifiers,
            source_span: stmt.source_span.clone(),
        };
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_class_method(&mut self, method: &ClassMethod, context: &mut dyn Any) -> ClassMethod {
        ClassMethod::new(
            method.name.clone(),
            method.params.clone(),
            self.visit_all_statements(&method.body, context),
            method.type_.clone(),
            method.modifiers,
        )
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt, context: &mut dyn Any) -> Statement {
        let condition = self.visit_expr(&stmt.condition, context);
        let true_case = self.visit_all_statements(&stmt.true_case, context);
        let false_case = self.visit_all_statements(&stmt.false_case, context);
        let rebuilt = IfStmt::new(condition, true_case, false_case, stmt.source_span.clone());
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_try_catch_stmt(&mut self, stmt: &TryCatchStmt, context: &mut dyn Any) -> Statement {
        let body_stmts = self.visit_all_statements(&stmt.body_stmts, context);
        let catch_stmts = self.visit_all_statements(&stmt.catch_stmts, context);
        let rebuilt = TryCatchStmt::new(body_stmts, catch_stmts, stmt.source_span.clone());
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_throw_stmt(&mut self, stmt: &ThrowStmt, context: &mut dyn Any) -> Statement {
        let error = self.visit_expr(&stmt.error, context);
        let rebuilt = ThrowStmt::new(error, stmt.source_span.clone());
        self.transform_stmt(rebuilt.into(), context)
    }

    fn visit_comment_stmt(&mut self, stmt: &CommentStmt, context: &mut dyn Any) -> Statement {
        self.transform_stmt(stmt.clone().into(), context)
    }

    fn visit_jsdoc_comment_stmt(
        &mut self,
        stmt: &JSDocCommentStmt,
        context: &mut dyn Any,
    ) -> Statement {
        self.transform_stmt(stmt.clone().into(), context)
    }
}
