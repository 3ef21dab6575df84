//! Recursive AST Visitor
//!
//! Read-only walk over a whole output AST, type annotations included.
//! Analyses implement this trait and override the methods for the nodes they
//! care about. Overriding a node method without calling back into the
//! children prunes that subtree.

use crate::output::output_ast::*;
use std::any::Any;

pub trait RecursiveAstVisitor {
    /// Universal hook for type nodes, called after the node's own children.
    fn visit_type(&mut self, _ty: &Type, _context: &mut dyn Any) {}

    /// Universal hook for expressions, called after the node's own children.
    /// Descends into the expression's type annotation by default.
    fn visit_expression(&mut self, ast: &Expression, context: &mut dyn Any) {
        if let Some(ty) = ast.type_() {
            self.visit_type_annotation(ty, context);
        }
    }

    fn visit_type_annotation(&mut self, ty: &Type, context: &mut dyn Any) {
        match ty {
            Type::Builtin(t) => self.visit_builtin_type(t, context),
            Type::Expression(t) => self.visit_expression_type(t, context),
            Type::Array(t) => self.visit_array_type(t, context),
            Type::Map(t) => self.visit_map_type(t, context),
        }
        self.visit_type(ty, context);
    }

    fn visit_expr(&mut self, expr: &Expression, context: &mut dyn Any) {
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
        self.visit_expression(expr, context);
    }

    fn visit_stmt(&mut self, stmt: &Statement, context: &mut dyn Any) {
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

    fn visit_all_expressions(&mut self, exprs: &[Expression], context: &mut dyn Any) {
        for expr in exprs {
            self.visit_expr(expr, context);
        }
    }

    fn visit_all_statements(&mut self, stmts: &[Statement], context: &mut dyn Any) {
        for stmt in stmts {
            self.visit_stmt(stmt, context);
        }
    }

    fn visit_params(&mut self, params: &[FnParam], context: &mut dyn Any) {
        for ty in params.iter().filter_map(|p| p.type_.as_ref()) {
            self.visit_type_annotation(ty, context);
        }
    }

    // Types

    fn visit_builtin_type(&mut self, _ty: &BuiltinType, _context: &mut dyn Any) {}

    fn visit_expression_type(&mut self, ty: &ExpressionType, context: &mut dyn Any) {
        self.visit_expr(&ty.value, context);
    }

    fn visit_array_type(&mut self, ty: &ArrayType, context: &mut dyn Any) {
        self.visit_type_annotation(&ty.of, context);
    }

    fn visit_map_type(&mut self, ty: &MapType, context: &mut dyn Any) {
        if let Some(value_type) = &ty.value_type {
            self.visit_type_annotation(value_type, context);
        }
    }

    // Expressions

    fn visit_read_var_expr(&mut self, _expr: &ReadVarExpr, _context: &mut dyn Any) {}

    fn visit_write_var_expr(&mut self, expr: &WriteVarExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.value, context);
    }

    fn visit_write_key_expr(&mut self, expr: &WriteKeyExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.receiver, context);
        self.visit_expr(&expr.index, context);
        self.visit_expr(&expr.value, context);
    }

    fn visit_write_prop_expr(&mut self, expr: &WritePropExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.receiver, context);
        self.visit_expr(&expr.value, context);
    }

    fn visit_invoke_method_expr(&mut self, expr: &InvokeMethodExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.receiver, context);
        self.visit_all_expressions(&expr.args, context);
    }

    fn visit_invoke_function_expr(&mut self, expr: &InvokeFunctionExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.fn_, context);
        self.visit_all_expressions(&expr.args, context);
    }

    fn visit_instantiate_expr(&mut self, expr: &InstantiateExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.class_expr, context);
        self.visit_all_expressions(&expr.args, context);
    }

    fn visit_literal_expr(&mut self, _expr: &LiteralExpr, _context: &mut dyn Any) {}

    fn visit_external_expr(&mut self, expr: &ExternalExpr, context: &mut dyn Any) {
        if let Some(type_params) = &expr.type_params {
            for ty in type_params {
                self.visit_type_annotation(ty, context);
            }
        }
    }

    fn visit_conditional_expr(&mut self, expr: &ConditionalExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.condition, context);
        self.visit_expr(&expr.true_case, context);
        if let Some(false_case) = &expr.false_case {
            self.visit_expr(false_case, context);
        }
    }

    fn visit_not_expr(&mut self, expr: &NotExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.condition, context);
    }

    fn visit_assert_not_null_expr(&mut self, expr: &AssertNotNullExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.condition, context);
    }

    fn visit_cast_expr(&mut self, expr: &CastExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.value, context);
    }

    fn visit_function_expr(&mut self, expr: &FunctionExpr, context: &mut dyn Any) {
        self.visit_params(&expr.params, context);
        self.visit_all_statements(&expr.statements, context);
    }

    fn visit_binary_operator_expr(&mut self, expr: &BinaryOperatorExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.lhs, context);
        self.visit_expr(&expr.rhs, context);
    }

    fn visit_read_prop_expr(&mut self, expr: &ReadPropExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.receiver, context);
    }

    fn visit_read_key_expr(&mut self, expr: &ReadKeyExpr, context: &mut dyn Any) {
        self.visit_expr(&expr.receiver, context);
        self.visit_expr(&expr.index, context);
    }

    fn visit_literal_array_expr(&mut self, expr: &LiteralArrayExpr, context: &mut dyn Any) {
        self.visit_all_expressions(&expr.entries, context);
    }

    fn visit_literal_map_expr(&mut self, expr: &LiteralMapExpr, context: &mut dyn Any) {
        for entry in &expr.entries {
            self.visit_expr(&entry.value, context);
        }
    }

    fn visit_comma_expr(&mut self, expr: &CommaExpr, context: &mut dyn Any) {
        self.visit_all_expressions(&expr.parts, context);
    }

    // Statements

    fn visit_declare_var_stmt(&mut self, stmt: &DeclareVarStmt, context: &mut dyn Any) {
        if let Some(value) = &stmt.value {
            self.visit_expr(value, context);
        }
        if let Some(ty) = &stmt.type_ {
            self.visit_type_annotation(ty, context);
        }
    }

    fn visit_declare_function_stmt(&mut self, stmt: &DeclareFunctionStmt, context: &mut dyn Any) {
        self.visit_params(&stmt.params, context);
        self.visit_all_statements(&stmt.statements, context);
        if let Some(ty) = &stmt.type_ {
            self.visit_type_annotation(ty, context);
        }
    }

    fn visit_expression_stmt(&mut self, stmt: &ExpressionStatement, context: &mut dyn Any) {
        self.visit_expr(&stmt.expr, context);
    }

    fn visit_return_stmt(&mut self, stmt: &ReturnStatement, context: &mut dyn Any) {
        self.visit_expr(&stmt.value, context);
    }

    fn visit_declare_class_stmt(&mut self, stmt: &ClassStmt, context: &mut dyn Any) {
        if let Some(parent) = &stmt.parent {
            self.visit_expr(parent, context);
        }
        for field in &stmt.fields {
            if let Some(ty) = &field.type_ {
                self.visit_type_annotation(ty, context);
            }
            if let Some(initializer) = &field.initializer {
                self.visit_expr(initializer, context);
            }
        }
        for getter in &stmt.getters {
            self.visit_all_statements(&getter.body, context);
            if let Some(ty) = &getter.type_ {
                self.visit_type_annotation(ty, context);
            }
        }
        self.visit_class_method(&stmt.constructor_method, context);
        for method in &stmt.methods {
            self.visit_class_method(method, context);
        }
    }

    fn visit_class_method(&mut self, method: &ClassMethod, context: &mut dyn Any) {
        self.visit_params(&method.params, context);
        self.visit_all_statements(&method.body, context);
        if let Some(ty) = &method.type_ {
            self.visit_type_annotation(ty, context);
        }
    }

    fn visit_if_stmt(&mut self, stmt: &IfStmt, context: &mut dyn Any) {
        self.visit_expr(&stmt.condition, context);
        self.visit_all_statements(&stmt.true_case, context);
        self.visit_all_statements(&stmt.false_case, context);
    }

    fn visit_try_catch_stmt(&mut self, stmt: &TryCatchStmt, context: &mut dyn Any) {
        self.visit_all_statements(&stmt.body_stmts, context);
        self.visit_all_statements(&stmt.catch_stmts, context);
    }

    fn visit_throw_stmt(&mut self, stmt: &ThrowStmt, context: &mut dyn Any) {
        self.visit_expr(&stmt.error, context);
    }

    fn visit_comment_stmt(&mut self, _stmt: &CommentStmt, _context: &mut dyn Any) {}

    fn visit_jsdoc_comment_stmt(&mut self, _stmt: &JSDocCommentStmt, _context: &mut dyn Any) {}
}
