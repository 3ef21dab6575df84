//! Output AST Module
//!
//! Defines the target-agnostic AST for generated code: type annotations,
//! expressions and statements. Front ends build these trees directly and
//! printers render them through the visitor traits below.

use crate::error::{OutputAstError, Result};
use crate::output::jsdoc::{serialize_tags, JSDocTag};
use crate::parse_util::ParseSourceSpan;
use bitflags::bitflags;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

//// Types

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeModifier: u8 {
        const CONST = 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeName {
    Dynamic,
    Bool,
    String,
    Int,
    Number,
    Function,
    Inferred,
}

#[derive(Debug, Clone)]
pub struct BuiltinType {
    pub name: BuiltinTypeName,
    pub modifiers: TypeModifier,
}

impl BuiltinType {
    pub const fn new(name: BuiltinTypeName, modifiers: TypeModifier) -> Self {
        BuiltinType { name, modifiers }
    }
}

/// A type expressed as a reference to a symbol, e.g. an imported class.
#[derive(Debug, Clone)]
pub struct ExpressionType {
    pub value: Box<Expression>,
    pub modifiers: TypeModifier,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub of: Box<Type>,
    pub modifiers: TypeModifier,
}

/// A string-keyed map type.
#[derive(Debug, Clone)]
pub struct MapType {
    pub value_type: Option<Box<Type>>,
    pub modifiers: TypeModifier,
}

impl MapType {
    pub fn new(value_type: Option<Type>, modifiers: TypeModifier) -> Self {
        MapType {
            value_type: value_type.map(Box::new),
            modifiers,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Type {
    Builtin(BuiltinType),
    Expression(ExpressionType),
    Array(ArrayType),
    Map(MapType),
}

impl Type {
    pub fn modifiers(&self) -> TypeModifier {
        match self {
            Type::Builtin(t) => t.modifiers,
            Type::Expression(t) => t.modifiers,
            Type::Array(t) => t.modifiers,
            Type::Map(t) => t.modifiers,
        }
    }

    pub fn has_modifier(&self, modifier: TypeModifier) -> bool {
        self.modifiers().contains(modifier)
    }

    pub fn visit_type<V: TypeVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        context: &mut dyn Any,
    ) -> V::Output {
        match self {
            Type::Builtin(t) => visitor.visit_builtin_type(t, context),
            Type::Expression(t) => visitor.visit_expression_type(t, context),
            Type::Array(t) => visitor.visit_array_type(t, context),
            Type::Map(t) => visitor.visit_map_type(t, context),
        }
    }
}

const fn builtin_type(name: BuiltinTypeName) -> Type {
    Type::Builtin(BuiltinType::new(name, TypeModifier::empty()))
}

// Predefined types
pub static DYNAMIC_TYPE: Type = builtin_type(BuiltinTypeName::Dynamic);
pub static INFERRED_TYPE: Type = builtin_type(BuiltinTypeName::Inferred);
pub static BOOL_TYPE: Type = builtin_type(BuiltinTypeName::Bool);
pub static INT_TYPE: Type = builtin_type(BuiltinTypeName::Int);
pub static NUMBER_TYPE: Type = builtin_type(BuiltinTypeName::Number);
pub static STRING_TYPE: Type = builtin_type(BuiltinTypeName::String);
pub static FUNCTION_TYPE: Type = builtin_type(BuiltinTypeName::Function);

pub trait TypeVisitor {
    type Output;

    fn visit_builtin_type(&mut self, type_: &BuiltinType, context: &mut dyn Any) -> Self::Output;
    fn visit_expression_type(
        &mut self,
        type_: &ExpressionType,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_array_type(&mut self, type_: &ArrayType, context: &mut dyn Any) -> Self::Output;
    fn visit_map_type(&mut self, type_: &MapType, context: &mut dyn Any) -> Self::Output;
}

///// Equivalence

/// Structural "produces the same value" comparison. Type annotations and
/// source spans never take part in it.
pub trait IsEquivalent {
    fn is_equivalent(&self, other: &Self) -> bool;
}

/// Both absent counts as equivalent, exactly one absent does not.
pub fn null_safe_is_equivalent<T: IsEquivalent + ?Sized>(
    base: Option<&T>,
    other: Option<&T>,
) -> bool {
    match (base, other) {
        (Some(base), Some(other)) => base.is_equivalent(other),
        (None, None) => true,
        _ => false,
    }
}

pub fn are_all_equivalent<T: IsEquivalent>(base: &[T], other: &[T]) -> bool {
    base.len() == other.len() && base.iter().zip(other).all(|(a, b)| a.is_equivalent(b))
}

///// Expressions

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    Identical,
    NotIdentical,
    Minus,
    Plus,
    Divide,
    Multiply,
    Modulo,
    And,
    Or,
    Lower,
    LowerEquals,
    Bigger,
    BiggerEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinVar {
    This,
    Super,
    CatchError,
    CatchStack,
}

impl fmt::Display for BuiltinVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The variable a `ReadVarExpr` refers to: a plain identifier or one of the
/// builtin pseudo-variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarName {
    Named(String),
    Builtin(BuiltinVar),
}

impl From<&str> for VarName {
    fn from(name: &str) -> Self {
        VarName::Named(name.to_string())
    }
}

impl From<String> for VarName {
    fn from(name: String) -> Self {
        VarName::Named(name)
    }
}

impl From<BuiltinVar> for VarName {
    fn from(builtin: BuiltinVar) -> Self {
        VarName::Builtin(builtin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinMethod {
    ConcatArray,
    SubscribeObservable,
    Bind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodName {
    Named(String),
    Builtin(BuiltinMethod),
}

impl From<&str> for MethodName {
    fn from(name: &str) -> Self {
        MethodName::Named(name.to_string())
    }
}

impl From<String> for MethodName {
    fn from(name: String) -> Self {
        MethodName::Named(name)
    }
}

impl From<BuiltinMethod> for MethodName {
    fn from(builtin: BuiltinMethod) -> Self {
        MethodName::Builtin(builtin)
    }
}

#[derive(Debug, Clone)]
pub struct ReadVarExpr {
    pub name: VarName,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ReadVarExpr {
    pub fn new(
        name: impl Into<VarName>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        ReadVarExpr {
            name: name.into(),
            type_,
            source_span,
        }
    }

    /// The identifier, or `None` for a builtin variable.
    pub fn name(&self) -> Option<&str> {
        match &self.name {
            VarName::Named(name) => Some(name),
            VarName::Builtin(_) => None,
        }
    }

    pub fn builtin(&self) -> Option<BuiltinVar> {
        match self.name {
            VarName::Named(_) => None,
            VarName::Builtin(builtin) => Some(builtin),
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
    }

    pub fn set(self, value: Expression) -> Result<WriteVarExpr> {
        match self.name {
            VarName::Named(name) => Ok(WriteVarExpr::new(name, value, None, self.source_span)),
            VarName::Builtin(builtin) => Err(OutputAstError::BuiltinVariableAssignment(builtin)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WriteVarExpr {
    pub name: String,
    pub value: Box<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl WriteVarExpr {
    pub fn new(
        name: impl Into<String>,
        value: Expression,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        WriteVarExpr {
            name: name.into(),
            type_: type_.or_else(|| value.type_().cloned()),
            value: Box::new(value),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name && self.value.is_equivalent(&other.value)
    }

    pub fn to_decl_stmt(self, type_: Option<Type>, modifiers: StmtModifier) -> DeclareVarStmt {
        DeclareVarStmt::new(
            self.name,
            Some(*self.value),
            type_,
            modifiers,
            self.source_span,
        )
    }
}

#[derive(Debug, Clone)]
pub struct WriteKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
    pub value: Box<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl WriteKeyExpr {
    pub fn new(
        receiver: Expression,
        index: Expression,
        value: Expression,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        WriteKeyExpr {
            receiver: Box::new(receiver),
            index: Box::new(index),
            type_: type_.or_else(|| value.type_().cloned()),
            value: Box::new(value),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.receiver.is_equivalent(&other.receiver)
            && self.index.is_equivalent(&other.index)
            && self.value.is_equivalent(&other.value)
    }
}

#[derive(Debug, Clone)]
pub struct WritePropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
    pub value: Box<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl WritePropExpr {
    pub fn new(
        receiver: Expression,
        name: impl Into<String>,
        value: Expression,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        WritePropExpr {
            receiver: Box::new(receiver),
            name: name.into(),
            type_: type_.or_else(|| value.type_().cloned()),
            value: Box::new(value),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.receiver.is_equivalent(&other.receiver)
            && self.name == other.name
            && self.value.is_equivalent(&other.value)
    }
}

#[derive(Debug, Clone)]
pub struct InvokeMethodExpr {
    pub receiver: Box<Expression>,
    pub method: MethodName,
    pub args: Vec<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl InvokeMethodExpr {
    pub fn new(
        receiver: Expression,
        method: impl Into<MethodName>,
        args: Vec<Expression>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        InvokeMethodExpr {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.receiver.is_equivalent(&other.receiver)
            && self.method == other.method
            && are_all_equivalent(&self.args, &other.args)
    }
}

#[derive(Debug, Clone)]
pub struct InvokeFunctionExpr {
    pub fn_: Box<Expression>,
    pub args: Vec<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl InvokeFunctionExpr {
    pub fn new(
        fn_: Expression,
        args: Vec<Expression>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        InvokeFunctionExpr {
            fn_: Box::new(fn_),
            args,
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.fn_.is_equivalent(&other.fn_) && are_all_equivalent(&self.args, &other.args)
    }
}

#[derive(Debug, Clone)]
pub struct InstantiateExpr {
    pub class_expr: Box<Expression>,
    pub args: Vec<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl InstantiateExpr {
    pub fn new(
        class_expr: Expression,
        args: Vec<Expression>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        InstantiateExpr {
            class_expr: Box::new(class_expr),
            args,
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.class_expr.is_equivalent(&other.class_expr)
            && are_all_equivalent(&self.args, &other.args)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Undefined,
    String(String),
    Number(f64),
    Bool(bool),
}

impl LiteralValue {
    pub fn is_equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            // NaN literals are equivalent to each other so equivalence stays reflexive.
            (LiteralValue::Number(a), LiteralValue::Number(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            _ => self == other,
        }
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(n)
    }
}

impl From<i32> for LiteralValue {
    fn from(n: i32) -> Self {
        LiteralValue::Number(f64::from(n))
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl LiteralExpr {
    pub fn new(
        value: impl Into<LiteralValue>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        LiteralExpr {
            value: value.into(),
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.value.is_equivalent(&other.value)
    }
}

/// Opaque runtime value backing an external reference, e.g. the symbol
/// itself when generating code for immediate evaluation.
pub type RuntimeRef = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Default)]
pub struct ExternalReference {
    pub module_name: Option<String>,
    pub name: Option<String>,
    pub runtime: Option<RuntimeRef>,
}

impl ExternalReference {
    pub fn new(module_name: Option<String>, name: Option<String>) -> Self {
        ExternalReference {
            module_name,
            name,
            runtime: None,
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimeRef) -> Self {
        self.runtime = Some(runtime);
        self
    }
}

impl fmt::Debug for ExternalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalReference")
            .field("module_name", &self.module_name)
            .field("name", &self.name)
            .field("runtime", &self.runtime.as_ref().map(|_| ".."))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ExternalExpr {
    pub value: ExternalReference,
    pub type_: Option<Type>,
    pub type_params: Option<Vec<Type>>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ExternalExpr {
    pub fn new(
        value: ExternalReference,
        type_: Option<Type>,
        type_params: Option<Vec<Type>>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        ExternalExpr {
            value,
            type_,
            type_params,
            source_span,
        }
    }

    /// Compares module and symbol name only; the runtime handle is not part of
    /// the generated value.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.value.module_name == other.value.module_name && self.value.name == other.value.name
    }
}

#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub condition: Box<Expression>,
    pub true_case: Box<Expression>,
    pub false_case: Option<Box<Expression>>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ConditionalExpr {
    pub fn new(
        condition: Expression,
        true_case: Expression,
        false_case: Option<Expression>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        ConditionalExpr {
            condition: Box::new(condition),
            type_: type_.or_else(|| true_case.type_().cloned()),
            true_case: Box::new(true_case),
            false_case: false_case.map(Box::new),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.condition.is_equivalent(&other.condition)
            && self.true_case.is_equivalent(&other.true_case)
            && null_safe_is_equivalent(self.false_case.as_deref(), other.false_case.as_deref())
    }
}

/// Logical negation. Always typed as `BOOL_TYPE`.
#[derive(Debug, Clone)]
pub struct NotExpr {
    pub condition: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

impl NotExpr {
    pub fn new(condition: Expression, source_span: Option<ParseSourceSpan>) -> Self {
        NotExpr {
            condition: Box::new(condition),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.condition.is_equivalent(&other.condition)
    }
}

#[derive(Debug, Clone)]
pub struct AssertNotNullExpr {
    pub condition: Box<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl AssertNotNullExpr {
    pub fn new(condition: Expression, source_span: Option<ParseSourceSpan>) -> Self {
        AssertNotNullExpr {
            type_: condition.type_().cloned(),
            condition: Box::new(condition),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.condition.is_equivalent(&other.condition)
    }
}

#[derive(Debug, Clone)]
pub struct CastExpr {
    pub value: Box<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl CastExpr {
    pub fn new(
        value: Expression,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        CastExpr {
            value: Box::new(value),
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.value.is_equivalent(&other.value)
    }
}

#[derive(Debug, Clone)]
pub struct FnParam {
    pub name: String,
    pub type_: Option<Type>,
}

impl FnParam {
    pub fn new(name: impl Into<String>, type_: Option<Type>) -> Self {
        FnParam {
            name: name.into(),
            type_,
        }
    }
}

impl IsEquivalent for FnParam {
    fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone)]
pub struct FunctionExpr {
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
    pub name: Option<String>,
}

impl FunctionExpr {
    pub fn new(
        params: Vec<FnParam>,
        statements: Vec<Statement>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
        name: Option<String>,
    ) -> Self {
        FunctionExpr {
            params,
            statements,
            type_,
            source_span,
            name,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        are_all_equivalent(&self.params, &other.params)
            && are_all_equivalent(&self.statements, &other.statements)
    }

    pub fn to_decl_stmt(
        self,
        name: impl Into<String>,
        modifiers: StmtModifier,
    ) -> DeclareFunctionStmt {
        DeclareFunctionStmt::new(
            name,
            self.params,
            self.statements,
            self.type_,
            modifiers,
            self.source_span,
        )
    }
}

#[derive(Debug, Clone)]
pub struct BinaryOperatorExpr {
    pub operator: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl BinaryOperatorExpr {
    pub fn new(
        operator: BinaryOperator,
        lhs: Expression,
        rhs: Expression,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        BinaryOperatorExpr {
            operator,
            type_: type_.or_else(|| lhs.type_().cloned()),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.operator == other.operator
            && self.lhs.is_equivalent(&other.lhs)
            && self.rhs.is_equivalent(&other.rhs)
    }
}

#[derive(Debug, Clone)]
pub struct ReadPropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ReadPropExpr {
    pub fn new(
        receiver: Expression,
        name: impl Into<String>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        ReadPropExpr {
            receiver: Box::new(receiver),
            name: name.into(),
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.receiver.is_equivalent(&other.receiver) && self.name == other.name
    }

    pub fn set(self, value: Expression) -> WritePropExpr {
        WritePropExpr::new(*self.receiver, self.name, value, None, self.source_span)
    }
}

#[derive(Debug, Clone)]
pub struct ReadKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ReadKeyExpr {
    pub fn new(
        receiver: Expression,
        index: Expression,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        ReadKeyExpr {
            receiver: Box::new(receiver),
            index: Box::new(index),
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.receiver.is_equivalent(&other.receiver) && self.index.is_equivalent(&other.index)
    }

    pub fn set(self, value: Expression) -> WriteKeyExpr {
        WriteKeyExpr::new(*self.receiver, *self.index, value, None, self.source_span)
    }
}

#[derive(Debug, Clone)]
pub struct LiteralArrayExpr {
    pub entries: Vec<Expression>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl LiteralArrayExpr {
    pub fn new(
        entries: Vec<Expression>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        LiteralArrayExpr {
            entries,
            type_,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        are_all_equivalent(&self.entries, &other.entries)
    }
}

#[derive(Debug, Clone)]
pub struct LiteralMapEntry {
    pub key: String,
    pub value: Expression,
    /// Whether the key has to be rendered as a quoted string.
    pub quoted: bool,
}

impl LiteralMapEntry {
    pub fn new(key: impl Into<String>, value: Expression, quoted: bool) -> Self {
        LiteralMapEntry {
            key: key.into(),
            value,
            quoted,
        }
    }
}

impl IsEquivalent for LiteralMapEntry {
    fn is_equivalent(&self, other: &Self) -> bool {
        self.key == other.key && self.value.is_equivalent(&other.value)
    }
}

#[derive(Debug, Clone)]
pub struct LiteralMapExpr {
    pub entries: Vec<LiteralMapEntry>,
    pub type_: Option<Type>,
    pub source_span: Option<ParseSourceSpan>,
}

impl LiteralMapExpr {
    pub fn new(
        entries: Vec<LiteralMapEntry>,
        type_: Option<MapType>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        LiteralMapExpr {
            entries,
            type_: type_.map(Type::Map),
            source_span,
        }
    }

    pub fn value_type(&self) -> Option<&Type> {
        match &self.type_ {
            Some(Type::Map(map)) => map.value_type.as_deref(),
            _ => None,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        are_all_equivalent(&self.entries, &other.entries)
    }
}

/// A comma sequence. Its type is the type of the last part.
#[derive(Debug, Clone)]
pub struct CommaExpr {
    pub parts: Vec<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

impl CommaExpr {
    pub fn new(parts: Vec<Expression>, source_span: Option<ParseSourceSpan>) -> Self {
        CommaExpr { parts, source_span }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        are_all_equivalent(&self.parts, &other.parts)
    }
}

#[derive(Debug, Clone)]
pub enum Expression {
    ReadVar(ReadVarExpr),
    WriteVar(WriteVarExpr),
    WriteKey(WriteKeyExpr),
    WriteProp(WritePropExpr),
    InvokeMethod(InvokeMethodExpr),
    InvokeFn(InvokeFunctionExpr),
    Instantiate(InstantiateExpr),
    Literal(LiteralExpr),
    External(ExternalExpr),
    Conditional(ConditionalExpr),
    NotExpr(NotExpr),
    AssertNotNull(AssertNotNullExpr),
    Cast(CastExpr),
    Fn(FunctionExpr),
    BinaryOp(BinaryOperatorExpr),
    ReadProp(ReadPropExpr),
    ReadKey(ReadKeyExpr),
    LiteralArray(LiteralArrayExpr),
    LiteralMap(LiteralMapExpr),
    CommaExpr(CommaExpr),
}

macro_rules! impl_from_node {
    ($target:ident { $($node:ident => $variant:ident),* $(,)? }) => {
        $(
            impl From<$node> for $target {
                fn from(node: $node) -> Self {
                    $target::$variant(node)
                }
            }
        )*
    };
}

impl_from_node!(Expression {
    ReadVarExpr => ReadVar,
    WriteVarExpr => WriteVar,
    WriteKeyExpr => WriteKey,
    WritePropExpr => WriteProp,
    InvokeMethodExpr => InvokeMethod,
    InvokeFunctionExpr => InvokeFn,
    InstantiateExpr => Instantiate,
    LiteralExpr => Literal,
    ExternalExpr => External,
    ConditionalExpr => Conditional,
    NotExpr => NotExpr,
    AssertNotNullExpr => AssertNotNull,
    CastExpr => Cast,
    FunctionExpr => Fn,
    BinaryOperatorExpr => BinaryOp,
    ReadPropExpr => ReadProp,
    ReadKeyExpr => ReadKey,
    LiteralArrayExpr => LiteralArray,
    LiteralMapExpr => LiteralMap,
    CommaExpr => CommaExpr,
});

pub trait ExpressionVisitor {
    type Output;

    fn visit_read_var_expr(&mut self, expr: &ReadVarExpr, context: &mut dyn Any)
        -> Self::Output;
    fn visit_write_var_expr(
        &mut self,
        expr: &WriteVarExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_write_key_expr(
        &mut self,
        expr: &WriteKeyExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_write_prop_expr(
        &mut self,
        expr: &WritePropExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_invoke_method_expr(
        &mut self,
        expr: &InvokeMethodExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_invoke_function_expr(
        &mut self,
        expr: &InvokeFunctionExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_instantiate_expr(
        &mut self,
        expr: &InstantiateExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_literal_expr(&mut self, expr: &LiteralExpr, context: &mut dyn Any) -> Self::Output;
    fn visit_external_expr(&mut self, expr: &ExternalExpr, context: &mut dyn Any)
        -> Self::Output;
    fn visit_conditional_expr(
        &mut self,
        expr: &ConditionalExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_not_expr(&mut self, expr: &NotExpr, context: &mut dyn Any) -> Self::Output;
    fn visit_assert_not_null_expr(
        &mut self,
        expr: &AssertNotNullExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_cast_expr(&mut self, expr: &CastExpr, context: &mut dyn Any) -> Self::Output;
    fn visit_function_expr(&mut self, expr: &FunctionExpr, context: &mut dyn Any)
        -> Self::Output;
    fn visit_binary_operator_expr(
        &mut self,
        expr: &BinaryOperatorExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_read_prop_expr(
        &mut self,
        expr: &ReadPropExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_read_key_expr(&mut self, expr: &ReadKeyExpr, context: &mut dyn Any)
        -> Self::Output;
    fn visit_literal_array_expr(
        &mut self,
        expr: &LiteralArrayExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_literal_map_expr(
        &mut self,
        expr: &LiteralMapExpr,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_comma_expr(&mut self, expr: &CommaExpr, context: &mut dyn Any) -> Self::Output;
}

pub static THIS_EXPR: Expression = builtin_var(BuiltinVar::This);
pub static SUPER_EXPR: Expression = builtin_var(BuiltinVar::Super);
pub static CATCH_ERROR_VAR: Expression = builtin_var(BuiltinVar::CatchError);
pub static CATCH_STACK_VAR: Expression = builtin_var(BuiltinVar::CatchStack);
pub static NULL_EXPR: Expression = Expression::Literal(LiteralExpr {
    value: LiteralValue::Null,
    type_: None,
    source_span: None,
});
pub static TYPED_NULL_EXPR: Expression = Expression::Literal(LiteralExpr {
    value: LiteralValue::Null,
    type_: Some(builtin_type(BuiltinTypeName::Inferred)),
    source_span: None,
});

const fn builtin_var(builtin: BuiltinVar) -> Expression {
    Expression::ReadVar(ReadVarExpr {
        name: VarName::Builtin(builtin),
        type_: None,
        source_span: None,
    })
}

impl Expression {
    pub fn type_(&self) -> Option<&Type> {
        match self {
            Expression::ReadVar(e) => e.type_.as_ref(),
            Expression::WriteVar(e) => e.type_.as_ref(),
            Expression::WriteKey(e) => e.type_.as_ref(),
            Expression::WriteProp(e) => e.type_.as_ref(),
            Expression::InvokeMethod(e) => e.type_.as_ref(),
            Expression::InvokeFn(e) => e.type_.as_ref(),
            Expression::Instantiate(e) => e.type_.as_ref(),
            Expression::Literal(e) => e.type_.as_ref(),
            Expression::External(e) => e.type_.as_ref(),
            Expression::Conditional(e) => e.type_.as_ref(),
            Expression::NotExpr(_) => Some(&BOOL_TYPE),
            Expression::AssertNotNull(e) => e.type_.as_ref(),
            Expression::Cast(e) => e.type_.as_ref(),
            Expression::Fn(e) => e.type_.as_ref(),
            Expression::BinaryOp(e) => e.type_.as_ref(),
            Expression::ReadProp(e) => e.type_.as_ref(),
            Expression::ReadKey(e) => e.type_.as_ref(),
            Expression::LiteralArray(e) => e.type_.as_ref(),
            Expression::LiteralMap(e) => e.type_.as_ref(),
            Expression::CommaExpr(e) => e.parts.last().and_then(Expression::type_),
        }
    }

    pub fn source_span(&self) -> Option<&ParseSourceSpan> {
        match self {
            Expression::ReadVar(e) => e.source_span.as_ref(),
            Expression::WriteVar(e) => e.source_span.as_ref(),
            Expression::WriteKey(e) => e.source_span.as_ref(),
            Expression::WriteProp(e) => e.source_span.as_ref(),
            Expression::InvokeMethod(e) => e.source_span.as_ref(),
            Expression::InvokeFn(e) => e.source_span.as_ref(),
            Expression::Instantiate(e) => e.source_span.as_ref(),
            Expression::Literal(e) => e.source_span.as_ref(),
            Expression::External(e) => e.source_span.as_ref(),
            Expression::Conditional(e) => e.source_span.as_ref(),
            Expression::NotExpr(e) => e.source_span.as_ref(),
            Expression::AssertNotNull(e) => e.source_span.as_ref(),
            Expression::Cast(e) => e.source_span.as_ref(),
            Expression::Fn(e) => e.source_span.as_ref(),
            Expression::BinaryOp(e) => e.source_span.as_ref(),
            Expression::ReadProp(e) => e.source_span.as_ref(),
            Expression::ReadKey(e) => e.source_span.as_ref(),
            Expression::LiteralArray(e) => e.source_span.as_ref(),
            Expression::LiteralMap(e) => e.source_span.as_ref(),
            Expression::CommaExpr(e) => e.source_span.as_ref(),
        }
    }

    /// Returns this expression with its own source span replaced. Children
    /// keep whatever spans they already have.
    pub fn with_source_span(mut self, source_span: Option<ParseSourceSpan>) -> Expression {
        let slot = match &mut self {
            Expression::ReadVar(e) => &mut e.source_span,
            Expression::WriteVar(e) => &mut e.source_span,
            Expression::WriteKey(e) => &mut e.source_span,
            Expression::WriteProp(e) => &mut e.source_span,
            Expression::InvokeMethod(e) => &mut e.source_span,
            Expression::InvokeFn(e) => &mut e.source_span,
            Expression::Instantiate(e) => &mut e.source_span,
            Expression::Literal(e) => &mut e.source_span,
            Expression::External(e) => &mut e.source_span,
            Expression::Conditional(e) => &mut e.source_span,
            Expression::NotExpr(e) => &mut e.source_span,
            Expression::AssertNotNull(e) => &mut e.source_span,
            Expression::Cast(e) => &mut e.source_span,
            Expression::Fn(e) => &mut e.source_span,
            Expression::BinaryOp(e) => &mut e.source_span,
            Expression::ReadProp(e) => &mut e.source_span,
            Expression::ReadKey(e) => &mut e.source_span,
            Expression::LiteralArray(e) => &mut e.source_span,
            Expression::LiteralMap(e) => &mut e.source_span,
            Expression::CommaExpr(e) => &mut e.source_span,
        };
        *slot = source_span;
        self
    }

    pub fn node_kind(&self) -> &'static str {
        match self {
            Expression::ReadVar(_) => "ReadVarExpr",
            Expression::WriteVar(_) => "WriteVarExpr",
            Expression::WriteKey(_) => "WriteKeyExpr",
            Expression::WriteProp(_) => "WritePropExpr",
            Expression::InvokeMethod(_) => "InvokeMethodExpr",
            Expression::InvokeFn(_) => "InvokeFunctionExpr",
            Expression::Instantiate(_) => "InstantiateExpr",
            Expression::Literal(_) => "LiteralExpr",
            Expression::External(_) => "ExternalExpr",
            Expression::Conditional(_) => "ConditionalExpr",
            Expression::NotExpr(_) => "NotExpr",
            Expression::AssertNotNull(_) => "AssertNotNull",
            Expression::Cast(_) => "CastExpr",
            Expression::Fn(_) => "FunctionExpr",
            Expression::BinaryOp(_) => "BinaryOperatorExpr",
            Expression::ReadProp(_) => "ReadPropExpr",
            Expression::ReadKey(_) => "ReadKeyExpr",
            Expression::LiteralArray(_) => "LiteralArrayExpr",
            Expression::LiteralMap(_) => "LiteralMapExpr",
            Expression::CommaExpr(_) => "CommaExpr",
        }
    }

    pub fn visit_expression<V: ExpressionVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        context: &mut dyn Any,
    ) -> V::Output {
        match self {
            Expression::ReadVar(e) => visitor.visit_read_var_expr(e, context),
            Expression::WriteVar(e) => visitor.visit_write_var_expr(e, context),
            Expression::WriteKey(e) => visitor.visit_write_key_expr(e, context),
            Expression::WriteProp(e) => visitor.visit_write_prop_expr(e, context),
            Expression::InvokeMethod(e) => visitor.visit_invoke_method_expr(e, context),
            Expression::InvokeFn(e) => visitor.visit_invoke_function_expr(e, context),
            Expression::Instantiate(e) => visitor.visit_instantiate_expr(e, context),
            Expression::Literal(e) => visitor.visit_literal_expr(e, context),
            Expression::External(e) => visitor.visit_external_expr(e, context),
            Expression::Conditional(e) => visitor.visit_conditional_expr(e, context),
            Expression::NotExpr(e) => visitor.visit_not_expr(e, context),
            Expression::AssertNotNull(e) => visitor.visit_assert_not_null_expr(e, context),
            Expression::Cast(e) => visitor.visit_cast_expr(e, context),
            Expression::Fn(e) => visitor.visit_function_expr(e, context),
            Expression::BinaryOp(e) => visitor.visit_binary_operator_expr(e, context),
            Expression::ReadProp(e) => visitor.visit_read_prop_expr(e, context),
            Expression::ReadKey(e) => visitor.visit_read_key_expr(e, context),
            Expression::LiteralArray(e) => visitor.visit_literal_array_expr(e, context),
            Expression::LiteralMap(e) => visitor.visit_literal_map_expr(e, context),
            Expression::CommaExpr(e) => visitor.visit_comma_expr(e, context),
        }
    }

    /// Calculates whether this expression produces the same value as the given expression.
    /// Note: types and source spans are not compared.
    pub fn is_equivalent(&self, other: &Expression) -> bool {
        match (self, other) {
            (Expression::ReadVar(a), Expression::ReadVar(b)) => a.is_equivalent(b),
            (Expression::WriteVar(a), Expression::WriteVar(b)) => a.is_equivalent(b),
            (Expression::WriteKey(a), Expression::WriteKey(b)) => a.is_equivalent(b),
            (Expression::WriteProp(a), Expression::WriteProp(b)) => a.is_equivalent(b),
            (Expression::InvokeMethod(a), Expression::InvokeMethod(b)) => a.is_equivalent(b),
            (Expression::InvokeFn(a), Expression::InvokeFn(b)) => a.is_equivalent(b),
            (Expression::Instantiate(a), Expression::Instantiate(b)) => a.is_equivalent(b),
            (Expression::Literal(a), Expression::Literal(b)) => a.is_equivalent(b),
            (Expression::External(a), Expression::External(b)) => a.is_equivalent(b),
            (Expression::Conditional(a), Expression::Conditional(b)) => a.is_equivalent(b),
            (Expression::NotExpr(a), Expression::NotExpr(b)) => a.is_equivalent(b),
            (Expression::AssertNotNull(a), Expression::AssertNotNull(b)) => a.is_equivalent(b),
            (Expression::Cast(a), Expression::Cast(b)) => a.is_equivalent(b),
            (Expression::Fn(a), Expression::Fn(b)) => a.is_equivalent(b),
            (Expression::BinaryOp(a), Expression::BinaryOp(b)) => a.is_equivalent(b),
            (Expression::ReadProp(a), Expression::ReadProp(b)) => a.is_equivalent(b),
            (Expression::ReadKey(a), Expression::ReadKey(b)) => a.is_equivalent(b),
            (Expression::LiteralArray(a), Expression::LiteralArray(b)) => a.is_equivalent(b),
            (Expression::LiteralMap(a), Expression::LiteralMap(b)) => a.is_equivalent(b),
            (Expression::CommaExpr(a), Expression::CommaExpr(b)) => a.is_equivalent(b),
            _ => false,
        }
    }

    /// Syntactic constant check: literals, and array/map literals whose
    /// entries are all constant.
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Literal(_) => true,
            Expression::LiteralArray(arr) => arr.entries.iter().all(Expression::is_constant),
            Expression::LiteralMap(map) => map.entries.iter().all(|e| e.value.is_constant()),
            _ => false,
        }
    }

    pub fn prop(self, name: impl Into<String>, source_span: Option<ParseSourceSpan>) -> Expression {
        ReadPropExpr::new(self, name, None, source_span).into()
    }

    pub fn key(
        self,
        index: Expression,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Expression {
        ReadKeyExpr::new(self, index, type_, source_span).into()
    }

    pub fn call_method(
        self,
        method: impl Into<MethodName>,
        params: Vec<Expression>,
        source_span: Option<ParseSourceSpan>,
    ) -> Expression {
        InvokeMethodExpr::new(self, method, params, None, source_span).into()
    }

    pub fn call_fn(self, params: Vec<Expression>, source_span: Option<ParseSourceSpan>) -> Expression {
        InvokeFunctionExpr::new(self, params, None, source_span).into()
    }

    pub fn instantiate(
        self,
        params: Vec<Expression>,
        type_: Option<Type>,
        source_span: Option<ParseSourceSpan>,
    ) -> Expression {
        InstantiateExpr::new(self, params, type_, source_span).into()
    }

    pub fn conditional(
        self,
        true_case: Expression,
        false_case: Option<Expression>,
        source_span: Option<ParseSourceSpan>,
    ) -> Expression {
        ConditionalExpr::new(self, true_case, false_case, None, source_span).into()
    }

    fn binary(
        self,
        operator: BinaryOperator,
        rhs: Expression,
        source_span: Option<ParseSourceSpan>,
    ) -> Expression {
        BinaryOperatorExpr::new(operator, self, rhs, None, source_span).into()
    }

    pub fn equals(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Equals, rhs, source_span)
    }

    pub fn not_equals(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::NotEquals, rhs, source_span)
    }

    pub fn identical(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Identical, rhs, source_span)
    }

    pub fn not_identical(
        self,
        rhs: Expression,
        source_span: Option<ParseSourceSpan>,
    ) -> Expression {
        self.binary(BinaryOperator::NotIdentical, rhs, source_span)
    }

    pub fn minus(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Minus, rhs, source_span)
    }

    pub fn plus(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Plus, rhs, source_span)
    }

    pub fn divide(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Divide, rhs, source_span)
    }

    pub fn multiply(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Multiply, rhs, source_span)
    }

    pub fn modulo(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Modulo, rhs, source_span)
    }

    pub fn and(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::And, rhs, source_span)
    }

    pub fn or(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Or, rhs, source_span)
    }

    pub fn lower(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Lower, rhs, source_span)
    }

    pub fn lower_equals(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::LowerEquals, rhs, source_span)
    }

    pub fn bigger(self, rhs: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
        self.binary(BinaryOperator::Bigger, rhs, source_span)
    }

    pub fn bigger_equals(
        self,
        rhs: Expression,
        source_span: Option<ParseSourceSpan>,
    ) -> Expression {
        self.binary(BinaryOperator::BiggerEquals, rhs, source_span)
    }

    /// `self == null`, which also matches `undefined`. Compares against the
    /// typed null so strict null checks can narrow the result.
    pub fn is_blank(self, source_span: Option<ParseSourceSpan>) -> Expression {
        self.equals(TYPED_NULL_EXPR.clone(), source_span)
    }

    pub fn cast(self, type_: Type, source_span: Option<ParseSourceSpan>) -> Expression {
        CastExpr::new(self, Some(type_), source_span).into()
    }

    pub fn to_stmt(self) -> Statement {
        ExpressionStatement::new(self, None).into()
    }

    /// Turns a variable, property or key read into the matching write.
    pub fn set(self, value: Expression) -> Result<Expression> {
        match self {
            Expression::ReadVar(e) => e.set(value).map(Expression::from),
            Expression::ReadProp(e) => Ok(e.set(value).into()),
            Expression::ReadKey(e) => Ok(e.set(value).into()),
            other => Err(OutputAstError::UnassignableExpression(other.node_kind())),
        }
    }
}

impl IsEquivalent for Expression {
    fn is_equivalent(&self, other: &Self) -> bool {
        Expression::is_equivalent(self, other)
    }
}

///// Statements

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StmtModifier: u8 {
        const FINAL = 1;
        const PRIVATE = 2;
        const EXPORTED = 4;
        const STATIC = 8;
    }
}

#[derive(Debug, Clone)]
pub struct DeclareVarStmt {
    pub name: String,
    pub value: Option<Box<Expression>>,
    pub type_: Option<Type>,
    pub modifiers: StmtModifier,
    pub source_span: Option<ParseSourceSpan>,
}

impl DeclareVarStmt {
    pub fn new(
        name: impl Into<String>,
        value: Option<Expression>,
        type_: Option<Type>,
        modifiers: StmtModifier,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        DeclareVarStmt {
            name: name.into(),
            type_: type_.or_else(|| value.as_ref().and_then(|v| v.type_().cloned())),
            value: value.map(Box::new),
            modifiers,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && null_safe_is_equivalent(self.value.as_deref(), other.value.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct DeclareFunctionStmt {
    pub name: String,
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    pub type_: Option<Type>,
    pub modifiers: StmtModifier,
    pub source_span: Option<ParseSourceSpan>,
}

impl DeclareFunctionStmt {
    pub fn new(
        name: impl Into<String>,
        params: Vec<FnParam>,
        statements: Vec<Statement>,
        type_: Option<Type>,
        modifiers: StmtModifier,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        DeclareFunctionStmt {
            name: name.into(),
            params,
            statements,
            type_,
            modifiers,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && are_all_equivalent(&self.params, &other.params)
            && are_all_equivalent(&self.statements, &other.statements)
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expr: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ExpressionStatement {
    pub fn new(expr: Expression, source_span: Option<ParseSourceSpan>) -> Self {
        ExpressionStatement {
            expr: Box::new(expr),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.expr.is_equivalent(&other.expr)
    }
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub value: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ReturnStatement {
    pub fn new(value: Expression, source_span: Option<ParseSourceSpan>) -> Self {
        ReturnStatement {
            value: Box::new(value),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.value.is_equivalent(&other.value)
    }
}

/// Shared capability of class fields, methods and getters.
pub trait ClassPart {
    fn modifiers(&self) -> StmtModifier;
    fn type_(&self) -> Option<&Type>;

    fn has_modifier(&self, modifier: StmtModifier) -> bool {
        self.modifiers().contains(modifier)
    }
}

#[derive(Debug, Clone)]
pub struct ClassField {
    pub name: String,
    pub type_: Option<Type>,
    pub modifiers: StmtModifier,
    pub initializer: Option<Box<Expression>>,
}

impl ClassField {
    pub fn new(
        name: impl Into<String>,
        type_: Option<Type>,
        modifiers: StmtModifier,
        initializer: Option<Expression>,
    ) -> Self {
        ClassField {
            name: name.into(),
            type_,
            modifiers,
            initializer: initializer.map(Box::new),
        }
    }
}

impl IsEquivalent for ClassField {
    fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone)]
pub struct ClassMethod {
    /// `None` for the constructor.
    pub name: Option<String>,
    pub params: Vec<FnParam>,
    pub body: Vec<Statement>,
    pub type_: Option<Type>,
    pub modifiers: StmtModifier,
}

impl ClassMethod {
    pub fn new(
        name: Option<String>,
        params: Vec<FnParam>,
        body: Vec<Statement>,
        type_: Option<Type>,
        modifiers: StmtModifier,
    ) -> Self {
        ClassMethod {
            name,
            params,
            body,
            type_,
            modifiers,
        }
    }
}

impl IsEquivalent for ClassMethod {
    fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name && are_all_equivalent(&self.body, &other.body)
    }
}

#[derive(Debug, Clone)]
pub struct ClassGetter {
    pub name: String,
    pub body: Vec<Statement>,
    pub type_: Option<Type>,
    pub modifiers: StmtModifier,
}

impl ClassGetter {
    pub fn new(
        name: impl Into<String>,
        body: Vec<Statement>,
        type_: Option<Type>,
        modifiers: StmtModifier,
    ) -> Self {
        ClassGetter {
            name: name.into(),
            body,
            type_,
            modifiers,
        }
    }
}

impl IsEquivalent for ClassGetter {
    fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name && are_all_equivalent(&self.body, &other.body)
    }
}

macro_rules! impl_class_part {
    ($($part:ident),*) => {
        $(
            impl ClassPart for $part {
                fn modifiers(&self) -> StmtModifier {
                    self.modifiers
                }

                fn type_(&self) -> Option<&Type> {
                    self.type_.as_ref()
                }
            }
        )*
    };
}

impl_class_part!(ClassField, ClassMethod, ClassGetter);

#[derive(Debug, Clone)]
pub struct ClassStmt {
    pub name: String,
    pub parent: Option<Box<Expression>>,
    pub fields: Vec<ClassField>,
    pub getters: Vec<ClassGetter>,
    pub constructor_method: ClassMethod,
    pub methods: Vec<ClassMethod>,
    pub modifiers: StmtModifier,
    pub source_span: Option<ParseSourceSpan>,
}

impl ClassStmt {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        parent: Option<Expression>,
        fields: Vec<ClassField>,
        getters: Vec<ClassGetter>,
        constructor_method: ClassMethod,
        methods: Vec<ClassMethod>,
        modifiers: StmtModifier,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        ClassStmt {
            name: name.into(),
            parent: parent.map(Box::new),
            fields,
            getters,
            constructor_method,
            methods,
            modifiers,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name
            && null_safe_is_equivalent(self.parent.as_deref(), other.parent.as_deref())
            && are_all_equivalent(&self.fields, &other.fields)
            && are_all_equivalent(&self.getters, &other.getters)
            && self
                .constructor_method
                .is_equivalent(&other.constructor_method)
            && are_all_equivalent(&self.methods, &other.methods)
    }
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Box<Expression>,
    pub true_case: Vec<Statement>,
    pub false_case: Vec<Statement>,
    pub source_span: Option<ParseSourceSpan>,
}

impl IfStmt {
    pub fn new(
        condition: Expression,
        true_case: Vec<Statement>,
        false_case: Vec<Statement>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        IfStmt {
            condition: Box::new(condition),
            true_case,
            false_case,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.condition.is_equivalent(&other.condition)
            && are_all_equivalent(&self.true_case, &other.true_case)
            && are_all_equivalent(&self.false_case, &other.false_case)
    }
}

#[derive(Debug, Clone)]
pub struct TryCatchStmt {
    pub body_stmts: Vec<Statement>,
    pub catch_stmts: Vec<Statement>,
    pub source_span: Option<ParseSourceSpan>,
}

impl TryCatchStmt {
    pub fn new(
        body_stmts: Vec<Statement>,
        catch_stmts: Vec<Statement>,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        TryCatchStmt {
            body_stmts,
            catch_stmts,
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        are_all_equivalent(&self.body_stmts, &other.body_stmts)
            && are_all_equivalent(&self.catch_stmts, &other.catch_stmts)
    }
}

#[derive(Debug, Clone)]
pub struct ThrowStmt {
    pub error: Box<Expression>,
    pub source_span: Option<ParseSourceSpan>,
}

impl ThrowStmt {
    pub fn new(error: Expression, source_span: Option<ParseSourceSpan>) -> Self {
        ThrowStmt {
            error: Box::new(error),
            source_span,
        }
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.error.is_equivalent(&other.error)
    }
}

#[derive(Debug, Clone)]
pub struct CommentStmt {
    pub comment: String,
    pub multiline: bool,
    pub source_span: Option<ParseSourceSpan>,
}

impl CommentStmt {
    pub fn new(
        comment: impl Into<String>,
        multiline: bool,
        source_span: Option<ParseSourceSpan>,
    ) -> Self {
        CommentStmt {
            comment: comment.into(),
            multiline,
            source_span,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JSDocCommentStmt {
    pub tags: Vec<JSDocTag>,
    pub source_span: Option<ParseSourceSpan>,
}

impl JSDocCommentStmt {
    pub fn new(tags: Vec<JSDocTag>, source_span: Option<ParseSourceSpan>) -> Self {
        JSDocCommentStmt { tags, source_span }
    }

    /// The comment body, without the enclosing `/*` and `*/`.
    pub fn serialize(&self) -> Result<String> {
        serialize_tags(&self.tags)
    }

    pub fn is_equivalent(&self, other: &Self) -> bool {
        match (self.serialize(), other.serialize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.tags == other.tags,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    DeclareVar(DeclareVarStmt),
    DeclareFn(DeclareFunctionStmt),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
    DeclareClass(ClassStmt),
    IfStmt(IfStmt),
    TryCatch(TryCatchStmt),
    Throw(ThrowStmt),
    Comment(CommentStmt),
    JSDocComment(JSDocCommentStmt),
}

impl_from_node!(Statement {
    DeclareVarStmt => DeclareVar,
    DeclareFunctionStmt => DeclareFn,
    ExpressionStatement => Expression,
    ReturnStatement => Return,
    ClassStmt => DeclareClass,
    IfStmt => IfStmt,
    TryCatchStmt => TryCatch,
    ThrowStmt => Throw,
    CommentStmt => Comment,
    JSDocCommentStmt => JSDocComment,
});

pub trait StatementVisitor {
    type Output;

    fn visit_declare_var_stmt(
        &mut self,
        stmt: &DeclareVarStmt,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_declare_function_stmt(
        &mut self,
        stmt: &DeclareFunctionStmt,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_expression_stmt(
        &mut self,
        stmt: &ExpressionStatement,
        context: &mut dyn Any,
    ) -> Self::Output;
    fn visit_return_stmt(&mut self, stmt: &ReturnStatement, context: &mut dyn Any)
        -> Self::Output;
    fn visit_declare_class_stmt(&mut self, stmt: &ClassStmt, context: &mut dyn Any)
        -> Self::Output;
    fn visit_if_stmt(&mut self, stmt: &IfStmt, context: &mut dyn Any) -> Self::Output;
    fn visit_try_catch_stmt(&mut self, stmt: &TryCatchStmt, context: &mut dyn Any)
        -> Self::Output;
    fn visit_throw_stmt(&mut self, stmt: &ThrowStmt, context: &mut dyn Any) -> Self::Output;
    fn visit_comment_stmt(&mut self, stmt: &CommentStmt, context: &mut dyn Any) -> Self::Output;
    fn visit_jsdoc_comment_stmt(
        &mut self,
        stmt: &JSDocCommentStmt,
        context: &mut dyn Any,
    ) -> Self::Output;
}

impl Statement {
    pub fn source_span(&self) -> Option<&ParseSourceSpan> {
        match self {
            Statement::DeclareVar(s) => s.source_span.as_ref(),
            Statement::DeclareFn(s) => s.source_span.as_ref(),
            Statement::Expression(s) => s.source_span.as_ref(),
            Statement::Return(s) => s.source_span.as_ref(),
            Statement::DeclareClass(s) => s.source_span.as_ref(),
            Statement::IfStmt(s) => s.source_span.as_ref(),
            Statement::TryCatch(s) => s.source_span.as_ref(),
            Statement::Throw(s) => s.source_span.as_ref(),
            Statement::Comment(s) => s.source_span.as_ref(),
            Statement::JSDocComment(s) => s.source_span.as_ref(),
        }
    }

    /// Returns this statement with its own source span replaced.
    pub fn with_source_span(mut self, source_span: Option<ParseSourceSpan>) -> Statement {
        let slot = match &mut self {
            Statement::DeclareVar(s) => &mut s.source_span,
            Statement::DeclareFn(s) => &mut s.source_span,
            Statement::Expression(s) => &mut s.source_span,
            Statement::Return(s) => &mut s.source_span,
            Statement::DeclareClass(s) => &mut s.source_span,
            Statement::IfStmt(s) => &mut s.source_span,
            Statement::TryCatch(s) => &mut s.source_span,
            Statement::Throw(s) => &mut s.source_span,
            Statement::Comment(s) => &mut s.source_span,
            Statement::JSDocComment(s) => &mut s.source_span,
        };
        *slot = source_span;
        self
    }

    /// Only declarations carry modifiers; every other statement reports none.
    pub fn modifiers(&self) -> StmtModifier {
        match self {
            Statement::DeclareVar(s) => s.modifiers,
            Statement::DeclareFn(s) => s.modifiers,
            Statement::DeclareClass(s) => s.modifiers,
            _ => StmtModifier::empty(),
        }
    }

    pub fn has_modifier(&self, modifier: StmtModifier) -> bool {
        self.modifiers().contains(modifier)
    }

    pub fn node_kind(&self) -> &'static str {
        match self {
            Statement::DeclareVar(_) => "DeclareVarStmt",
            Statement::DeclareFn(_) => "DeclareFunctionStmt",
            Statement::Expression(_) => "ExpressionStatement",
            Statement::Return(_) => "ReturnStatement",
            Statement::DeclareClass(_) => "ClassStmt",
            Statement::IfStmt(_) => "IfStmt",
            Statement::TryCatch(_) => "TryCatchStmt",
            Statement::Throw(_) => "ThrowStmt",
            Statement::Comment(_) => "CommentStmt",
            Statement::JSDocComment(_) => "JSDocCommentStmt",
        }
    }

    pub fn visit_statement<V: StatementVisitor + ?Sized>(
        &self,
        visitor: &mut V,
        context: &mut dyn Any,
    ) -> V::Output {
        match self {
            Statement::DeclareVar(s) => visitor.visit_declare_var_stmt(s, context),
            Statement::DeclareFn(s) => visitor.visit_declare_function_stmt(s, context),
            Statement::Expression(s) => visitor.visit_expression_stmt(s, context),
            Statement::Return(s) => visitor.visit_return_stmt(s, context),
            Statement::DeclareClass(s) => visitor.visit_declare_class_stmt(s, context),
            Statement::IfStmt(s) => visitor.visit_if_stmt(s, context),
            Statement::TryCatch(s) => visitor.visit_try_catch_stmt(s, context),
            Statement::Throw(s) => visitor.visit_throw_stmt(s, context),
            Statement::Comment(s) => visitor.visit_comment_stmt(s, context),
            Statement::JSDocComment(s) => visitor.visit_jsdoc_comment_stmt(s, context),
        }
    }

    /// Calculates whether this statement produces the same value as the given statement.
    /// Note: types, modifiers and source spans are not compared.
    pub fn is_equivalent(&self, other: &Statement) -> bool {
        match (self, other) {
            (Statement::DeclareVar(a), Statement::DeclareVar(b)) => a.is_equivalent(b),
            (Statement::DeclareFn(a), Statement::DeclareFn(b)) => a.is_equivalent(b),
            (Statement::Expression(a), Statement::Expression(b)) => a.is_equivalent(b),
            (Statement::Return(a), Statement::Return(b)) => a.is_equivalent(b),
            (Statement::DeclareClass(a), Statement::DeclareClass(b)) => a.is_equivalent(b),
            (Statement::IfStmt(a), Statement::IfStmt(b)) => a.is_equivalent(b),
            (Statement::TryCatch(a), Statement::TryCatch(b)) => a.is_equivalent(b),
            (Statement::Throw(a), Statement::Throw(b)) => a.is_equivalent(b),
            // Comments never change what the code computes.
            (Statement::Comment(_), Statement::Comment(_)) => true,
            (Statement::JSDocComment(a), Statement::JSDocComment(b)) => a.is_equivalent(b),
            _ => false,
        }
    }
}

impl IsEquivalent for Statement {
    fn is_equivalent(&self, other: &Self) -> bool {
        Statement::is_equivalent(self, other)
    }
}

/// Read access to a node's own source span, for printers that record
/// source-map segments.
pub trait HasSourceSpan {
    fn source_span(&self) -> Option<&ParseSourceSpan>;
}

impl HasSourceSpan for Expression {
    fn source_span(&self) -> Option<&ParseSourceSpan> {
        Expression::source_span(self)
    }
}

impl HasSourceSpan for Statement {
    fn source_span(&self) -> Option<&ParseSourceSpan> {
        Statement::source_span(self)
    }
}

macro_rules! impl_has_source_span {
    ($($node:ident),* $(,)?) => {
        $(
            impl HasSourceSpan for $node {
                fn source_span(&self) -> Option<&ParseSourceSpan> {
                    self.source_span.as_ref()
                }
            }
        )*
    };
}

impl_has_source_span!(
    ReadVarExpr,
    WriteVarExpr,
    WriteKeyExpr,
    WritePropExpr,
    InvokeMethodExpr,
    InvokeFunctionExpr,
    InstantiateExpr,
    LiteralExpr,
    ExternalExpr,
    ConditionalExpr,
    NotExpr,
    AssertNotNullExpr,
    CastExpr,
    FunctionExpr,
    BinaryOperatorExpr,
    ReadPropExpr,
    ReadKeyExpr,
    LiteralArrayExpr,
    LiteralMapExpr,
    CommaExpr,
    DeclareVarStmt,
    DeclareFunctionStmt,
    ExpressionStatement,
    ReturnStatement,
    ClassStmt,
    IfStmt,
    TryCatchStmt,
    ThrowStmt,
    CommentStmt,
    JSDocCommentStmt,
);

// Helper functions for creating common nodes

pub fn variable(
    name: impl Into<String>,
    type_: Option<Type>,
    source_span: Option<ParseSourceSpan>,
) -> Expression {
    ReadVarExpr::new(VarName::Named(name.into()), type_, source_span).into()
}

pub fn literal(
    value: impl Into<LiteralValue>,
    type_: Option<Type>,
    source_span: Option<ParseSourceSpan>,
) -> Expression {
    LiteralExpr::new(value, type_, source_span).into()
}

pub fn literal_arr(values: Vec<Expression>) -> Expression {
    LiteralArrayExpr::new(values, None, None).into()
}

pub fn literal_map(entries: Vec<LiteralMapEntry>, type_: Option<MapType>) -> Expression {
    LiteralMapExpr::new(entries, type_, None).into()
}

pub fn import_expr(
    id: ExternalReference,
    type_params: Option<Vec<Type>>,
    source_span: Option<ParseSourceSpan>,
) -> Expression {
    ExternalExpr::new(id, None, type_params, source_span).into()
}

pub fn expression_type(expr: Expression, modifiers: TypeModifier) -> Type {
    Type::Expression(ExpressionType {
        value: Box::new(expr),
        modifiers,
    })
}

pub fn import_type(
    id: ExternalReference,
    type_params: Option<Vec<Type>>,
    modifiers: TypeModifier,
) -> Type {
    expression_type(import_expr(id, type_params, None), modifiers)
}

pub fn not(expr: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
    NotExpr::new(expr, source_span).into()
}

pub fn assert_not_null(expr: Expression, source_span: Option<ParseSourceSpan>) -> Expression {
    AssertNotNullExpr::new(expr, source_span).into()
}

pub fn fn_expr(
    params: Vec<FnParam>,
    body: Vec<Statement>,
    type_: Option<Type>,
    source_span: Option<ParseSourceSpan>,
    name: Option<String>,
) -> Expression {
    FunctionExpr::new(params, body, type_, source_span, name).into()
}

pub fn if_stmt(
    condition: Expression,
    then_clause: Vec<Statement>,
    else_clause: Option<Vec<Statement>>,
) -> Statement {
    IfStmt::new(condition, then_clause, else_clause.unwrap_or_default(), None).into()
}
