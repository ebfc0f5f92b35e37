//! The Lime AST: a closed set of node types produced by the parser and
//! consumed, unmodified, by codegen. Every node derives `Serialize` so a
//! whole `Program` can be dumped as JSON for debugging; the two
//! polymorphic node families are internally tagged on `"type"` so the
//! dump reads as `{"type": "LetStatement", ...fields}` rather than the
//! externally-tagged `{"LetStatement": {...}}` serde's enum default
//! would otherwise produce.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    /// Pretty-printed JSON rendering of the whole tree, for `--debug`
    /// dumps. Not a stable interchange format; only ever read by a human
    /// or a test assertion.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    #[serde(rename = "ExpressionStatement")]
    Expression(ExpressionStatement),
    #[serde(rename = "LetStatement")]
    Let(LetStatement),
    #[serde(rename = "FunctionStatement")]
    Function(FunctionStatement),
    #[serde(rename = "BlockStatement")]
    Block(BlockStatement),
    #[serde(rename = "ReturnStatement")]
    Return(ReturnStatement),
    #[serde(rename = "AssignStatement")]
    Assign(AssignStatement),
    #[serde(rename = "IfStatement")]
    If(IfStatement),
    #[serde(rename = "WhileStatement")]
    While(WhileStatement),
    #[serde(rename = "BreakStatement")]
    Break(BreakStatement),
    #[serde(rename = "ContinueStatement")]
    Continue(ContinueStatement),
    #[serde(rename = "ForStatement")]
    For(ForStatement),
    #[serde(rename = "ImportStatement")]
    Import(ImportStatement),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpressionStatement {
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LetStatement {
    pub name: String,
    pub value_type: String,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    pub value_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionStatement {
    pub name: String,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: String,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnStatement {
    pub return_value: Box<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignStatement {
    pub name: String,
    pub operator: String,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfStatement {
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhileStatement {
    pub condition: Box<Expression>,
    pub body: BlockStatement,
}

// Empty structs, not unit structs: internally-tagged enum serialization
// needs every variant's payload to serialize as a map so the `"type"` tag
// can be merged in, and a unit struct serializes as `null`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct BreakStatement {}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ContinueStatement {}

#[derive(Debug, Clone, Serialize)]
pub struct ForStatement {
    pub var_declaration: Box<LetStatement>,
    pub condition: Box<Expression>,
    /// The loop's per-iteration step. The grammar accepts either an
    /// assignment (`i = i + 1`) or a bare expression statement (`i++`);
    /// both lower the same way in codegen, via generic statement dispatch.
    pub step: Box<Statement>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportStatement {
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    #[serde(rename = "InfixExpression")]
    Infix(InfixExpression),
    #[serde(rename = "PrefixExpression")]
    Prefix(PrefixExpression),
    #[serde(rename = "PostfixExpression")]
    Postfix(PostfixExpression),
    #[serde(rename = "CallExpression")]
    Call(CallExpression),
    #[serde(rename = "IntegerLiteral")]
    Integer(IntegerLiteral),
    #[serde(rename = "FloatLiteral")]
    Float(FloatLiteral),
    #[serde(rename = "BooleanLiteral")]
    Boolean(BooleanLiteral),
    #[serde(rename = "StringLiteral")]
    String(StringLiteral),
    #[serde(rename = "IdentifierLiteral")]
    Identifier(IdentifierLiteral),
}

#[derive(Debug, Clone, Serialize)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefixExpression {
    pub operator: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostfixExpression {
    pub left: Box<Expression>,
    pub operator: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegerLiteral {
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatLiteral {
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentifierLiteral {
    pub value: String,
}
