use std::fmt::Debug;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Meta {
    pub start_index: usize,
    pub end_index: usize,
    pub script: Rc<String>,
}
impl Meta {
    pub fn to_formatted_code(&self) -> String {
        self.script
            .get(self.start_index..self.end_index)
            .unwrap_or_default()
            .to_string()
    }
}
impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        self.start_index == other.start_index && self.end_index == other.end_index
    }
}

pub trait HasMeta {
    fn get_meta(&self) -> &Meta;
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierData {
    pub name: String,
    pub meta: Meta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramData {
    pub meta: Meta,
    pub body: Vec<StatementType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementType {
    ExpressionStatement {
        meta: Meta,
        expression: ExpressionType,
    },
    VariableDeclaration(VariableDeclarationData),
    FunctionDeclaration(Rc<FunctionData>),
    ReturnStatement {
        meta: Meta,
        argument: Option<ExpressionType>,
    },
    IfStatement {
        meta: Meta,
        test: ExpressionType,
        consequent: Box<StatementType>,
        alternate: Option<Box<StatementType>>,
    },
    BlockStatement {
        meta: Meta,
        body: Vec<StatementType>,
    },
    EmptyStatement {
        meta: Meta,
    },
}
impl HasMeta for StatementType {
    fn get_meta(&self) -> &Meta {
        match self {
            StatementType::ExpressionStatement { meta, .. }
            | StatementType::ReturnStatement { meta, .. }
            | StatementType::IfStatement { meta, .. }
            | StatementType::BlockStatement { meta, .. }
            | StatementType::EmptyStatement { meta } => meta,
            StatementType::VariableDeclaration(d) => &d.meta,
            StatementType::FunctionDeclaration(f) => &f.meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableDeclarationKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarationData {
    pub meta: Meta,
    pub kind: VariableDeclarationKind,
    pub declarations: Vec<VariableDeclaratorData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaratorData {
    pub meta: Meta,
    pub id: IdentifierData,
    pub init: Option<ExpressionType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionData {
    pub meta: Meta,
    pub id: Option<IdentifierData>,
    pub params: Vec<IdentifierData>,
    pub body: Rc<FunctionBodyData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBodyData {
    pub meta: Meta,
    pub body: Vec<StatementType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionType {
    Literal(LiteralData),
    Identifier(IdentifierData),
    ThisExpression {
        meta: Meta,
    },
    ArrayExpression {
        meta: Meta,
        elements: Vec<ExpressionType>,
    },
    ObjectExpression {
        meta: Meta,
        properties: Vec<PropertyData>,
    },
    FunctionExpression(Rc<FunctionData>),
    UnaryExpression {
        meta: Meta,
        operator: UnaryOperator,
        argument: Box<ExpressionType>,
    },
    BinaryExpression {
        meta: Meta,
        operator: BinaryOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    LogicalExpression {
        meta: Meta,
        operator: LogicalOperator,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    AssignmentExpression {
        meta: Meta,
        left: Box<ExpressionType>,
        right: Box<ExpressionType>,
    },
    MemberExpression(MemberExpressionType),
    CallExpression {
        meta: Meta,
        callee: Box<ExpressionType>,
        arguments: Vec<ExpressionType>,
    },
}
impl HasMeta for ExpressionType {
    fn get_meta(&self) -> &Meta {
        match self {
            ExpressionType::Literal(l) => &l.meta,
            ExpressionType::Identifier(i) => &i.meta,
            ExpressionType::FunctionExpression(f) => &f.meta,
            ExpressionType::MemberExpression(m) => m.get_meta(),
            ExpressionType::ThisExpression { meta }
            | ExpressionType::ArrayExpression { meta, .. }
            | ExpressionType::ObjectExpression { meta, .. }
            | ExpressionType::UnaryExpression { meta, .. }
            | ExpressionType::BinaryExpression { meta, .. }
            | ExpressionType::LogicalExpression { meta, .. }
            | ExpressionType::AssignmentExpression { meta, .. }
            | ExpressionType::CallExpression { meta, .. } => meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberExpressionType {
    SimpleMemberExpression {
        meta: Meta,
        object: Box<ExpressionType>,
        property: IdentifierData,
    },
    ComputedMemberExpression {
        meta: Meta,
        object: Box<ExpressionType>,
        property: Box<ExpressionType>,
    },
}
impl HasMeta for MemberExpressionType {
    fn get_meta(&self) -> &Meta {
        match self {
            MemberExpressionType::SimpleMemberExpression { meta, .. }
            | MemberExpressionType::ComputedMemberExpression { meta, .. } => meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyData {
    pub meta: Meta,
    pub key: String,
    pub value: ExpressionType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralData {
    pub meta: Meta,
    pub value: LiteralType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    NullLiteral,
    BooleanLiteral(bool),
    StringLiteral(String),
    NumberLiteral(NumberLiteralType),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberLiteralType {
    IntegerLiteral(i64),
    FloatLiteral(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOperator {
    Minus,
    LogicalNot,
    TypeOf,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOperator {
    StrictlyEqual,
    StrictlyUnequal,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicalOperator {
    Or,
    And,
}
