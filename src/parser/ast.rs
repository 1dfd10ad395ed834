use crate::span::{Span, Spanned};

#[derive(Debug)]
pub struct Program {
    pub body: Vec<Spanned<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declarator {
    pub pattern: Spanned<Pattern>,
    pub init: Option<Spanned<Expr>>,
}

/// Binding patterns: declaration targets, function params, catch params.
#[derive(Debug, Clone)]
pub enum Pattern {
    Ident(String),
    /// `[a, , b]` — `None` entries are holes.
    Array(Vec<Option<Spanned<Pattern>>>),
    Object(Vec<ObjectPatternProp>),
    /// `x = default`
    Default {
        inner: Box<Spanned<Pattern>>,
        value: Box<Spanned<Expr>>,
    },
    /// `...rest`
    Rest(Box<Spanned<Pattern>>),
}

#[derive(Debug, Clone)]
pub enum ObjectPatternProp {
    KeyValue {
        key: PropKey,
        value: Spanned<Pattern>,
    },
    Rest(Spanned<Pattern>),
}

#[derive(Debug, Clone)]
pub enum PropKey {
    Ident(String),
    StringLit(String),
    NumberLit(f64),
    Computed(Box<Spanned<Expr>>),
}

impl PropKey {
    /// Static name of a non-computed key, if any.
    pub fn static_name(&self) -> Option<&str> {
        match self {
            PropKey::Ident(name) | PropKey::StringLit(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct FnDecl {
    pub name: Spanned<String>,
    pub params: Vec<Spanned<Pattern>>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Spanned<String>,
    pub parent: Option<Box<Spanned<Expr>>>,
    pub methods: Vec<ClassMethod>,
}

#[derive(Debug, Clone)]
pub struct ClassMethod {
    pub key: Spanned<String>,
    pub is_static: bool,
    /// Always an `Expr::Function`.
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub param: Option<Spanned<Pattern>>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl {
        kind: DeclKind,
        declarators: Vec<Declarator>,
    },
    FnDecl(FnDecl),
    ClassDecl(ClassDecl),
    If {
        test: Spanned<Expr>,
        consequent: Box<Spanned<Stmt>>,
        alternate: Option<Box<Spanned<Stmt>>>,
    },
    Block(Block),
    Return(Option<Spanned<Expr>>),
    Throw(Spanned<Expr>),
    Break,
    Continue,
    While {
        test: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    ForOf {
        decl_kind: Option<DeclKind>,
        pattern: Spanned<Pattern>,
        iterable: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
    Try {
        block: Spanned<Block>,
        handler: Option<CatchClause>,
        finalizer: Option<Spanned<Block>>,
    },
    Expr(Spanned<Expr>),
    Empty,
}

#[derive(Debug, Clone)]
pub enum ArrayElem {
    Item(Spanned<Expr>),
    Spread(Spanned<Expr>),
    Hole,
}

#[derive(Debug, Clone)]
pub enum ObjectProp {
    Entry {
        key: PropKey,
        value: Spanned<Expr>,
    },
    Spread(Spanned<Expr>),
}

#[derive(Debug, Clone)]
pub enum Arg {
    Expr(Spanned<Expr>),
    Spread(Spanned<Expr>),
}

#[derive(Debug, Clone)]
pub enum MemberProp {
    Ident(String),
    Computed(Box<Spanned<Expr>>),
}

#[derive(Debug, Clone)]
pub struct FunctionExpr {
    pub name: Option<Spanned<String>>,
    pub params: Vec<Spanned<Pattern>>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub enum ArrowBody {
    Expr(Box<Spanned<Expr>>),
    Block(Spanned<Block>),
}

#[derive(Debug, Clone)]
pub struct ArrowExpr {
    pub params: Vec<Spanned<Pattern>>,
    pub body: ArrowBody,
}

/// Minimal type reference for `as` casts and annotations. Types are opaque to
/// the analysis; only their presence matters (type positions are not reads).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Incr,
    Decr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    StrictEq,
    Neq,
    StrictNeq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    In,
    InstanceOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    CoalesceAssign,
}

#[derive(Debug, Clone)]
pub enum TemplatePart {
    Chunk(String),
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Template(Vec<TemplatePart>),
    Ident(String),
    This,
    Super,
    Array(Vec<ArrayElem>),
    Object(Vec<ObjectProp>),
    Unary {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Spanned<Expr>>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Logical {
        op: LogicalOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    Conditional {
        test: Box<Spanned<Expr>>,
        consequent: Box<Spanned<Expr>>,
        alternate: Box<Spanned<Expr>>,
    },
    Assign {
        op: AssignOp,
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Member {
        object: Box<Spanned<Expr>>,
        property: MemberProp,
        optional: bool,
    },
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Arg>,
        optional: bool,
    },
    New {
        callee: Box<Spanned<Expr>>,
        args: Vec<Arg>,
    },
    Function(FunctionExpr),
    Arrow(ArrowExpr),
    Paren(Box<Spanned<Expr>>),
    /// `expr as T`
    Cast {
        expr: Box<Spanned<Expr>>,
        ty: Spanned<TypeRef>,
    },
    /// `expr!`
    NonNull(Box<Spanned<Expr>>),
}

impl Expr {
    /// Peel transparent wrappers: parens, casts, non-null assertions.
    pub fn unwrapped(&self) -> &Expr {
        match self {
            Expr::Paren(inner) | Expr::NonNull(inner) => inner.node.unwrapped(),
            Expr::Cast { expr, .. } => expr.node.unwrapped(),
            other => other,
        }
    }
}
