//! The abstract syntax tree (C1). A hand-rolled sum-type AST, grounded on
//! `original_source/`'s use of Python's own `ast` module: every node we need
//! mirrors one `ast.AST` subclass closely enough that the rules read like a
//! direct port of their Python counterparts.
//!
//! Every statement and expression carries its own span so block-pragma
//! resolution (C5) can walk statement end-lines the way
//! `ignores.py::_collect_statement_ranges` does.

use is_macro::Is;

use crate::position::SourceSpan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    /// Depth-first walk over every statement in the module, including
    /// nested bodies. Order matches a Python `ast.walk` over `ast.stmt`
    /// nodes closely enough for governance and suppression purposes.
    pub fn walk_statements(&self) -> impl Iterator<Item = &Stmt> {
        let mut stack: Vec<&Stmt> = self.body.iter().rev().collect();
        std::iter::from_fn(move || {
            let stmt = stack.pop()?;
            for child in stmt.child_bodies().into_iter().rev() {
                stack.extend(child.iter().rev());
            }
            Some(stmt)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decorator {
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub name: String,
    pub annotation: Option<Expr>,
    pub span: SourceSpan,
}

/// A function signature's parameter lists, split the way Python's `ast.arguments`
/// splits them (we only model what the rules need: positional-or-keyword
/// params, `*` markers, and keyword-only params).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Arguments {
    pub posonlyargs: Vec<Arg>,
    pub args: Vec<Arg>,
    pub vararg: Option<Arg>,
    pub kwonlyargs: Vec<Arg>,
    pub kwarg: Option<Arg>,
    /// `true` if the signature already has a bare `*` or `*args` separator.
    pub has_star_separator: bool,
}

impl Arguments {
    /// Positional-or-keyword parameters in declaration order: posonly then
    /// regular args, matching `effective_count` in `rules/kw001.py`.
    pub fn positional_params(&self) -> impl Iterator<Item = &Arg> {
        self.posonlyargs.iter().chain(self.args.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Is)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Import(Import),
    ImportFrom(ImportFrom),
    Assign(Assign),
    AnnAssign(AnnAssign),
    AugAssign(AugAssign),
    Return(Return),
    If(If),
    Try(Try),
    Expr(ExprStmt),
    Other(OtherStmt),
}

impl Stmt {
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::FunctionDef(s) => s.span,
            Self::ClassDef(s) => s.span,
            Self::Import(s) => s.span,
            Self::ImportFrom(s) => s.span,
            Self::Assign(s) => s.span,
            Self::AnnAssign(s) => s.span,
            Self::AugAssign(s) => s.span,
            Self::Return(s) => s.span,
            Self::If(s) => s.span,
            Self::Try(s) => s.span,
            Self::Expr(s) => s.span,
            Self::Other(s) => s.span,
        }
    }

    /// The line a block pragma above this statement should resolve against:
    /// the decorator line for decorated defs, the statement's own start
    /// line otherwise. Mirrors `_collect_statement_ranges`.
    pub fn effective_start_line(&self) -> u32 {
        let decorators = match self {
            Self::FunctionDef(f) => &f.decorators,
            Self::ClassDef(c) => &c.decorators,
            _ => return self.span().line(),
        };
        decorators
            .first()
            .map(|d| d.expr.span().line())
            .unwrap_or_else(|| self.span().line())
    }

    pub fn end_line(&self) -> u32 {
        self.span().end.map_or(self.span().line(), |e| e.line)
    }

    fn child_bodies(&self) -> Vec<&[Stmt]> {
        match self {
            Self::FunctionDef(f) => vec![f.body.as_slice()],
            Self::ClassDef(c) => vec![c.body.as_slice()],
            Self::If(i) => vec![i.body.as_slice(), i.orelse.as_slice()],
            Self::Try(t) => {
                let mut bodies = vec![t.body.as_slice(), t.orelse.as_slice(), t.finalbody.as_slice()];
                bodies.extend(t.handlers.iter().map(|h| h.body.as_slice()));
                bodies
            }
            _ => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub is_async: bool,
    pub decorators: Vec<Decorator>,
    pub args: Arguments,
    pub returns: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: SourceSpan,
    /// Line/column of the `def`/`async def` keyword, used to compute the
    /// insertion point for `-> None` and `*` separators.
    pub header_span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub bases: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAlias {
    pub name: String,
    pub asname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub names: Vec<ImportAlias>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFrom {
    pub module: Option<String>,
    pub level: u32,
    pub names: Vec<ImportAlias>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assign {
    pub targets: Vec<Expr>,
    pub value: Expr,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnAssign {
    pub target: Expr,
    pub annotation: Expr,
    pub value: Option<Expr>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugAssign {
    pub target: Expr,
    pub value: Expr,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Return {
    pub value: Option<Expr>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptHandler {
    /// The exception type(s) being caught, e.g. `ImportError`. `None` for a
    /// bare `except:`.
    pub kind: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Try {
    pub body: Vec<Stmt>,
    pub handlers: Vec<ExceptHandler>,
    pub orelse: Vec<Stmt>,
    pub finalbody: Vec<Stmt>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub value: Expr,
    pub span: SourceSpan,
}

/// A statement kind this crate doesn't need to inspect further (`pass`,
/// `while`, `for`, `with`, raw expressions other rules don't visit, etc).
/// We still keep it in the tree so indentation/structure stays intact for
/// anything that walks bodies generically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherStmt {
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Is)]
pub enum Expr {
    Name(NameExpr),
    Attribute(AttributeExpr),
    Subscript(SubscriptExpr),
    BinOp(BinOpExpr),
    Constant(ConstantExpr),
    Call(CallExpr),
    Tuple(TupleExpr),
    Other(OtherExpr),
}

impl Expr {
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::Name(e) => e.span,
            Self::Attribute(e) => e.span,
            Self::Subscript(e) => e.span,
            Self::BinOp(e) => e.span,
            Self::Constant(e) => e.span,
            Self::Call(e) => e.span,
            Self::Tuple(e) => e.span,
            Self::Other(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameExpr {
    pub id: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeExpr {
    pub value: Box<Expr>,
    pub attr: String,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptExpr {
    pub value: Box<Expr>,
    pub slice: Box<Expr>,
    pub span: SourceSpan,
}

/// `|` used as a type union (`BinOp(left, BitOr, right)` in `ast`). We only
/// ever construct this for the bitwise-or operator; other binary operators
/// fall into [`Expr::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinOpExpr {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Is)]
pub enum ConstantValue {
    None,
    Bool(bool),
    Str(String),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantExpr {
    pub value: ConstantValue,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherExpr {
    pub span: SourceSpan,
}

/// A subscript's comma-separated slice contents, e.g. the `str, List[int]`
/// in `Dict[str, List[int]]`. Only produced inside subscripts -- general
/// tuple *expressions* fall into [`Expr::Other`], since no rule needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleExpr {
    pub elts: Vec<Expr>,
    pub span: SourceSpan,
}

impl Expr {
    /// `a.b.c` flattened to `"a.b.c"`, used to match `typing.Optional` style
    /// attribute access the way `typ010.py` tracks `_typing_imports`.
    pub fn dotted_name(&self) -> Option<String> {
        match self {
            Self::Name(n) => Some(n.id.clone()),
            Self::Attribute(a) => {
                let base = a.value.dotted_name()?;
                Some(format!("{base}.{}", a.attr))
            }
            _ => None,
        }
    }
}
