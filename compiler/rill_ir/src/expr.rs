//! Expression tree.
//!
//! Every Rill construct is an expression producing an `f64`; there are no
//! statements. Composite nodes own their children through `Box` — the tree
//! is strictly hierarchical, with no sharing and no cycles. `Expr` does not
//! implement `Clone`: a subtree is consumed by reference during lowering
//! and is never duplicated implicitly.

use crate::Name;

/// Binary operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `<` — produces 0.0 or 1.0, not a distinct boolean type.
    Lt,
    /// `>` — produces 0.0 or 1.0, not a distinct boolean type.
    Gt,
}

impl BinaryOp {
    /// The operator's source-level symbol.
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
        }
    }
}

/// One `name = initializer` entry of a [`Expr::LetIn`] group.
#[derive(Debug, PartialEq)]
pub struct LetBinding {
    pub name: Name,
    pub init: Expr,
}

/// Expression node.
///
/// A closed sum over every construct in the language; lowering matches on
/// it exhaustively, so adding a variant is a compile error at each
/// dispatch site.
#[derive(Debug, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),

    /// Variable reference, resolved against the scope at lowering time.
    Variable(Name),

    /// Binary operation. Both operands are always evaluated, left first.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Evaluate `left` for effect, discard its value, yield `right`.
    Sequence { left: Box<Expr>, right: Box<Expr> },

    /// Call a named function; the callee is resolved against the function
    /// table at lowering time.
    Call { callee: Name, args: Vec<Expr> },

    /// Conditional expression. Both branches are mandatory — there is no
    /// value-less `if`.
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    /// Counted loop: `for var = start, var < end, step in body`.
    ///
    /// `step` defaults to 1.0 when absent. The loop itself evaluates
    /// to 0.0.
    For {
        var: Name,
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        body: Box<Expr>,
    },

    /// Assignment to an existing binding; never creates one.
    Assign { name: Name, value: Box<Expr> },

    /// Lexically scoped bindings: `let a = .., b = .. in body`.
    ///
    /// Initializers run left-to-right, each seeing the names bound before
    /// it in the same group.
    LetIn {
        bindings: Vec<LetBinding>,
        body: Box<Expr>,
    },
}
