//! Expression lowering coordinator.
//!
//! `ExprLowerer` owns the lowering context (scope, current function,
//! function-table borrow) and dispatches each `Expr` variant to a focused
//! `lower_*` method implemented in separate files.
//!
//! # Architecture
//!
//! ```text
//! ExprLowerer
//!   ├── lower_literals.rs     — Number, Variable
//!   ├── lower_operators.rs    — Binary
//!   ├── lower_bindings.rs     — Assign, LetIn
//!   ├── lower_control_flow.rs — Sequence, If, For
//!   └── lower_calls.rs        — Call
//! ```
//!
//! Evaluation order is always left-to-right and is an observable
//! contract, not an implementation detail: `Assign` and `Sequence` have
//! side effects.

use rill_ir::{Expr, Name, StringInterner};

use crate::backend::Backend;
use crate::errors::CodegenResult;
use crate::function_table::FunctionTable;
use crate::scope::Scope;
use crate::value_id::{FunctionId, ValueId};

/// Coordinates lowering of one function's body from [`Expr`] nodes to
/// backend value handles.
///
/// Owns the [`Scope`] for the lowering in progress; the function table is
/// borrowed read-only (call resolution never mutates it).
pub struct ExprLowerer<'a, B: Backend> {
    /// The IR emission backend being driven.
    pub(crate) backend: &'a mut B,
    /// Registered functions, for call resolution.
    pub(crate) functions: &'a FunctionTable,
    /// Interner for `Name` → `&str` resolution in emitted names and errors.
    pub(crate) interner: &'a StringInterner,
    /// Current lexical scope (frame stack).
    pub(crate) scope: Scope,
    /// The backend function currently being lowered into.
    pub(crate) current_function: FunctionId,
}

impl<'a, B: Backend> ExprLowerer<'a, B> {
    /// Create a lowerer for one function body.
    pub fn new(
        backend: &'a mut B,
        functions: &'a FunctionTable,
        interner: &'a StringInterner,
        scope: Scope,
        current_function: FunctionId,
    ) -> Self {
        Self {
            backend,
            functions,
            interner,
            scope,
            current_function,
        }
    }

    /// Resolve a `Name` to its string via the interner.
    pub(crate) fn resolve_name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    // -----------------------------------------------------------------------
    // Main dispatch
    // -----------------------------------------------------------------------

    /// Lower an expression, returning the handle of its value.
    ///
    /// Every `Expr` variant is listed explicitly — no catch-all — so
    /// adding a variant to the tree is a compile error here. Any failure
    /// aborts the whole enclosing expression; frames pushed on the way
    /// down are still popped by the constructs that pushed them.
    pub fn lower(&mut self, expr: &Expr) -> CodegenResult<ValueId> {
        match expr {
            // --- Leaves (lower_literals.rs) ---
            Expr::Number(value) => Ok(self.lower_number(*value)),
            Expr::Variable(name) => self.lower_variable(*name),

            // --- Operators (lower_operators.rs) ---
            Expr::Binary { op, left, right } => self.lower_binary(*op, left, right),

            // --- Bindings (lower_bindings.rs) ---
            Expr::Assign { name, value } => self.lower_assign(*name, value),
            Expr::LetIn { bindings, body } => self.lower_let_in(bindings, body),

            // --- Control flow (lower_control_flow.rs) ---
            Expr::Sequence { left, right } => self.lower_sequence(left, right),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => self.lower_if(cond, then_branch, else_branch),
            Expr::For {
                var,
                start,
                end,
                step,
                body,
            } => self.lower_for(*var, start, end, step.as_deref(), body),

            // --- Calls (lower_calls.rs) ---
            Expr::Call { callee, args } => self.lower_call(*callee, args),
        }
    }
}
