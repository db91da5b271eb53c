//! Code generation core for the Rill compiler.
//!
//! Lowers the [`rill_ir`] expression tree into an abstract IR emission
//! backend. The backend itself — LLVM, the in-tree reference interpreter,
//! anything that can satisfy [`Backend`] — is an external collaborator;
//! this crate owns the semantics: scoping, control-flow shaping, function
//! identity, and the error contract.
//!
//! Key types:
//! - [`Backend`] — the IR emission capability surface, addressed through
//!   opaque `Copy` ID handles
//! - [`Scope`] — frame-stack variable scoping with guaranteed restoration
//! - [`ExprLowerer`] — expression lowering coordinator
//! - [`FunctionTable`] / [`FunctionCompiler`] — function & prototype
//!   identity, redefinition rules, whole-function lowering
//! - [`InterpBackend`] — reference record-and-execute backend
//!
//! # Module Organization
//!
//! ```text
//! rill_codegen/
//! ├── value_id.rs         — Opaque ID newtypes (ValueId, BlockId, …)
//! ├── backend.rs          — Backend capability trait
//! ├── scope.rs            — Frame-stack variable scoping
//! ├── errors.rs           — CodegenError / CodegenResult
//! ├── expr_lowerer.rs     — ExprLowerer struct + dispatch
//! ├── lower_literals.rs   — Number, Variable
//! ├── lower_operators.rs  — Binary operators
//! ├── lower_bindings.rs   — Assign, LetIn
//! ├── lower_control_flow.rs — Sequence, If, For
//! ├── lower_calls.rs      — Call
//! ├── function_table.rs   — Per-name declaration state machine
//! ├── function_compiler.rs — Whole-function lowering + verification
//! └── interp.rs           — Reference record-and-execute backend
//! ```

pub mod backend;
pub mod errors;
pub mod expr_lowerer;
pub mod function_compiler;
pub mod function_table;
pub mod interp;
pub mod scope;
pub mod value_id;

mod lower_bindings;
mod lower_calls;
mod lower_control_flow;
mod lower_literals;
mod lower_operators;

#[cfg(test)]
mod tests;

pub use backend::Backend;
pub use errors::{CodegenError, CodegenResult};
pub use expr_lowerer::ExprLowerer;
pub use function_compiler::FunctionCompiler;
pub use function_table::{FunctionInfo, FunctionTable};
pub use interp::{ExecError, InterpBackend};
pub use scope::Scope;
pub use value_id::{BlockId, FunctionId, SlotId, ValueId};
