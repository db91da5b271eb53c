//! IR emission backend capability trait.
//!
//! The lowering pipeline drives an abstract instruction builder through
//! this trait; it never sees backend-native values, only the opaque ID
//! handles from [`value_id`](crate::value_id). Implementations include
//! the in-tree [`InterpBackend`](crate::InterpBackend) and the LLVM
//! backend in `rill_llvm`.
//!
//! Rill has exactly one value type, `f64`, so the surface is the f64
//! subset of a general instruction builder: float constants and
//! arithmetic, unordered float comparisons (i1-valued, widened back to
//! f64 with [`ui_to_fp`](Backend::ui_to_fp)), mutable slots with
//! load/store, block/branch/phi plumbing, and function-level operations.
//!
//! Methods are infallible: semantic failures (unknown identifiers, arity
//! conflicts, …) are decided by the lowerer before emission, and
//! backend-internal defects surface through
//! [`verify_function`](Backend::verify_function).

use crate::value_id::{BlockId, FunctionId, SlotId, ValueId};

/// Abstract IR emission backend.
///
/// Every `name` parameter is a hint for the emitted entity's textual IR
/// name; backends may ignore it.
pub trait Backend {
    // -- Constants --

    /// Emit an f64 constant.
    fn const_f64(&mut self, value: f64) -> ValueId;

    // -- Arithmetic --

    /// Emit a float addition.
    fn fadd(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;
    /// Emit a float subtraction.
    fn fsub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;
    /// Emit a float multiplication.
    fn fmul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;
    /// Emit a float division.
    fn fdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;

    // -- Comparisons --

    /// Emit an unordered `<` comparison; the result is i1-valued.
    fn fcmp_ult(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;
    /// Emit an unordered `>` comparison; the result is i1-valued.
    fn fcmp_ugt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;
    /// Emit an ordered `!=` comparison; the result is i1-valued.
    fn fcmp_one(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId;
    /// Widen an i1 comparison result to f64 (0.0 or 1.0).
    fn ui_to_fp(&mut self, val: ValueId, name: &str) -> ValueId;

    // -- Mutable slots --

    /// Allocate a mutable f64 slot in `func`'s entry block.
    fn entry_alloca(&mut self, func: FunctionId, name: &str) -> SlotId;
    /// Load the current value of a slot.
    fn load(&mut self, slot: SlotId, name: &str) -> ValueId;
    /// Store a value into a slot.
    fn store(&mut self, val: ValueId, slot: SlotId);

    // -- Blocks and branches --

    /// Append a new basic block to `func`.
    fn append_block(&mut self, func: FunctionId, name: &str) -> BlockId;
    /// Move the insertion point to the end of `block`.
    fn position_at_end(&mut self, block: BlockId);
    /// The block instructions are currently being appended to.
    ///
    /// Lowering nested control flow moves the insertion point, so a
    /// construct that needs its branch's *exit* block must ask after
    /// lowering the branch, not before.
    fn current_block(&self) -> BlockId;
    /// Emit an unconditional branch.
    fn br(&mut self, dest: BlockId);
    /// Emit a conditional branch on an i1 value.
    fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId);
    /// Emit an f64 phi merging one incoming value per predecessor edge.
    fn phi_f64(&mut self, incoming: &[(ValueId, BlockId)], name: &str) -> ValueId;

    // -- Calls --

    /// Emit a call to a previously declared function.
    fn call(&mut self, callee: FunctionId, args: &[ValueId], name: &str) -> ValueId;

    // -- Functions --

    /// Declare a function taking `arity` f64 parameters and returning f64.
    fn declare_function(&mut self, name: &str, arity: usize) -> FunctionId;
    /// The value of `func`'s parameter at `index`.
    fn param(&mut self, func: FunctionId, index: usize) -> ValueId;
    /// Attach a textual name to a value (a hint; backends may ignore it).
    fn set_value_name(&mut self, val: ValueId, name: &str);
    /// Emit a return terminator.
    fn ret(&mut self, val: ValueId);
    /// Structurally verify a finished function.
    ///
    /// `false` signals an internal-invariant violation, not a user error;
    /// the caller removes the malformed function via
    /// [`delete_function`](Backend::delete_function).
    fn verify_function(&mut self, func: FunctionId) -> bool;
    /// Remove a function and its body from the backend entirely.
    fn delete_function(&mut self, func: FunctionId);
}
