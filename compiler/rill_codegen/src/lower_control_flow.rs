//! Control flow lowering: sequencing, conditionals, counted loops.

use rill_ir::{Expr, Name};

use crate::backend::Backend;
use crate::errors::CodegenResult;
use crate::expr_lowerer::ExprLowerer;
use crate::value_id::ValueId;

impl<B: Backend> ExprLowerer<'_, B> {
    // -----------------------------------------------------------------------
    // Sequence
    // -----------------------------------------------------------------------

    /// Lower `Expr::Sequence` — evaluate `left` for effect only, then
    /// yield `right`'s value. Failure in either half aborts the whole
    /// expression.
    pub(crate) fn lower_sequence(&mut self, left: &Expr, right: &Expr) -> CodegenResult<ValueId> {
        self.lower(left)?;
        self.lower(right)
    }

    // -----------------------------------------------------------------------
    // If / else
    // -----------------------------------------------------------------------

    /// Lower `Expr::If` into a branch-and-merge graph producing a single
    /// value.
    ///
    /// The condition is truth-tested against 0.0 (non-zero ⇒ then). Both
    /// branches lower under the *same* enclosing scope — neither sees
    /// bindings from the other, and neither contributes bindings past the
    /// merge. The merge value is a control-dependent phi over each
    /// branch's exit block, not a runtime select.
    pub(crate) fn lower_if(
        &mut self,
        cond: &Expr,
        then_branch: &Expr,
        else_branch: &Expr,
    ) -> CodegenResult<ValueId> {
        let cond_val = self.lower(cond)?;
        let zero = self.backend.const_f64(0.0);
        let cond_bool = self.backend.fcmp_one(cond_val, zero, "ifcond");

        let then_bb = self.backend.append_block(self.current_function, "if.then");
        let else_bb = self.backend.append_block(self.current_function, "if.else");
        let merge_bb = self.backend.append_block(self.current_function, "if.merge");

        self.backend.cond_br(cond_bool, then_bb, else_bb);

        // Then branch. Nested control flow moves the insertion point, so
        // the exit block feeding the phi is wherever lowering ends up.
        self.backend.position_at_end(then_bb);
        let then_val = self.lower(then_branch)?;
        let then_exit = self.backend.current_block();
        self.backend.br(merge_bb);

        // Else branch.
        self.backend.position_at_end(else_bb);
        let else_val = self.lower(else_branch)?;
        let else_exit = self.backend.current_block();
        self.backend.br(merge_bb);

        // Merge.
        self.backend.position_at_end(merge_bb);
        let value = self.backend.phi_f64(
            &[(then_val, then_exit), (else_val, else_exit)],
            "if.result",
        );
        Ok(value)
    }

    // -----------------------------------------------------------------------
    // For loop
    // -----------------------------------------------------------------------

    /// Lower `Expr::For`.
    ///
    /// The induction variable lives in a dedicated single-binding frame
    /// scoped exactly to the loop; an outer binding of the same name is
    /// shadowed during the loop and visible again, unchanged, after it.
    /// The frame is popped on every exit path. The loop's own value is
    /// always 0.0.
    pub(crate) fn lower_for(
        &mut self,
        var: Name,
        start: &Expr,
        end: &Expr,
        step: Option<&Expr>,
        body: &Expr,
    ) -> CodegenResult<ValueId> {
        let start_val = self.lower(start)?;

        self.scope.push_frame();
        let result = self.lower_for_inner(var, start_val, end, step, body);
        self.scope.pop_frame();
        result
    }

    fn lower_for_inner(
        &mut self,
        var: Name,
        start_val: ValueId,
        end: &Expr,
        step: Option<&Expr>,
        body: &Expr,
    ) -> CodegenResult<ValueId> {
        let var_str = self.resolve_name(var);
        let slot = self.backend.entry_alloca(self.current_function, var_str);
        self.backend.store(start_val, slot);
        self.scope.declare(var, slot);

        let header_bb = self
            .backend
            .append_block(self.current_function, "for.header");
        let body_bb = self.backend.append_block(self.current_function, "for.body");
        let exit_bb = self.backend.append_block(self.current_function, "for.exit");

        self.backend.br(header_bb);

        // Header: the bound is re-evaluated every iteration, then the
        // current induction value is checked with `<`.
        self.backend.position_at_end(header_bb);
        let end_val = self.lower(end)?;
        let cur = self.backend.load(slot, var_str);
        let in_bounds = self.backend.fcmp_ult(cur, end_val, "loopcond");
        self.backend.cond_br(in_bounds, body_bb, exit_bb);

        // Body: value discarded — the loop is not value-producing.
        self.backend.position_at_end(body_bb);
        self.lower(body)?;

        // Step (default 1.0), then advance through the scope-resolved slot.
        let step_val = match step {
            Some(step_expr) => self.lower(step_expr)?,
            None => self.backend.const_f64(1.0),
        };
        let cur = self.backend.load(slot, var_str);
        let next = self.backend.fadd(cur, step_val, "nextvar");
        self.backend.store(next, slot);
        self.backend.br(header_bb);

        // Exit: the construct's value is the constant 0.0.
        self.backend.position_at_end(exit_bb);
        Ok(self.backend.const_f64(0.0))
    }
}
