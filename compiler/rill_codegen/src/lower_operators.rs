//! Binary operator lowering.

use rill_ir::{BinaryOp, Expr};

use crate::backend::Backend;
use crate::errors::CodegenResult;
use crate::expr_lowerer::ExprLowerer;
use crate::value_id::ValueId;

impl<B: Backend> ExprLowerer<'_, B> {
    /// Lower `Expr::Binary`.
    ///
    /// Operands are lowered left then right and both are always
    /// evaluated — there is no short-circuiting. Comparisons produce an
    /// i1 that is widened back to 0.0/1.0, the language's only type.
    pub(crate) fn lower_binary(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> CodegenResult<ValueId> {
        let lhs = self.lower(left)?;
        let rhs = self.lower(right)?;

        let value = match op {
            BinaryOp::Add => self.backend.fadd(lhs, rhs, "addtmp"),
            BinaryOp::Sub => self.backend.fsub(lhs, rhs, "subtmp"),
            BinaryOp::Mul => self.backend.fmul(lhs, rhs, "multmp"),
            BinaryOp::Div => self.backend.fdiv(lhs, rhs, "divtmp"),
            BinaryOp::Lt => {
                let cmp = self.backend.fcmp_ult(lhs, rhs, "cmptmp");
                self.backend.ui_to_fp(cmp, "booltmp")
            }
            BinaryOp::Gt => {
                let cmp = self.backend.fcmp_ugt(lhs, rhs, "cmptmp");
                self.backend.ui_to_fp(cmp, "booltmp")
            }
        };
        Ok(value)
    }
}
