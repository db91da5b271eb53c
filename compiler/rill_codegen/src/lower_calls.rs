//! Call lowering.

use rill_ir::{Expr, Name};

use crate::backend::Backend;
use crate::errors::{CodegenError, CodegenResult};
use crate::expr_lowerer::ExprLowerer;
use crate::value_id::ValueId;

impl<B: Backend> ExprLowerer<'_, B> {
    /// Lower `Expr::Call`.
    ///
    /// The callee is resolved by name against the function table, and the
    /// arity check happens before any argument is lowered — a mismatched
    /// call emits no instructions at all. Arguments lower left-to-right.
    pub(crate) fn lower_call(&mut self, callee: Name, args: &[Expr]) -> CodegenResult<ValueId> {
        let Some(info) = self.functions.get(callee) else {
            return Err(CodegenError::UnknownFunction {
                name: self.resolve_name(callee).to_owned(),
            });
        };

        let expected = info.proto.arity();
        if expected != args.len() {
            return Err(CodegenError::ArityMismatch {
                name: self.resolve_name(callee).to_owned(),
                expected,
                got: args.len(),
            });
        }
        let func = info.func;

        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.lower(arg)?);
        }

        Ok(self.backend.call(func, &arg_vals, "calltmp"))
    }
}
