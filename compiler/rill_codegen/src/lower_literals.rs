//! Leaf expression lowering: literals and variable reads.

use rill_ir::Name;

use crate::backend::Backend;
use crate::errors::{CodegenError, CodegenResult};
use crate::expr_lowerer::ExprLowerer;
use crate::value_id::ValueId;

impl<B: Backend> ExprLowerer<'_, B> {
    /// Lower `Expr::Number` — a constant load. Never fails.
    pub(crate) fn lower_number(&mut self, value: f64) -> ValueId {
        self.backend.const_f64(value)
    }

    /// Lower `Expr::Variable` — resolve against the scope, then load from
    /// the binding's slot.
    pub(crate) fn lower_variable(&mut self, name: Name) -> CodegenResult<ValueId> {
        let name_str = self.resolve_name(name);
        match self.scope.lookup(name) {
            Some(slot) => Ok(self.backend.load(slot, name_str)),
            None => Err(CodegenError::UnknownIdentifier {
                name: name_str.to_owned(),
            }),
        }
    }
}
