//! Assignment and `let..in` binding lowering.

use rill_ir::{Expr, LetBinding, Name};

use crate::backend::Backend;
use crate::errors::{CodegenError, CodegenResult};
use crate::expr_lowerer::ExprLowerer;
use crate::value_id::ValueId;

impl<B: Backend> ExprLowerer<'_, B> {
    /// Lower `Expr::Assign` — store into an existing binding's slot.
    ///
    /// Assignment mutates the cell behind the innermost visible binding;
    /// it never creates one. Yields the assigned value.
    pub(crate) fn lower_assign(&mut self, name: Name, value: &Expr) -> CodegenResult<ValueId> {
        let val = self.lower(value)?;
        match self.scope.lookup(name) {
            Some(slot) => {
                self.backend.store(val, slot);
                Ok(val)
            }
            None => Err(CodegenError::UnboundAssignment {
                name: self.resolve_name(name).to_owned(),
            }),
        }
    }

    /// Lower `Expr::LetIn` — one frame for the whole binding group.
    ///
    /// Initializers run left-to-right under the partially extended frame,
    /// so each may reference the names bound before it (and a repeated
    /// name shadows its predecessor only once its own initializer has
    /// run). The frame is popped on every exit path, success or failure.
    pub(crate) fn lower_let_in(
        &mut self,
        bindings: &[LetBinding],
        body: &Expr,
    ) -> CodegenResult<ValueId> {
        self.scope.push_frame();
        let result = self.lower_let_in_inner(bindings, body);
        self.scope.pop_frame();
        result
    }

    fn lower_let_in_inner(
        &mut self,
        bindings: &[LetBinding],
        body: &Expr,
    ) -> CodegenResult<ValueId> {
        for binding in bindings {
            let init = self.lower(&binding.init)?;
            let name_str = self.resolve_name(binding.name);
            let slot = self.backend.entry_alloca(self.current_function, name_str);
            self.backend.store(init, slot);
            self.scope.declare(binding.name, slot);
        }
        self.lower(body)
    }
}
