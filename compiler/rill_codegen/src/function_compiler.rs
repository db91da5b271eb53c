//! Whole-function lowering.
//!
//! `FunctionCompiler` resolves a function's identity against the table,
//! sets up the entry block and parameter bindings, lowers the body, and
//! submits the result for structural verification.
//!
//! Publication is two-phase: the table entry is only marked `Defined`
//! after verification succeeds. On any failure once IR emission has
//! begun — a semantic error inside the body, or a verification failure —
//! the staged backend function is deleted and the table entry removed, so
//! the name never remains half-registered.

use tracing::{debug, trace, warn};

use rill_ir::{Function, Prototype, StringInterner};

use crate::backend::Backend;
use crate::errors::{CodegenError, CodegenResult};
use crate::expr_lowerer::ExprLowerer;
use crate::function_table::FunctionTable;
use crate::scope::Scope;
use crate::value_id::FunctionId;

/// Compiles prototypes and function definitions against one backend and
/// one host-owned [`FunctionTable`].
pub struct FunctionCompiler<'a, B: Backend> {
    backend: &'a mut B,
    table: &'a mut FunctionTable,
    interner: &'a StringInterner,
}

impl<'a, B: Backend> FunctionCompiler<'a, B> {
    /// Create a compiler borrowing the backend and table for a batch of
    /// top-level compilations.
    pub fn new(
        backend: &'a mut B,
        table: &'a mut FunctionTable,
        interner: &'a StringInterner,
    ) -> Self {
        Self {
            backend,
            table,
            interner,
        }
    }

    // -----------------------------------------------------------------------
    // Prototypes
    // -----------------------------------------------------------------------

    /// Compile a prototype (an extern or forward declaration).
    ///
    /// Registers `(name, arity)` on first sight; resolves to the existing
    /// handle on a compatible re-declaration; fails with
    /// [`SignatureConflict`](CodegenError::SignatureConflict) on arity
    /// disagreement.
    pub fn compile_prototype(&mut self, proto: &Prototype) -> CodegenResult<FunctionId> {
        debug_assert!(params_distinct(proto), "duplicate parameter names");

        if let Some(existing) = self.table.resolve_declaration(proto, self.interner)? {
            trace!(name = self.interner.lookup(proto.name), "re-declaration");
            return Ok(existing);
        }

        let name_str = self.interner.lookup(proto.name);
        debug!(name = name_str, arity = proto.arity(), "declaring function");
        let func = self.backend.declare_function(name_str, proto.arity());
        self.table.register(proto.clone(), func);
        Ok(func)
    }

    // -----------------------------------------------------------------------
    // Definitions
    // -----------------------------------------------------------------------

    /// Compile a function. A body-less `Function` is an extern and
    /// behaves exactly like [`compile_prototype`](Self::compile_prototype).
    ///
    /// Redefinition rules are enforced before any instruction is emitted.
    pub fn compile_function(&mut self, function: &Function) -> CodegenResult<FunctionId> {
        let proto = &function.proto;
        let Some(body) = &function.body else {
            return self.compile_prototype(proto);
        };
        debug_assert!(params_distinct(proto), "duplicate parameter names");

        // Resolve identity first: Defined ⇒ Redefinition, arity
        // disagreement ⇒ SignatureConflict, Declared ⇒ reuse the handle.
        let existing = self.table.resolve_definition(proto, self.interner)?;
        let name_str = self.interner.lookup(proto.name);
        let func = match existing {
            Some(func) => func,
            None => {
                let func = self.backend.declare_function(name_str, proto.arity());
                // Registered before body lowering so the body can
                // recursively call the function being defined.
                self.table.register(proto.clone(), func);
                func
            }
        };

        debug!(name = name_str, "defining function body");
        let entry = self.backend.append_block(func, "entry");
        self.backend.position_at_end(entry);

        // Parameters are mutable: each gets an entry-block slot holding
        // its incoming value, reassignable within the body.
        let mut scope = Scope::new();
        scope.push_frame();
        for (index, &param_name) in proto.params.iter().enumerate() {
            let param_str = self.interner.lookup(param_name);
            let incoming = self.backend.param(func, index);
            self.backend.set_value_name(incoming, param_str);
            let slot = self.backend.entry_alloca(func, param_str);
            self.backend.store(incoming, slot);
            scope.declare(param_name, slot);
        }

        let mut lowerer =
            ExprLowerer::new(&mut *self.backend, &*self.table, self.interner, scope, func);
        let lowered = lowerer.lower(body);
        lowerer.scope.pop_frame();
        debug_assert_eq!(lowerer.scope.depth(), 0, "scope frames leaked");
        drop(lowerer);

        let result = match lowered {
            Ok(value) => {
                self.backend.ret(value);
                if self.backend.verify_function(func) {
                    self.table.mark_defined(proto.name);
                    return Ok(func);
                }
                warn!(name = name_str, "function failed structural verification");
                Err(CodegenError::VerificationFailed {
                    name: name_str.to_owned(),
                })
            }
            Err(err) => Err(err),
        };

        // Failure after IR emission began: discard the staged function
        // and revert the name to unseen.
        self.backend.delete_function(func);
        self.table.remove(proto.name);
        result
    }
}

/// Parameter names within one prototype must be pairwise distinct — a
/// well-formedness obligation on the parser, checked in debug builds.
fn params_distinct(proto: &Prototype) -> bool {
    proto
        .params
        .iter()
        .all(|p| proto.params.iter().filter(|q| *q == p).count() == 1)
}
