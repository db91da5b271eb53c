//! Per-name function declaration state machine.
//!
//! The table is explicit, host-owned state: it persists across top-level
//! compilations so a later function can call an earlier one (REPL-style
//! incremental compilation), and the driver decides when to construct a
//! fresh one.
//!
//! Each name moves through `Unseen → Declared → Defined`:
//! - first sight (extern or definition) with arity N registers `(name, N)`;
//! - a definition for a `Declared` name with the same arity attaches the
//!   body;
//! - a definition for a `Defined` name is a [`Redefinition`] — bodies are
//!   never overwritten;
//! - any arity disagreement with an existing entry is a
//!   [`SignatureConflict`].
//!
//! [`Redefinition`]: crate::CodegenError::Redefinition
//! [`SignatureConflict`]: crate::CodegenError::SignatureConflict

use rustc_hash::FxHashMap;

use rill_ir::{Name, Prototype, StringInterner};

use crate::errors::{CodegenError, CodegenResult};
use crate::value_id::FunctionId;

/// One registered function: its prototype, its backend handle, and
/// whether a body has been attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionInfo {
    pub proto: Prototype,
    pub func: FunctionId,
    pub defined: bool,
}

/// Name → [`FunctionInfo`] registry.
#[derive(Debug, Default)]
pub struct FunctionTable {
    entries: FxHashMap<Name, FunctionInfo>,
}

impl FunctionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        FunctionTable {
            entries: FxHashMap::default(),
        }
    }

    /// Look up a registered function by name.
    pub fn get(&self, name: Name) -> Option<&FunctionInfo> {
        self.entries.get(&name)
    }

    /// True if `name` has a body attached.
    pub fn is_defined(&self, name: Name) -> bool {
        self.entries.get(&name).is_some_and(|info| info.defined)
    }

    /// Resolve a declaration (an extern, or the first sight of a
    /// definition's prototype).
    ///
    /// Returns the existing backend handle when the name is already
    /// registered with the same arity, or `None` when the caller must
    /// create and [`register`](Self::register) one. Re-declaring an
    /// already-defined name with a matching arity is a harmless no-op.
    pub fn resolve_declaration(
        &self,
        proto: &Prototype,
        interner: &StringInterner,
    ) -> CodegenResult<Option<FunctionId>> {
        match self.entries.get(&proto.name) {
            Some(info) if info.proto.arity() == proto.arity() => Ok(Some(info.func)),
            Some(_) => Err(CodegenError::SignatureConflict {
                name: interner.lookup(proto.name).to_owned(),
            }),
            None => Ok(None),
        }
    }

    /// Resolve the prototype of a full definition, enforcing the
    /// redefinition rules before any instruction is emitted.
    ///
    /// Returns the `Declared` entry's backend handle, or `None` for an
    /// unseen name (the caller declares it first).
    pub fn resolve_definition(
        &self,
        proto: &Prototype,
        interner: &StringInterner,
    ) -> CodegenResult<Option<FunctionId>> {
        match self.entries.get(&proto.name) {
            Some(info) if info.defined => Err(CodegenError::Redefinition {
                name: interner.lookup(proto.name).to_owned(),
            }),
            Some(info) if info.proto.arity() != proto.arity() => {
                Err(CodegenError::SignatureConflict {
                    name: interner.lookup(proto.name).to_owned(),
                })
            }
            Some(info) => Ok(Some(info.func)),
            None => Ok(None),
        }
    }

    /// Register a freshly declared prototype (`Unseen → Declared`).
    pub fn register(&mut self, proto: Prototype, func: FunctionId) {
        debug_assert!(
            !self.entries.contains_key(&proto.name),
            "register over an existing entry"
        );
        self.entries.insert(
            proto.name,
            FunctionInfo {
                proto,
                func,
                defined: false,
            },
        );
    }

    /// Attach a body to a declared name (`Declared → Defined`).
    pub fn mark_defined(&mut self, name: Name) {
        if let Some(info) = self.entries.get_mut(&name) {
            info.defined = true;
        }
    }

    /// Remove an entry entirely; the name reverts to `Unseen`.
    ///
    /// Used when a staged definition fails after IR emission began, so
    /// the name is never left half-registered.
    pub fn remove(&mut self, name: Name) -> Option<FunctionInfo> {
        self.entries.remove(&name)
    }
}
