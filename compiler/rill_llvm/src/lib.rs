//! LLVM backend for the Rill compiler.
//!
//! Implements the [`rill_codegen::Backend`] capability surface over
//! inkwell. All LLVM values live in an internal arena behind the core's
//! opaque u32 handles, so the `'ctx` lifetime never leaks into the
//! lowering pipeline.
//!
//! One [`LlvmBackend`] owns one LLVM module — the single active
//! compilation context. The driver decides the module's lifecycle
//! (create fresh, hand off to optimization/JIT, discard); the core only
//! requires that one backend be alive for the duration of a lowering
//! call.

mod arena;
mod backend;

pub use backend::LlvmBackend;
