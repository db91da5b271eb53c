//! Arena mapping the core's opaque IDs to inkwell values.
//!
//! The core addresses every value, block, function, and slot through
//! `Copy` u32 handles; this arena is where the actual inkwell objects
//! live. Internal to `LlvmBackend` — callers never see the `'ctx`
//! lifetime.

use inkwell::basic_block::BasicBlock;
use inkwell::values::{BasicValueEnum, FunctionValue, PointerValue};

use rill_codegen::{BlockId, FunctionId, SlotId, ValueId};

/// Stores LLVM values behind the core's opaque IDs.
pub(crate) struct ValueArena<'ctx> {
    values: Vec<BasicValueEnum<'ctx>>,
    blocks: Vec<BasicBlock<'ctx>>,
    functions: Vec<FunctionValue<'ctx>>,
    slots: Vec<PointerValue<'ctx>>,
}

impl<'ctx> ValueArena<'ctx> {
    /// Create an empty arena.
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            blocks: Vec::new(),
            functions: Vec::new(),
            slots: Vec::new(),
        }
    }

    // -- Values --

    pub(crate) fn push_value(&mut self, value: BasicValueEnum<'ctx>) -> ValueId {
        let id = ValueId::from_raw(index_u32(self.values.len()));
        self.values.push(value);
        id
    }

    pub(crate) fn value(&self, id: ValueId) -> BasicValueEnum<'ctx> {
        self.values[id.raw() as usize]
    }

    // -- Blocks --

    pub(crate) fn push_block(&mut self, block: BasicBlock<'ctx>) -> BlockId {
        let id = BlockId::from_raw(index_u32(self.blocks.len()));
        self.blocks.push(block);
        id
    }

    pub(crate) fn block(&self, id: BlockId) -> BasicBlock<'ctx> {
        self.blocks[id.raw() as usize]
    }

    // -- Functions --

    pub(crate) fn push_function(&mut self, function: FunctionValue<'ctx>) -> FunctionId {
        let id = FunctionId::from_raw(index_u32(self.functions.len()));
        self.functions.push(function);
        id
    }

    pub(crate) fn function(&self, id: FunctionId) -> FunctionValue<'ctx> {
        self.functions[id.raw() as usize]
    }

    // -- Slots --

    pub(crate) fn push_slot(&mut self, ptr: PointerValue<'ctx>) -> SlotId {
        let id = SlotId::from_raw(index_u32(self.slots.len()));
        self.slots.push(ptr);
        id
    }

    pub(crate) fn slot(&self, id: SlotId) -> PointerValue<'ctx> {
        self.slots[id.raw() as usize]
    }
}

fn index_u32(len: usize) -> u32 {
    u32::try_from(len).expect("arena index overflow")
}
