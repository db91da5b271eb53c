//! `Backend` implementation over inkwell.

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::BasicMetadataTypeEnum;
use inkwell::values::{BasicMetadataValueEnum, BasicValue};
use inkwell::FloatPredicate;

use rill_codegen::{Backend, BlockId, FunctionId, SlotId, ValueId};

use crate::arena::ValueArena;

/// LLVM implementation of the core's IR emission surface.
///
/// Owns one module and one instruction builder. Every Rill value is an
/// f64; slots are entry-block allocas, and comparison results stay i1
/// until the lowerer widens them.
pub struct LlvmBackend<'ctx> {
    llcx: &'ctx Context,
    llmod: Module<'ctx>,
    builder: Builder<'ctx>,
    arena: ValueArena<'ctx>,
    current_block: Option<BlockId>,
}

impl<'ctx> LlvmBackend<'ctx> {
    /// Create a backend owning a fresh module.
    pub fn new(llcx: &'ctx Context, module_name: &str) -> Self {
        Self {
            llcx,
            llmod: llcx.create_module(module_name),
            builder: llcx.create_builder(),
            arena: ValueArena::new(),
            current_block: None,
        }
    }

    /// The module being built, for hand-off to optimization or a JIT.
    pub fn module(&self) -> &Module<'ctx> {
        &self.llmod
    }

    fn float(&self, id: ValueId) -> inkwell::values::FloatValue<'ctx> {
        self.arena.value(id).into_float_value()
    }

    fn push(&mut self, value: impl BasicValue<'ctx>) -> ValueId {
        self.arena.push_value(value.as_basic_value_enum())
    }
}

impl Backend for LlvmBackend<'_> {
    fn const_f64(&mut self, value: f64) -> ValueId {
        let v = self.llcx.f64_type().const_float(value);
        self.push(v)
    }

    fn fadd(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let v = self
            .builder
            .build_float_add(self.float(lhs), self.float(rhs), name)
            .expect("build fadd");
        self.push(v)
    }

    fn fsub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let v = self
            .builder
            .build_float_sub(self.float(lhs), self.float(rhs), name)
            .expect("build fsub");
        self.push(v)
    }

    fn fmul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let v = self
            .builder
            .build_float_mul(self.float(lhs), self.float(rhs), name)
            .expect("build fmul");
        self.push(v)
    }

    fn fdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let v = self
            .builder
            .build_float_div(self.float(lhs), self.float(rhs), name)
            .expect("build fdiv");
        self.push(v)
    }

    fn fcmp_ult(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let v = self
            .builder
            .build_float_compare(FloatPredicate::ULT, self.float(lhs), self.float(rhs), name)
            .expect("build fcmp ult");
        self.push(v)
    }

    fn fcmp_ugt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let v = self
            .builder
            .build_float_compare(FloatPredicate::UGT, self.float(lhs), self.float(rhs), name)
            .expect("build fcmp ugt");
        self.push(v)
    }

    fn fcmp_one(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let v = self
            .builder
            .build_float_compare(FloatPredicate::ONE, self.float(lhs), self.float(rhs), name)
            .expect("build fcmp one");
        self.push(v)
    }

    fn ui_to_fp(&mut self, val: ValueId, name: &str) -> ValueId {
        let int = self.arena.value(val).into_int_value();
        let v = self
            .builder
            .build_unsigned_int_to_float(int, self.llcx.f64_type(), name)
            .expect("build uitofp");
        self.push(v)
    }

    fn entry_alloca(&mut self, func: FunctionId, name: &str) -> SlotId {
        // Allocas belong in the entry block so mem2reg can promote them;
        // a temporary builder keeps the main insertion point untouched.
        let function = self.arena.function(func);
        let entry = function
            .get_first_basic_block()
            .expect("entry_alloca before entry block");
        let tmp = self.llcx.create_builder();
        match entry.get_first_instruction() {
            Some(first) => tmp.position_before(&first),
            None => tmp.position_at_end(entry),
        }
        let ptr = tmp
            .build_alloca(self.llcx.f64_type(), name)
            .expect("build alloca");
        self.arena.push_slot(ptr)
    }

    fn load(&mut self, slot: SlotId, name: &str) -> ValueId {
        let ptr = self.arena.slot(slot);
        let v = self
            .builder
            .build_load(self.llcx.f64_type(), ptr, name)
            .expect("build load");
        self.push(v)
    }

    fn store(&mut self, val: ValueId, slot: SlotId) {
        let ptr = self.arena.slot(slot);
        let value = self.arena.value(val);
        self.builder.build_store(ptr, value).expect("build store");
    }

    fn append_block(&mut self, func: FunctionId, name: &str) -> BlockId {
        let function = self.arena.function(func);
        let block = self.llcx.append_basic_block(function, name);
        self.arena.push_block(block)
    }

    fn position_at_end(&mut self, block: BlockId) {
        self.builder.position_at_end(self.arena.block(block));
        self.current_block = Some(block);
    }

    fn current_block(&self) -> BlockId {
        self.current_block.unwrap_or(BlockId::NONE)
    }

    fn br(&mut self, dest: BlockId) {
        self.builder
            .build_unconditional_branch(self.arena.block(dest))
            .expect("build br");
    }

    fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId) {
        let cond = self.arena.value(cond).into_int_value();
        self.builder
            .build_conditional_branch(cond, self.arena.block(then_bb), self.arena.block(else_bb))
            .expect("build cond br");
    }

    fn phi_f64(&mut self, incoming: &[(ValueId, BlockId)], name: &str) -> ValueId {
        let phi = self
            .builder
            .build_phi(self.llcx.f64_type(), name)
            .expect("build phi");
        let resolved: Vec<_> = incoming
            .iter()
            .map(|&(val, block)| (self.arena.value(val), self.arena.block(block)))
            .collect();
        for (val, block) in &resolved {
            phi.add_incoming(&[(val as &dyn BasicValue<'_>, *block)]);
        }
        self.push(phi.as_basic_value())
    }

    fn call(&mut self, callee: FunctionId, args: &[ValueId], name: &str) -> ValueId {
        let function = self.arena.function(callee);
        let resolved: Vec<BasicMetadataValueEnum<'_>> = args
            .iter()
            .map(|&arg| self.arena.value(arg).into())
            .collect();
        let site = self
            .builder
            .build_call(function, &resolved, name)
            .expect("build call");
        let value = site
            .try_as_basic_value()
            .left()
            .expect("call returns f64");
        self.push(value)
    }

    fn declare_function(&mut self, name: &str, arity: usize) -> FunctionId {
        let f64_ty = self.llcx.f64_type();
        let params: Vec<BasicMetadataTypeEnum<'_>> = (0..arity).map(|_| f64_ty.into()).collect();
        let fn_ty = f64_ty.fn_type(&params, false);
        let function = self.llmod.add_function(name, fn_ty, None);
        self.arena.push_function(function)
    }

    fn param(&mut self, func: FunctionId, index: usize) -> ValueId {
        let function = self.arena.function(func);
        let value = function
            .get_nth_param(u32::try_from(index).expect("parameter index overflow"))
            .expect("parameter index in range");
        self.arena.push_value(value)
    }

    fn set_value_name(&mut self, val: ValueId, name: &str) {
        self.arena.value(val).set_name(name);
    }

    fn ret(&mut self, val: ValueId) {
        let value = self.arena.value(val);
        self.builder.build_return(Some(&value)).expect("build ret");
    }

    fn verify_function(&mut self, func: FunctionId) -> bool {
        self.arena.function(func).verify(false)
    }

    fn delete_function(&mut self, func: FunctionId) {
        // The arena keeps a stale FunctionValue behind the tombstoned ID;
        // the core never touches a handle after deleting it.
        unsafe {
            self.arena.function(func).delete();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_codegen::{FunctionCompiler, FunctionTable};
    use rill_ir::{BinaryOp, Expr, Function, Prototype, StringInterner};

    fn add_function(interner: &StringInterner) -> Function {
        let a = interner.intern("a");
        let b = interner.intern("b");
        Function::new(
            Prototype::new(interner.intern("add"), vec![a, b]),
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::Variable(a)),
                right: Box::new(Expr::Variable(b)),
            },
        )
    }

    #[test]
    fn lowered_function_verifies() {
        let llcx = Context::create();
        let mut backend = LlvmBackend::new(&llcx, "test_add");
        let mut table = FunctionTable::new();
        let interner = StringInterner::new();

        let func = FunctionCompiler::new(&mut backend, &mut table, &interner)
            .compile_function(&add_function(&interner))
            .expect("compile add");

        assert!(backend.verify_function(func));
        assert!(backend.module().get_function("add").is_some());
    }

    #[test]
    fn extern_declaration_has_no_body() {
        let llcx = Context::create();
        let mut backend = LlvmBackend::new(&llcx, "test_extern");
        let mut table = FunctionTable::new();
        let interner = StringInterner::new();

        let proto = Prototype::new(interner.intern("sin"), vec![interner.intern("x")]);
        FunctionCompiler::new(&mut backend, &mut table, &interner)
            .compile_prototype(&proto)
            .expect("declare sin");

        let declared = backend.module().get_function("sin").expect("declared");
        assert_eq!(declared.count_basic_blocks(), 0);
        assert_eq!(declared.count_params(), 1);
    }

    #[test]
    fn deleted_function_leaves_the_module() {
        let llcx = Context::create();
        let mut backend = LlvmBackend::new(&llcx, "test_delete");
        let mut table = FunctionTable::new();
        let interner = StringInterner::new();

        FunctionCompiler::new(&mut backend, &mut table, &interner)
            .compile_function(&add_function(&interner))
            .expect("compile add");
        assert!(backend.module().get_function("add").is_some());

        // A second definition is rejected before any emission; the
        // original stays in the module.
        let err = FunctionCompiler::new(&mut backend, &mut table, &interner)
            .compile_function(&add_function(&interner));
        assert!(err.is_err());
        assert!(backend.module().get_function("add").is_some());
    }
}
