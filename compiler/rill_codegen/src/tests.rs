//! End-to-end lowering tests over the reference backend.
//!
//! Each test builds a tree the way the parser would, compiles it, and
//! observes either the executed value or the typed failure.

use pretty_assertions::assert_eq;

use rill_ir::{BinaryOp, Expr, Function, LetBinding, Prototype, StringInterner};

use crate::backend::Backend;
use crate::errors::{CodegenError, CodegenResult};
use crate::expr_lowerer::ExprLowerer;
use crate::function_compiler::FunctionCompiler;
use crate::function_table::FunctionTable;
use crate::interp::{ExecError, InterpBackend};
use crate::scope::Scope;
use crate::value_id::{BlockId, FunctionId, SlotId, ValueId};

// ---------------------------------------------------------------------------
// Tree-building helpers
// ---------------------------------------------------------------------------

fn num(value: f64) -> Expr {
    Expr::Number(value)
}

fn var(interner: &StringInterner, name: &str) -> Expr {
    Expr::Variable(interner.intern(name))
}

fn binop(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn seq(left: Expr, right: Expr) -> Expr {
    Expr::Sequence {
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn assign(interner: &StringInterner, name: &str, value: Expr) -> Expr {
    Expr::Assign {
        name: interner.intern(name),
        value: Box::new(value),
    }
}

fn call(interner: &StringInterner, callee: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: interner.intern(callee),
        args,
    }
}

fn if_expr(cond: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
    Expr::If {
        cond: Box::new(cond),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    }
}

fn for_expr(
    interner: &StringInterner,
    induction: &str,
    start: Expr,
    end: Expr,
    step: Option<Expr>,
    body: Expr,
) -> Expr {
    Expr::For {
        var: interner.intern(induction),
        start: Box::new(start),
        end: Box::new(end),
        step: step.map(Box::new),
        body: Box::new(body),
    }
}

fn let_in(interner: &StringInterner, bindings: Vec<(&str, Expr)>, body: Expr) -> Expr {
    Expr::LetIn {
        bindings: bindings
            .into_iter()
            .map(|(name, init)| LetBinding {
                name: interner.intern(name),
                init,
            })
            .collect(),
        body: Box::new(body),
    }
}

fn proto(interner: &StringInterner, name: &str, params: &[&str]) -> Prototype {
    Prototype::new(
        interner.intern(name),
        params.iter().map(|p| interner.intern(p)).collect(),
    )
}

fn def(interner: &StringInterner, name: &str, params: &[&str], body: Expr) -> Function {
    Function::new(proto(interner, name, params), body)
}

fn compile(
    backend: &mut InterpBackend,
    table: &mut FunctionTable,
    interner: &StringInterner,
    function: &Function,
) -> CodegenResult<FunctionId> {
    FunctionCompiler::new(backend, table, interner).compile_function(function)
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

#[test]
fn number_literal() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let f = def(&interner, "f", &[], num(42.0));
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(42.0));
}

#[test]
fn arithmetic_operators() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f(a, b) = a * b - a / b
    let body = binop(
        BinaryOp::Sub,
        binop(
            BinaryOp::Mul,
            var(&interner, "a"),
            var(&interner, "b"),
        ),
        binop(
            BinaryOp::Div,
            var(&interner, "a"),
            var(&interner, "b"),
        ),
    );
    let f = def(&interner, "f", &["a", "b"], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[10.0, 4.0]), Ok(37.5));
}

#[test]
fn comparison_as_number() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let lt = def(&interner, "lt", &[], binop(BinaryOp::Lt, num(1.0), num(2.0)));
    let gt = def(&interner, "gt", &[], binop(BinaryOp::Gt, num(1.0), num(2.0)));
    compile(&mut backend, &mut table, &interner, &lt).unwrap_or_else(|e| panic!("{e}"));
    compile(&mut backend, &mut table, &interner, &gt).unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(backend.run_by_name("lt", &[]), Ok(1.0));
    assert_eq!(backend.run_by_name("gt", &[]), Ok(0.0));
}

#[test]
fn sequence_discards_left_and_yields_right() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f(x) = (x = 10; x)
    let body = seq(
        assign(&interner, "x", num(10.0)),
        var(&interner, "x"),
    );
    let f = def(&interner, "f", &["x"], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[1.0]), Ok(10.0));
}

#[test]
fn parameters_are_mutable() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f(x) = (x = x + 1; x)
    let body = seq(
        assign(
            &interner,
            "x",
            binop(BinaryOp::Add, var(&interner, "x"), num(1.0)),
        ),
        var(&interner, "x"),
    );
    let f = def(&interner, "f", &["x"], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[5.0]), Ok(6.0));
}

#[test]
fn assignment_yields_the_stored_value() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f() = let x = 0 in (x = 42)
    let body = let_in(
        &interner,
        vec![("x", num(0.0))],
        assign(&interner, "x", num(42.0)),
    );
    let f = def(&interner, "f", &[], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(42.0));
}

// ---------------------------------------------------------------------------
// Scoping
// ---------------------------------------------------------------------------

#[test]
fn inner_binding_shadows_and_outer_is_restored() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f() = let x = 1 in (let x = 2 in x) + x  — inner read sees 2, the
    // read after the inner group sees 1 again.
    let body = let_in(
        &interner,
        vec![("x", num(1.0))],
        binop(
            BinaryOp::Add,
            let_in(&interner, vec![("x", num(2.0))], var(&interner, "x")),
            var(&interner, "x"),
        ),
    );
    let f = def(&interner, "f", &[], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(3.0));
}

#[test]
fn later_initializers_see_earlier_bindings() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f() = let a = 1, b = a + 1 in b
    let body = let_in(
        &interner,
        vec![
            ("a", num(1.0)),
            (
                "b",
                binop(BinaryOp::Add, var(&interner, "a"), num(1.0)),
            ),
        ],
        var(&interner, "b"),
    );
    let f = def(&interner, "f", &[], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(2.0));
}

#[test]
fn rebinding_in_one_group_shadows_after_its_initializer() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f() = let x = 1, x = x + 1 in x — the second initializer reads the
    // first binding, then shadows it.
    let body = let_in(
        &interner,
        vec![
            ("x", num(1.0)),
            (
                "x",
                binop(BinaryOp::Add, var(&interner, "x"), num(1.0)),
            ),
        ],
        var(&interner, "x"),
    );
    let f = def(&interner, "f", &[], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(2.0));
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

#[test]
fn if_selects_the_taken_branch() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f(c) = if c then 10 else 20 — any non-zero condition is true.
    let body = if_expr(var(&interner, "c"), num(10.0), num(20.0));
    let f = def(&interner, "f", &["c"], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(backend.run_by_name("f", &[1.0]), Ok(10.0));
    assert_eq!(backend.run_by_name("f", &[7.0]), Ok(10.0));
    assert_eq!(backend.run_by_name("f", &[0.0]), Ok(20.0));
}

#[test]
fn nested_if_merges_through_the_real_exit_block() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f(c) = if c then (if c > 1 then 1 else 2) else 3 — the outer merge
    // must receive the inner merge block as the then-side predecessor.
    let inner = if_expr(
        binop(BinaryOp::Gt, var(&interner, "c"), num(1.0)),
        num(1.0),
        num(2.0),
    );
    let body = if_expr(var(&interner, "c"), inner, num(3.0));
    let f = def(&interner, "f", &["c"], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(backend.run_by_name("f", &[2.0]), Ok(1.0));
    assert_eq!(backend.run_by_name("f", &[1.0]), Ok(2.0));
    assert_eq!(backend.run_by_name("f", &[0.0]), Ok(3.0));
}

#[test]
fn for_loop_accumulates_and_yields_zero() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f(n) = let acc = 0 in ((for i = 0, n in acc = acc + i); acc)
    let loop_expr = for_expr(
        &interner,
        "i",
        num(0.0),
        var(&interner, "n"),
        None,
        assign(
            &interner,
            "acc",
            binop(BinaryOp::Add, var(&interner, "acc"), var(&interner, "i")),
        ),
    );
    let body = let_in(
        &interner,
        vec![("acc", num(0.0))],
        seq(loop_expr, var(&interner, "acc")),
    );
    let f = def(&interner, "f", &["n"], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[5.0]), Ok(10.0));

    // g() = for i = 0, 3 in 1 — the loop construct itself is 0.0.
    let g = def(
        &interner,
        "g",
        &[],
        for_expr(&interner, "i", num(0.0), num(3.0), None, num(1.0)),
    );
    compile(&mut backend, &mut table, &interner, &g).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("g", &[]), Ok(0.0));
}

#[test]
fn for_loop_honors_the_step() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f() = let acc = 0 in ((for i = 0, 10, 2 in acc = acc + 1); acc)
    let loop_expr = for_expr(
        &interner,
        "i",
        num(0.0),
        num(10.0),
        Some(num(2.0)),
        assign(
            &interner,
            "acc",
            binop(BinaryOp::Add, var(&interner, "acc"), num(1.0)),
        ),
    );
    let body = let_in(
        &interner,
        vec![("acc", num(0.0))],
        seq(loop_expr, var(&interner, "acc")),
    );
    let f = def(&interner, "f", &[], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(5.0));
}

#[test]
fn loop_variable_is_a_fresh_binding() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f() = let x = 5 in ((for x = 0, 3 in x); x) — the loop's x shadows
    // the outer x and leaves it untouched.
    let body = let_in(
        &interner,
        vec![("x", num(5.0))],
        seq(
            for_expr(
                &interner,
                "x",
                num(0.0),
                num(3.0),
                None,
                var(&interner, "x"),
            ),
            var(&interner, "x"),
        ),
    );
    let f = def(&interner, "f", &[], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(5.0));
}

#[test]
fn loop_bound_is_reevaluated_every_iteration() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // f() = let n = 3, acc = 0 in
    //         ((for i = 0, n in (n = n - 1; acc = acc + 1)); acc)
    // The body shrinks the bound, so only two iterations run; a cached
    // bound would give three.
    let loop_body = seq(
        assign(
            &interner,
            "n",
            binop(BinaryOp::Sub, var(&interner, "n"), num(1.0)),
        ),
        assign(
            &interner,
            "acc",
            binop(BinaryOp::Add, var(&interner, "acc"), num(1.0)),
        ),
    );
    let body = let_in(
        &interner,
        vec![("n", num(3.0)), ("acc", num(0.0))],
        seq(
            for_expr(
                &interner,
                "i",
                num(0.0),
                var(&interner, "n"),
                None,
                loop_body,
            ),
            var(&interner, "acc"),
        ),
    );
    let f = def(&interner, "f", &[], body);
    compile(&mut backend, &mut table, &interner, &f).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("f", &[]), Ok(2.0));
}

// ---------------------------------------------------------------------------
// Functions, prototypes, calls
// ---------------------------------------------------------------------------

#[test]
fn extern_then_matching_definition_succeeds() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let foo_proto = proto(&interner, "foo", &["a", "b"]);
    FunctionCompiler::new(&mut backend, &mut table, &interner)
        .compile_prototype(&foo_proto)
        .unwrap_or_else(|e| panic!("{e}"));

    let foo = def(
        &interner,
        "foo",
        &["a", "b"],
        binop(BinaryOp::Add, var(&interner, "a"), var(&interner, "b")),
    );
    compile(&mut backend, &mut table, &interner, &foo).unwrap_or_else(|e| panic!("{e}"));
    assert!(table.is_defined(interner.intern("foo")));
    assert_eq!(backend.run_by_name("foo", &[2.0, 3.0]), Ok(5.0));
}

#[test]
fn second_definition_is_a_redefinition() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let first = def(&interner, "foo", &["a"], var(&interner, "a"));
    compile(&mut backend, &mut table, &interner, &first).unwrap_or_else(|e| panic!("{e}"));

    let second = def(&interner, "foo", &["a"], num(0.0));
    assert_eq!(
        compile(&mut backend, &mut table, &interner, &second),
        Err(CodegenError::Redefinition {
            name: "foo".to_owned()
        })
    );

    // The original body is untouched.
    assert!(table.is_defined(interner.intern("foo")));
    assert_eq!(backend.run_by_name("foo", &[9.0]), Ok(9.0));
}

#[test]
fn arity_disagreement_is_a_signature_conflict() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let foo_proto = proto(&interner, "foo", &["a", "b"]);
    FunctionCompiler::new(&mut backend, &mut table, &interner)
        .compile_prototype(&foo_proto)
        .unwrap_or_else(|e| panic!("{e}"));

    let wrong = def(&interner, "foo", &["a"], var(&interner, "a"));
    assert_eq!(
        compile(&mut backend, &mut table, &interner, &wrong),
        Err(CodegenError::SignatureConflict {
            name: "foo".to_owned()
        })
    );

    // The extern declaration survives.
    assert!(table.get(interner.intern("foo")).is_some());
}

#[test]
fn call_with_wrong_arity_emits_no_call() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let callee = def(
        &interner,
        "g",
        &["a", "b"],
        binop(BinaryOp::Add, var(&interner, "a"), var(&interner, "b")),
    );
    compile(&mut backend, &mut table, &interner, &callee).unwrap_or_else(|e| panic!("{e}"));

    let caller = def(&interner, "f", &[], call(&interner, "g", vec![num(1.0)]));
    assert_eq!(
        compile(&mut backend, &mut table, &interner, &caller),
        Err(CodegenError::ArityMismatch {
            name: "g".to_owned(),
            expected: 2,
            got: 1,
        })
    );

    // The staged caller was discarded entirely: not in the table, and
    // its backend recording is a tombstone.
    assert!(table.get(interner.intern("f")).is_none());
    assert_eq!(
        backend.run_by_name("f", &[]),
        Err(ExecError::UnknownFunction {
            name: "f".to_owned()
        })
    );
}

#[test]
fn unknown_function_and_identifier_errors() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let f = def(&interner, "f", &[], call(&interner, "missing", vec![]));
    assert_eq!(
        compile(&mut backend, &mut table, &interner, &f),
        Err(CodegenError::UnknownFunction {
            name: "missing".to_owned()
        })
    );

    let g = def(&interner, "g", &[], var(&interner, "y"));
    assert_eq!(
        compile(&mut backend, &mut table, &interner, &g),
        Err(CodegenError::UnknownIdentifier {
            name: "y".to_owned()
        })
    );
}

#[test]
fn assignment_to_undeclared_name_fails() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let f = def(&interner, "f", &[], assign(&interner, "z", num(1.0)));
    assert_eq!(
        compile(&mut backend, &mut table, &interner, &f),
        Err(CodegenError::UnboundAssignment {
            name: "z".to_owned()
        })
    );
}

#[test]
fn recursion_through_the_table() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    // fib(n) = if n < 2 then n else fib(n - 1) + fib(n - 2)
    let body = if_expr(
        binop(BinaryOp::Lt, var(&interner, "n"), num(2.0)),
        var(&interner, "n"),
        binop(
            BinaryOp::Add,
            call(
                &interner,
                "fib",
                vec![binop(BinaryOp::Sub, var(&interner, "n"), num(1.0))],
            ),
            call(
                &interner,
                "fib",
                vec![binop(BinaryOp::Sub, var(&interner, "n"), num(2.0))],
            ),
        ),
    );
    let fib = def(&interner, "fib", &["n"], body);
    compile(&mut backend, &mut table, &interner, &fib).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("fib", &[10.0]), Ok(55.0));
}

#[test]
fn table_persists_across_top_level_compilations() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let mut table = FunctionTable::new();

    let double = def(
        &interner,
        "double",
        &["x"],
        binop(BinaryOp::Mul, var(&interner, "x"), num(2.0)),
    );
    compile(&mut backend, &mut table, &interner, &double).unwrap_or_else(|e| panic!("{e}"));

    // A later top-level compilation resolves `double` from the same table.
    let quad = def(
        &interner,
        "quad",
        &["x"],
        call(
            &interner,
            "double",
            vec![call(&interner, "double", vec![var(&interner, "x")])],
        ),
    );
    compile(&mut backend, &mut table, &interner, &quad).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(backend.run_by_name("quad", &[3.0]), Ok(12.0));
}

// ---------------------------------------------------------------------------
// Cleanup and determinism
// ---------------------------------------------------------------------------

#[test]
fn failed_let_in_still_pops_its_frame() {
    let interner = StringInterner::new();
    let mut backend = InterpBackend::new();
    let table = FunctionTable::new();

    let func = backend.declare_function("f", 0);
    let entry = backend.append_block(func, "entry");
    backend.position_at_end(entry);

    let mut lowerer = ExprLowerer::new(&mut backend, &table, &interner, Scope::new(), func);
    // let y = <unknown identifier> in 1.0 — the initializer fails after
    // the frame is pushed.
    let expr = let_in(
        &interner,
        vec![("y", var(&interner, "nope"))],
        num(1.0),
    );
    let result = lowerer.lower(&expr);

    assert_eq!(
        result,
        Err(CodegenError::UnknownIdentifier {
            name: "nope".to_owned()
        })
    );
    assert_eq!(lowerer.scope.depth(), 0);
    assert_eq!(lowerer.scope.lookup(interner.intern("y")), None);
}

#[test]
fn lowering_is_deterministic() {
    let interner = StringInterner::new();

    let build = || {
        def(
            &interner,
            "f",
            &["n"],
            let_in(
                &interner,
                vec![("acc", num(0.0))],
                seq(
                    for_expr(
                        &interner,
                        "i",
                        num(0.0),
                        var(&interner, "n"),
                        None,
                        assign(
                            &interner,
                            "acc",
                            binop(
                                BinaryOp::Add,
                                var(&interner, "acc"),
                                if_expr(
                                    binop(BinaryOp::Gt, var(&interner, "i"), num(2.0)),
                                    var(&interner, "i"),
                                    num(0.0),
                                ),
                            ),
                        ),
                    ),
                    var(&interner, "acc"),
                ),
            ),
        )
    };

    let mut backend_a = InterpBackend::new();
    let mut table_a = FunctionTable::new();
    compile(&mut backend_a, &mut table_a, &interner, &build()).unwrap_or_else(|e| panic!("{e}"));

    let mut backend_b = InterpBackend::new();
    let mut table_b = FunctionTable::new();
    compile(&mut backend_b, &mut table_b, &interner, &build()).unwrap_or_else(|e| panic!("{e}"));

    // Identical tree + identical initial table state ⇒ identical
    // sequence of backend calls, hence identical recordings.
    assert_eq!(backend_a.functions, backend_b.functions);
    assert_eq!(backend_a.blocks, backend_b.blocks);
}

// ---------------------------------------------------------------------------
// Verification failure
// ---------------------------------------------------------------------------

/// Delegating backend whose `verify_function` always refuses, to exercise
/// the removal path without constructing genuinely malformed IR.
struct VerifyNever {
    inner: InterpBackend,
}

impl Backend for VerifyNever {
    fn const_f64(&mut self, value: f64) -> ValueId {
        self.inner.const_f64(value)
    }
    fn fadd(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.inner.fadd(lhs, rhs, name)
    }
    fn fsub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.inner.fsub(lhs, rhs, name)
    }
    fn fmul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.inner.fmul(lhs, rhs, name)
    }
    fn fdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.inner.fdiv(lhs, rhs, name)
    }
    fn fcmp_ult(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.inner.fcmp_ult(lhs, rhs, name)
    }
    fn fcmp_ugt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.inner.fcmp_ugt(lhs, rhs, name)
    }
    fn fcmp_one(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.inner.fcmp_one(lhs, rhs, name)
    }
    fn ui_to_fp(&mut self, val: ValueId, name: &str) -> ValueId {
        self.inner.ui_to_fp(val, name)
    }
    fn entry_alloca(&mut self, func: FunctionId, name: &str) -> SlotId {
        self.inner.entry_alloca(func, name)
    }
    fn load(&mut self, slot: SlotId, name: &str) -> ValueId {
        self.inner.load(slot, name)
    }
    fn store(&mut self, val: ValueId, slot: SlotId) {
        self.inner.store(val, slot);
    }
    fn append_block(&mut self, func: FunctionId, name: &str) -> BlockId {
        self.inner.append_block(func, name)
    }
    fn position_at_end(&mut self, block: BlockId) {
        self.inner.position_at_end(block);
    }
    fn current_block(&self) -> BlockId {
        self.inner.current_block()
    }
    fn br(&mut self, dest: BlockId) {
        self.inner.br(dest);
    }
    fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId) {
        self.inner.cond_br(cond, then_bb, else_bb);
    }
    fn phi_f64(&mut self, incoming: &[(ValueId, BlockId)], name: &str) -> ValueId {
        self.inner.phi_f64(incoming, name)
    }
    fn call(&mut self, callee: FunctionId, args: &[ValueId], name: &str) -> ValueId {
        self.inner.call(callee, args, name)
    }
    fn declare_function(&mut self, name: &str, arity: usize) -> FunctionId {
        self.inner.declare_function(name, arity)
    }
    fn param(&mut self, func: FunctionId, index: usize) -> ValueId {
        self.inner.param(func, index)
    }
    fn set_value_name(&mut self, val: ValueId, name: &str) {
        self.inner.set_value_name(val, name);
    }
    fn ret(&mut self, val: ValueId) {
        self.inner.ret(val);
    }
    fn verify_function(&mut self, _func: FunctionId) -> bool {
        false
    }
    fn delete_function(&mut self, func: FunctionId) {
        self.inner.delete_function(func);
    }
}

#[test]
fn verification_failure_removes_the_staged_function() {
    let interner = StringInterner::new();
    let mut backend = VerifyNever {
        inner: InterpBackend::new(),
    };
    let mut table = FunctionTable::new();

    let f = def(&interner, "f", &[], num(1.0));
    let result = FunctionCompiler::new(&mut backend, &mut table, &interner).compile_function(&f);

    assert_eq!(
        result,
        Err(CodegenError::VerificationFailed {
            name: "f".to_owned()
        })
    );
    // Not half-registered: gone from the table and tombstoned in the
    // backend.
    assert!(table.get(interner.intern("f")).is_none());
    assert_eq!(
        backend.inner.run_by_name("f", &[]),
        Err(ExecError::UnknownFunction {
            name: "f".to_owned()
        })
    );
}
