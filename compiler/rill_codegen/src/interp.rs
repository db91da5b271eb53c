//! Reference record-and-execute backend.
//!
//! `InterpBackend` implements [`Backend`] by recording instructions into
//! per-function block lists behind the same opaque IDs the LLVM backend
//! uses, then executing the recorded IR with a small block-walking
//! evaluator. It backs the driver's interpreter path and this crate's
//! test suite, where it makes lowering observable: the recorded IR
//! derives `PartialEq`, so two lowerings of the same tree can be compared
//! structurally, and [`run_by_name`](InterpBackend::run_by_name) makes
//! the produced value observable without an LLVM installation.

use rustc_hash::FxHashMap;
use tracing::error;

use crate::backend::Backend;
use crate::value_id::{BlockId, FunctionId, SlotId, ValueId};

/// Call depth cap for the evaluator; recursion beyond this traps.
const MAX_CALL_DEPTH: usize = 1000;

// ---------------------------------------------------------------------------
// Recorded IR
// ---------------------------------------------------------------------------

/// Arithmetic instruction kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BinKind {
    Add,
    Sub,
    Mul,
    Div,
}

/// Comparison predicates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CmpKind {
    /// Unordered less-than.
    Ult,
    /// Unordered greater-than.
    Ugt,
    /// Ordered not-equal.
    One,
}

/// One recorded instruction.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Instr {
    Const {
        dest: ValueId,
        value: f64,
    },
    Bin {
        dest: ValueId,
        kind: BinKind,
        lhs: ValueId,
        rhs: ValueId,
    },
    Cmp {
        dest: ValueId,
        kind: CmpKind,
        lhs: ValueId,
        rhs: ValueId,
    },
    /// Widen an i1 comparison result to f64.
    UiToFp {
        dest: ValueId,
        src: ValueId,
    },
    Load {
        dest: ValueId,
        slot: SlotId,
    },
    Store {
        src: ValueId,
        slot: SlotId,
    },
    Call {
        dest: ValueId,
        callee: FunctionId,
        args: Vec<ValueId>,
    },
    /// Control-dependent merge: picks the incoming value whose block was
    /// the actual predecessor.
    Phi {
        dest: ValueId,
        incoming: Vec<(ValueId, BlockId)>,
    },
}

/// Block terminator.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Terminator {
    Br(BlockId),
    CondBr {
        cond: ValueId,
        then_bb: BlockId,
        else_bb: BlockId,
    },
    Ret(ValueId),
}

/// One basic block: instructions plus at most one terminator.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Block {
    pub(crate) instrs: Vec<Instr>,
    pub(crate) term: Option<Terminator>,
}

/// One recorded function.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FunctionData {
    pub(crate) name: String,
    pub(crate) arity: usize,
    /// Parameter value handles, minted at declaration time.
    pub(crate) params: Vec<ValueId>,
    /// Blocks in append order; the first is the entry.
    pub(crate) blocks: Vec<BlockId>,
    /// Tombstone left by `delete_function`.
    pub(crate) deleted: bool,
}

// ---------------------------------------------------------------------------
// Execution errors
// ---------------------------------------------------------------------------

/// Failure while executing recorded IR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecError {
    /// No live function with that name.
    UnknownFunction { name: String },
    /// The function is a body-less declaration; the interpreter has no
    /// symbol resolution to fall back on.
    CalledExtern { name: String },
    /// Argument count does not match the function's arity.
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },
    /// Call depth exceeded [`MAX_CALL_DEPTH`].
    DepthExceeded,
    /// The recorded IR is structurally unsound (should have been caught
    /// by verification).
    Malformed { detail: String },
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFunction { name } => write!(f, "unknown function: {name}"),
            Self::CalledExtern { name } => {
                write!(f, "call to extern function with no body: {name}")
            }
            Self::WrongArity {
                name,
                expected,
                got,
            } => write!(f, "function {name} takes {expected} argument(s), got {got}"),
            Self::DepthExceeded => write!(f, "call depth exceeded {MAX_CALL_DEPTH}"),
            Self::Malformed { detail } => write!(f, "malformed IR: {detail}"),
        }
    }
}

impl std::error::Error for ExecError {}

// ---------------------------------------------------------------------------
// InterpBackend
// ---------------------------------------------------------------------------

/// Recording backend with a block-walking evaluator.
#[derive(Debug, Default)]
pub struct InterpBackend {
    pub(crate) functions: Vec<FunctionData>,
    pub(crate) blocks: Vec<Block>,
    next_value: u32,
    next_slot: u32,
    current_block: Option<BlockId>,
}

impl InterpBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_value(&mut self) -> ValueId {
        let id = ValueId::from_raw(self.next_value);
        self.next_value += 1;
        id
    }

    /// Record an instruction into the current block.
    fn emit(&mut self, instr: Instr) {
        let Some(block) = self.current_block else {
            error!(?instr, "instruction emitted with no insertion point");
            return;
        };
        let block = &mut self.blocks[block.raw() as usize];
        if block.term.is_some() {
            error!(?instr, "instruction emitted after block terminator");
            return;
        }
        block.instrs.push(instr);
    }

    /// Record a terminator for the current block.
    fn terminate(&mut self, term: Terminator) {
        let Some(block) = self.current_block else {
            error!(?term, "terminator emitted with no insertion point");
            return;
        };
        let block = &mut self.blocks[block.raw() as usize];
        if block.term.is_some() {
            error!(?term, "block terminated twice");
            return;
        }
        block.term = Some(term);
    }

    fn function(&self, func: FunctionId) -> &FunctionData {
        &self.functions[func.raw() as usize]
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Execute a recorded function by name.
    ///
    /// Resolution skips deleted tombstones and, for a name declared anew
    /// after deletion, picks the most recent live recording.
    pub fn run_by_name(&self, name: &str, args: &[f64]) -> Result<f64, ExecError> {
        let (idx, data) = self
            .functions
            .iter()
            .enumerate()
            .rev()
            .find(|(_, data)| !data.deleted && data.name == name)
            .ok_or_else(|| ExecError::UnknownFunction {
                name: name.to_owned(),
            })?;
        if data.arity != args.len() {
            return Err(ExecError::WrongArity {
                name: name.to_owned(),
                expected: data.arity,
                got: args.len(),
            });
        }
        let idx = u32::try_from(idx).map_err(|_| ExecError::Malformed {
            detail: "function index overflow".to_owned(),
        })?;
        self.exec(FunctionId::from_raw(idx), args, 0)
    }

    fn exec(&self, func: FunctionId, args: &[f64], depth: usize) -> Result<f64, ExecError> {
        if depth > MAX_CALL_DEPTH {
            return Err(ExecError::DepthExceeded);
        }
        let data = self.function(func);
        if data.deleted {
            return Err(ExecError::UnknownFunction {
                name: data.name.clone(),
            });
        }
        let Some(&entry) = data.blocks.first() else {
            return Err(ExecError::CalledExtern {
                name: data.name.clone(),
            });
        };

        // Per-invocation state: values and slots are private to one call
        // frame, so recursion cannot alias storage.
        let mut values: FxHashMap<ValueId, f64> = FxHashMap::default();
        let mut slots: FxHashMap<SlotId, f64> = FxHashMap::default();
        for (&param, &arg) in data.params.iter().zip(args.iter()) {
            values.insert(param, arg);
        }

        let mut current = entry;
        let mut predecessor: Option<BlockId> = None;
        loop {
            let block = &self.blocks[current.raw() as usize];
            for instr in &block.instrs {
                self.step(instr, &mut values, &mut slots, predecessor, depth)?;
            }
            match &block.term {
                None => {
                    return Err(ExecError::Malformed {
                        detail: format!("unterminated block in {}", data.name),
                    })
                }
                Some(Terminator::Ret(val)) => return value_of(&values, *val),
                Some(Terminator::Br(dest)) => {
                    predecessor = Some(current);
                    current = *dest;
                }
                Some(Terminator::CondBr {
                    cond,
                    then_bb,
                    else_bb,
                }) => {
                    let taken = value_of(&values, *cond)? != 0.0;
                    predecessor = Some(current);
                    current = if taken { *then_bb } else { *else_bb };
                }
            }
        }
    }

    fn step(
        &self,
        instr: &Instr,
        values: &mut FxHashMap<ValueId, f64>,
        slots: &mut FxHashMap<SlotId, f64>,
        predecessor: Option<BlockId>,
        depth: usize,
    ) -> Result<(), ExecError> {
        match instr {
            Instr::Const { dest, value } => {
                values.insert(*dest, *value);
            }
            Instr::Bin {
                dest,
                kind,
                lhs,
                rhs,
            } => {
                let lhs = value_of(values, *lhs)?;
                let rhs = value_of(values, *rhs)?;
                let result = match kind {
                    BinKind::Add => lhs + rhs,
                    BinKind::Sub => lhs - rhs,
                    BinKind::Mul => lhs * rhs,
                    BinKind::Div => lhs / rhs,
                };
                values.insert(*dest, result);
            }
            Instr::Cmp {
                dest,
                kind,
                lhs,
                rhs,
            } => {
                let lhs = value_of(values, *lhs)?;
                let rhs = value_of(values, *rhs)?;
                let result = match kind {
                    CmpKind::Ult => lhs < rhs,
                    CmpKind::Ugt => lhs > rhs,
                    CmpKind::One => lhs != rhs,
                };
                values.insert(*dest, f64::from(result));
            }
            Instr::UiToFp { dest, src } => {
                let src = value_of(values, *src)?;
                values.insert(*dest, src);
            }
            Instr::Load { dest, slot } => {
                let Some(&value) = slots.get(slot) else {
                    return Err(ExecError::Malformed {
                        detail: "load from uninitialized slot".to_owned(),
                    });
                };
                values.insert(*dest, value);
            }
            Instr::Store { src, slot } => {
                let value = value_of(values, *src)?;
                slots.insert(*slot, value);
            }
            Instr::Call { dest, callee, args } => {
                let mut arg_vals = Vec::with_capacity(args.len());
                for arg in args {
                    arg_vals.push(value_of(values, *arg)?);
                }
                let result = self.exec(*callee, &arg_vals, depth + 1)?;
                values.insert(*dest, result);
            }
            Instr::Phi { dest, incoming } => {
                let Some(pred) = predecessor else {
                    return Err(ExecError::Malformed {
                        detail: "phi in entry block".to_owned(),
                    });
                };
                let Some(&(val, _)) = incoming.iter().find(|(_, block)| *block == pred) else {
                    return Err(ExecError::Malformed {
                        detail: "phi has no incoming value for predecessor".to_owned(),
                    });
                };
                let value = value_of(values, val)?;
                values.insert(*dest, value);
            }
        }
        Ok(())
    }
}

fn value_of(values: &FxHashMap<ValueId, f64>, id: ValueId) -> Result<f64, ExecError> {
    values.get(&id).copied().ok_or_else(|| ExecError::Malformed {
        detail: "use of undefined value".to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Backend impl
// ---------------------------------------------------------------------------

impl Backend for InterpBackend {
    fn const_f64(&mut self, value: f64) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Const { dest, value });
        dest
    }

    fn fadd(&mut self, lhs: ValueId, rhs: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Bin {
            dest,
            kind: BinKind::Add,
            lhs,
            rhs,
        });
        dest
    }

    fn fsub(&mut self, lhs: ValueId, rhs: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Bin {
            dest,
            kind: BinKind::Sub,
            lhs,
            rhs,
        });
        dest
    }

    fn fmul(&mut self, lhs: ValueId, rhs: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Bin {
            dest,
            kind: BinKind::Mul,
            lhs,
            rhs,
        });
        dest
    }

    fn fdiv(&mut self, lhs: ValueId, rhs: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Bin {
            dest,
            kind: BinKind::Div,
            lhs,
            rhs,
        });
        dest
    }

    fn fcmp_ult(&mut self, lhs: ValueId, rhs: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Cmp {
            dest,
            kind: CmpKind::Ult,
            lhs,
            rhs,
        });
        dest
    }

    fn fcmp_ugt(&mut self, lhs: ValueId, rhs: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Cmp {
            dest,
            kind: CmpKind::Ugt,
            lhs,
            rhs,
        });
        dest
    }

    fn fcmp_one(&mut self, lhs: ValueId, rhs: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Cmp {
            dest,
            kind: CmpKind::One,
            lhs,
            rhs,
        });
        dest
    }

    fn ui_to_fp(&mut self, val: ValueId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::UiToFp { dest, src: val });
        dest
    }

    fn entry_alloca(&mut self, _func: FunctionId, _name: &str) -> SlotId {
        let slot = SlotId::from_raw(self.next_slot);
        self.next_slot += 1;
        slot
    }

    fn load(&mut self, slot: SlotId, _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Load { dest, slot });
        dest
    }

    fn store(&mut self, val: ValueId, slot: SlotId) {
        self.emit(Instr::Store { src: val, slot });
    }

    fn append_block(&mut self, func: FunctionId, _name: &str) -> BlockId {
        let id = BlockId::from_raw(u32::try_from(self.blocks.len()).unwrap_or(u32::MAX));
        self.blocks.push(Block::default());
        self.functions[func.raw() as usize].blocks.push(id);
        id
    }

    fn position_at_end(&mut self, block: BlockId) {
        self.current_block = Some(block);
    }

    fn current_block(&self) -> BlockId {
        self.current_block.unwrap_or(BlockId::NONE)
    }

    fn br(&mut self, dest: BlockId) {
        self.terminate(Terminator::Br(dest));
    }

    fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId) {
        self.terminate(Terminator::CondBr {
            cond,
            then_bb,
            else_bb,
        });
    }

    fn phi_f64(&mut self, incoming: &[(ValueId, BlockId)], _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Phi {
            dest,
            incoming: incoming.to_vec(),
        });
        dest
    }

    fn call(&mut self, callee: FunctionId, args: &[ValueId], _name: &str) -> ValueId {
        let dest = self.mint_value();
        self.emit(Instr::Call {
            dest,
            callee,
            args: args.to_vec(),
        });
        dest
    }

    fn declare_function(&mut self, name: &str, arity: usize) -> FunctionId {
        let id = FunctionId::from_raw(u32::try_from(self.functions.len()).unwrap_or(u32::MAX));
        let params = (0..arity).map(|_| self.mint_value()).collect();
        self.functions.push(FunctionData {
            name: name.to_owned(),
            arity,
            params,
            blocks: Vec::new(),
            deleted: false,
        });
        id
    }

    fn param(&mut self, func: FunctionId, index: usize) -> ValueId {
        let data = self.function(func);
        data.params.get(index).copied().unwrap_or_else(|| {
            error!(func = func.raw(), index, "parameter index out of range");
            ValueId::NONE
        })
    }

    fn set_value_name(&mut self, _val: ValueId, _name: &str) {
        // Names are display hints; the interpreter has no textual IR.
    }

    fn ret(&mut self, val: ValueId) {
        self.terminate(Terminator::Ret(val));
    }

    fn verify_function(&mut self, func: FunctionId) -> bool {
        let data = self.function(func);
        if data.deleted || data.blocks.is_empty() {
            return false;
        }
        data.blocks
            .iter()
            .all(|block| self.blocks[block.raw() as usize].term.is_some())
    }

    fn delete_function(&mut self, func: FunctionId) {
        self.functions[func.raw() as usize].deleted = true;
    }
}
