//! Minimal NeoVM execution substrate.
//!
//! The interop layer consumes a narrow VM contract: a typed evaluation stack,
//! an invocation stack of frames carrying script hashes and effective call
//! flags, gas accounting, and a way to mount a callee script. This module
//! implements exactly that contract together with the small opcode set needed
//! by contract dispatchers and verification-script templates.
//!
//! Syscalls are not resolved here: [`Vm::step`] surfaces them as
//! [`StepEvent::Syscall`] and the host (the interop dispatcher) performs the
//! call. The engine itself only moves between the states
//! *Loaded → Running → (Halted | Faulted)*.

pub mod call_flags;
pub mod error;
pub mod opcode;
pub mod script_builder;
pub mod serializer;
pub mod stack_item;
pub mod standard;

use std::rc::Rc;

pub use call_flags::CallFlags;
pub use error::{VmError, VmResult};
pub use opcode::OpCode;
pub use script_builder::ScriptBuilder;
pub use stack_item::StackItem;

use crate::crypto::hash160;
use crate::hash::UInt160;
use crate::limits::MAX_CONTRACT_SCRIPT_SIZE;
use crate::vm::opcode::{const_push_value, direct_push_len};

/// The lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    Loaded,
    Running,
    Halted,
    Faulted,
}

/// Outcome of a single instruction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// An instruction executed; more remain.
    Continue,
    /// A SYSCALL instruction was reached; the host must dispatch `id`.
    Syscall(u32),
    /// The invocation stack is empty.
    Halted,
}

/// The typed evaluation stack shared by all frames of an invocation.
#[derive(Debug, Default)]
pub struct EvaluationStack {
    items: Vec<StackItem>,
}

impl EvaluationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: StackItem) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> VmResult<StackItem> {
        self.items.pop().ok_or(VmError::StackUnderflow)
    }

    /// Item `index` positions below the top without removing it.
    pub fn peek(&self, index: usize) -> VmResult<&StackItem> {
        let len = self.items.len();
        if index >= len {
            return Err(VmError::StackUnderflow);
        }
        Ok(&self.items[len - 1 - index])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One entry of the invocation stack.
#[derive(Debug, Clone)]
pub struct Frame {
    script: Rc<Vec<u8>>,
    pc: usize,
    script_hash: UInt160,
    call_flags: CallFlags,
}

impl Frame {
    pub fn script_hash(&self) -> UInt160 {
        self.script_hash
    }

    pub fn call_flags(&self) -> CallFlags {
        self.call_flags
    }
}

/// The execution engine.
pub struct Vm {
    estack: EvaluationStack,
    istack: Vec<Frame>,
    state: VmState,
    /// Negative means unmetered (test invocations).
    gas_limit: i64,
    gas_consumed: i64,
    fault_message: Option<String>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Self {
            estack: EvaluationStack::new(),
            istack: Vec::new(),
            state: VmState::Loaded,
            gas_limit: -1,
            gas_consumed: 0,
            fault_message: None,
        }
    }

    pub fn state(&self) -> VmState {
        self.state
    }

    pub fn fault_message(&self) -> Option<&str> {
        self.fault_message.as_deref()
    }

    pub fn set_fault<S: Into<String>>(&mut self, message: S) {
        self.state = VmState::Faulted;
        self.fault_message = Some(message.into());
    }

    pub fn estack(&mut self) -> &mut EvaluationStack {
        &mut self.estack
    }

    pub fn evaluation_stack(&self) -> &EvaluationStack {
        &self.estack
    }

    pub fn set_gas_limit(&mut self, limit: i64) {
        self.gas_limit = limit;
    }

    pub fn gas_limit(&self) -> i64 {
        self.gas_limit
    }

    pub fn gas_consumed(&self) -> i64 {
        self.gas_consumed
    }

    /// Remaining budget, reported verbatim: unmetered engines go negative.
    pub fn gas_left(&self) -> i64 {
        self.gas_limit - self.gas_consumed
    }

    /// Charges `gas` against the budget. Returns false once the budget is
    /// exhausted; the caller must not apply the metered effect in that case.
    pub fn add_gas(&mut self, gas: i64) -> bool {
        self.gas_consumed += gas;
        self.gas_limit < 0 || self.gas_consumed <= self.gas_limit
    }

    /// Mounts a script whose hash is derived from its bytes.
    pub fn load_script(&mut self, script: Vec<u8>) -> VmResult<()> {
        self.load_script_with_flags(script, CallFlags::ALL)
    }

    pub fn load_script_with_flags(&mut self, script: Vec<u8>, flags: CallFlags) -> VmResult<()> {
        let hash = hash160(&script);
        self.load_script_with_hash(script, hash, flags)
    }

    /// Mounts a script under an explicit hash with the given effective flags.
    pub fn load_script_with_hash(
        &mut self,
        script: Vec<u8>,
        hash: UInt160,
        flags: CallFlags,
    ) -> VmResult<()> {
        if script.len() > MAX_CONTRACT_SCRIPT_SIZE {
            return Err(VmError::ScriptTooLarge {
                size: script.len(),
                max: MAX_CONTRACT_SCRIPT_SIZE,
            });
        }
        self.istack.push(Frame {
            script: Rc::new(script),
            pc: 0,
            script_hash: hash,
            call_flags: flags,
        });
        if self.state != VmState::Running {
            self.state = VmState::Loaded;
        }
        Ok(())
    }

    pub fn istack_len(&self) -> usize {
        self.istack.len()
    }

    pub fn current_context(&self) -> Option<&Frame> {
        self.istack.last()
    }

    /// Hash of the currently executing frame.
    pub fn current_script_hash(&self) -> Option<UInt160> {
        self.istack.last().map(|f| f.script_hash)
    }

    /// Hash of the frame `pos` positions below the current one. Position 0 is
    /// the executing frame, 1 the calling frame, `istack_len() - 1` the entry
    /// frame.
    pub fn context_script_hash(&self, pos: usize) -> VmResult<UInt160> {
        let idx = self
            .istack
            .len()
            .checked_sub(1 + pos)
            .ok_or(VmError::BadFrame(pos))?;
        Ok(self.istack[idx].script_hash)
    }

    /// Effective call flags of the current frame; a bare engine has all.
    pub fn current_call_flags(&self) -> CallFlags {
        self.istack
            .last()
            .map(|f| f.call_flags)
            .unwrap_or(CallFlags::ALL)
    }

    /// Executes one instruction.
    pub fn step(&mut self) -> VmResult<StepEvent> {
        match self.step_inner() {
            Ok(event) => Ok(event),
            Err(err) => {
                self.set_fault(err.to_string());
                Err(err)
            }
        }
    }

    /// Runs until halt, dispatching syscalls through `on_syscall`.
    pub fn run<F>(&mut self, mut on_syscall: F) -> VmResult<()>
    where
        F: FnMut(&mut Vm, u32) -> VmResult<()>,
    {
        loop {
            match self.step()? {
                StepEvent::Halted => return Ok(()),
                StepEvent::Continue => {}
                StepEvent::Syscall(id) => {
                    if let Err(err) = on_syscall(self, id) {
                        self.set_fault(err.to_string());
                        return Err(err);
                    }
                }
            }
        }
    }

    fn step_inner(&mut self) -> VmResult<StepEvent> {
        let Some(frame_idx) = self.istack.len().checked_sub(1) else {
            self.state = VmState::Halted;
            return Ok(StepEvent::Halted);
        };
        self.state = VmState::Running;

        let script = Rc::clone(&self.istack[frame_idx].script);
        let mut pc = self.istack[frame_idx].pc;
        if pc >= script.len() {
            return Ok(self.unload_frame());
        }

        let opcode = script[pc];
        pc += 1;

        if let Some(len) = direct_push_len(opcode) {
            let data = read_operand(&script, &mut pc, len)?;
            self.estack.push(StackItem::from_byte_string(data.to_vec()));
            self.istack[frame_idx].pc = pc;
            return Ok(StepEvent::Continue);
        }
        if let Some(value) = const_push_value(opcode) {
            self.estack.push(StackItem::from_int(value));
            self.istack[frame_idx].pc = pc;
            return Ok(StepEvent::Continue);
        }

        match opcode {
            x if x == OpCode::PushData1 as u8 => {
                let len = read_operand(&script, &mut pc, 1)?[0] as usize;
                let data = read_operand(&script, &mut pc, len)?;
                self.estack.push(StackItem::from_byte_string(data.to_vec()));
            }
            x if x == OpCode::PushData2 as u8 => {
                let len_bytes = read_operand(&script, &mut pc, 2)?;
                let len = u16::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
                let data = read_operand(&script, &mut pc, len)?;
                self.estack.push(StackItem::from_byte_string(data.to_vec()));
            }
            x if x == OpCode::PushData4 as u8 => {
                let len_bytes = read_operand(&script, &mut pc, 4)?;
                let len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
                let data = read_operand(&script, &mut pc, len)?;
                self.estack.push(StackItem::from_byte_string(data.to_vec()));
            }
            x if x == OpCode::Nop as u8 => {}
            x if x == OpCode::Ret as u8 => {
                self.istack[frame_idx].pc = pc;
                return Ok(self.unload_frame());
            }
            x if x == OpCode::Syscall as u8 => {
                let id_bytes = read_operand(&script, &mut pc, 4)?;
                let id = u32::from_le_bytes(id_bytes.try_into().unwrap());
                self.istack[frame_idx].pc = pc;
                return Ok(StepEvent::Syscall(id));
            }
            x if x == OpCode::Drop as u8 => {
                self.estack.pop()?;
            }
            x if x == OpCode::Dup as u8 => {
                let top = self.estack.peek(0)?.clone();
                self.estack.push(top);
            }
            x if x == OpCode::Add as u8 => {
                let b = self.estack.pop()?.as_int()?;
                let a = self.estack.pop()?.as_int()?;
                self.estack.push(StackItem::from_int(a + b));
            }
            x if x == OpCode::Pack as u8 => {
                let count = self.estack.pop()?.as_i64()?;
                if count < 0 || count as usize > self.estack.len() {
                    return Err(VmError::StackUnderflow);
                }
                let mut items = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    items.push(self.estack.pop()?);
                }
                self.estack.push(StackItem::from_array(items));
            }
            x if x == OpCode::Unpack as u8 => {
                let items = self.estack.pop()?.as_array()?;
                let count = items.len();
                for item in items.into_iter().rev() {
                    self.estack.push(item);
                }
                self.estack.push(StackItem::from_int(count as i64));
            }
            x if x == OpCode::CheckSig as u8 || x == OpCode::CheckMultisig as u8 => {
                return Err(VmError::NotExecutable(opcode));
            }
            other => return Err(VmError::InvalidOpcode(other)),
        }

        self.istack[frame_idx].pc = pc;
        Ok(StepEvent::Continue)
    }

    fn unload_frame(&mut self) -> StepEvent {
        self.istack.pop();
        if self.istack.is_empty() {
            self.state = VmState::Halted;
            StepEvent::Halted
        } else {
            StepEvent::Continue
        }
    }
}

fn read_operand<'a>(script: &'a [u8], pc: &mut usize, len: usize) -> VmResult<&'a [u8]> {
    let end = pc
        .checked_add(len)
        .filter(|end| *end <= script.len())
        .ok_or(VmError::TruncatedOperand(*pc))?;
    let out = &script[*pc..end];
    *pc = end;
    Ok(out)
}
