use super::{Instruction, Opcode};
use crate::error::CompileError;

/// Run-length encoded opcodes whose branch targets are not yet resolved.
///
/// Branch opcodes carry an auxiliary of 1 until [`Bytecode::link`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytecode {
    pub(super) data: Vec<Opcode>,
}

impl Bytecode {
    pub fn opcodes(&self) -> &[Opcode] {
        &self.data
    }

    pub fn into_opcodes(self) -> Vec<Opcode> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Convert a sanitized command stream into run-length encoded opcodes.
///
/// Runs of `<`, `>`, `+` and `-` collapse into one opcode carrying the run
/// length. I/O and branch commands are never merged. A `Terminate` opcode is
/// always appended. Bytes outside the command alphabet are skipped.
pub fn compile(commands: &[u8]) -> Result<Bytecode, CompileError> {
    let requested = commands.len() + 1;
    let mut data: Vec<Opcode> = Vec::new();
    data.try_reserve_exact(requested)
        .map_err(|_| CompileError::ResourceExhausted { what: "opcode buffer", requested })?;

    let mut pending: Option<Opcode> = None;

    for instruction in commands.iter().filter_map(|&b| Instruction::from_command(b)) {
        match pending.as_mut() {
            Some(opcode) if instruction.is_mergeable() && opcode.instruction == instruction => {
                opcode.auxiliary += 1;
            }
            _ => {
                data.extend(pending.take());
                pending = Some(Opcode::new(instruction, 1));
            }
        }
    }

    data.extend(pending);
    data.push(Opcode::terminate());

    tracing::debug!(
        commands = commands.len(),
        opcodes = data.len(),
        "run-length encoded program"
    );

    Ok(Bytecode { data })
}

/// Expand opcodes back into the command bytes they were compiled from.
///
/// `Terminate` produces nothing. Branch opcodes produce a single byte
/// regardless of their auxiliary.
pub fn expand(opcodes: &[Opcode]) -> Vec<u8> {
    let mut output = Vec::new();

    for opcode in opcodes {
        let Some(command) = opcode.instruction.command() else {
            continue;
        };

        let count = if opcode.instruction.is_mergeable() {
            opcode.auxiliary
        } else {
            1
        };

        output.extend(std::iter::repeat_n(command, count));
    }

    output
}
