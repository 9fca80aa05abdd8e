use super::{Bytecode, Instruction, Opcode, Program};
use crate::error::CompileError;

impl Bytecode {
    /// Resolve branch targets, producing a finalized `Program`.
    pub fn link(self) -> Result<Program, CompileError> {
        link(self.data)
    }
}

/// Pair every `BranchForward` with its matching `BranchBackward`, storing
/// each one's index in the other's auxiliary.
///
/// Fails on the first unmatched `]`, or on the innermost unclosed `[` left
/// once the scan is done.
pub fn link(mut opcodes: Vec<Opcode>) -> Result<Program, CompileError> {
    let mut stack: Vec<usize> = Vec::new();
    let mut pairs = 0usize;

    for index in 0..opcodes.len() {
        match opcodes[index].instruction {
            Instruction::BranchForward => stack.push(index),
            Instruction::BranchBackward => {
                let open = stack
                    .pop()
                    .ok_or(CompileError::UnmatchedClose { index })?;

                opcodes[index].auxiliary = open;
                opcodes[open].auxiliary = index;
                pairs += 1;
            }
            _ => {}
        }
    }

    if let Some(&index) = stack.last() {
        return Err(CompileError::UnmatchedOpen { index });
    }

    tracing::debug!(opcodes = opcodes.len(), pairs, "linked branches");

    Ok(Program::new(opcodes))
}
