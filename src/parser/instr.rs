use std::fmt;

/// BrainFuck instruction
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Shift the data pointer to the left.
    MoveLeft,
    /// Shift the data pointer to the right.
    MoveRight,
    /// Add to the current memory cell.
    Increment,
    /// Remove from the current memory cell.
    Decrement,
    /// Write the current memory cell to the output stream.
    Output,
    /// Read one byte from the input stream into the current memory cell.
    Input,
    /// If the current memory cell is 0, jump to the matching `BranchBackward`.
    BranchForward,
    /// If the current memory cell is not 0, jump to the matching `BranchForward`.
    BranchBackward,
    /// Stop execution. Never produced from source, only by the compiler.
    Terminate,
}

impl Instruction {
    /// The eight source commands, in no particular order.
    pub const COMMANDS: [u8; 8] = [b'<', b'>', b'+', b'-', b'.', b',', b'[', b']'];

    /// Decode a source command byte.
    pub fn from_command(byte: u8) -> Option<Self> {
        match byte {
            b'<' => Some(Instruction::MoveLeft),
            b'>' => Some(Instruction::MoveRight),
            b'+' => Some(Instruction::Increment),
            b'-' => Some(Instruction::Decrement),
            b'.' => Some(Instruction::Output),
            b',' => Some(Instruction::Input),
            b'[' => Some(Instruction::BranchForward),
            b']' => Some(Instruction::BranchBackward),
            _ => None,
        }
    }

    /// The source command byte for this instruction, if it has one.
    pub fn command(self) -> Option<u8> {
        match self {
            Instruction::MoveLeft => Some(b'<'),
            Instruction::MoveRight => Some(b'>'),
            Instruction::Increment => Some(b'+'),
            Instruction::Decrement => Some(b'-'),
            Instruction::Output => Some(b'.'),
            Instruction::Input => Some(b','),
            Instruction::BranchForward => Some(b'['),
            Instruction::BranchBackward => Some(b']'),
            Instruction::Terminate => None,
        }
    }

    /// Whether consecutive copies of this instruction merge into one opcode.
    pub fn is_mergeable(self) -> bool {
        matches!(
            self,
            Instruction::MoveLeft
                | Instruction::MoveRight
                | Instruction::Increment
                | Instruction::Decrement
        )
    }

    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Instruction::BranchForward | Instruction::BranchBackward
        )
    }
}

/// One compiled instruction plus its auxiliary operand.
///
/// For movement and arithmetic the operand is a repeat count, for branches it
/// is the index of the partner opcode, for I/O it is always 1 and for
/// `Terminate` it is 0.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub instruction: Instruction,
    pub auxiliary: usize,
}

impl Opcode {
    pub fn new(instruction: Instruction, auxiliary: usize) -> Self {
        Opcode {
            instruction,
            auxiliary,
        }
    }

    pub fn terminate() -> Self {
        Opcode::new(Instruction::Terminate, 0)
    }
}

/// Display Opcode similar to assembly.
impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.auxiliary;

        match self.instruction {
            Instruction::Increment if n == 1 => write!(f, "INC"),
            Instruction::Increment => write!(f, "ADD\t0x{n:04X}"),
            Instruction::Decrement if n == 1 => write!(f, "DEC"),
            Instruction::Decrement => write!(f, "SUB\t0x{n:04X}"),
            Instruction::MoveRight if n == 1 => write!(f, "NEXT"),
            Instruction::MoveRight => write!(f, "NEXT\t0x{n:04X}"),
            Instruction::MoveLeft if n == 1 => write!(f, "PREV"),
            Instruction::MoveLeft => write!(f, "PREV\t0x{n:04X}"),
            Instruction::Output => write!(f, "PRINT"),
            Instruction::Input => write!(f, "READ"),
            Instruction::BranchForward => write!(f, "BEGIN\t0x{n:04X}"),
            Instruction::BranchBackward => write!(f, "END\t0x{n:04X}"),
            Instruction::Terminate => write!(f, "HALT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn commands_decode_and_encode() {
        for byte in Instruction::COMMANDS {
            let instruction = Instruction::from_command(byte).unwrap();
            assert_eq!(instruction.command(), Some(byte));
        }

        assert_eq!(Instruction::from_command(b'a'), None);
        assert_eq!(Instruction::Terminate.command(), None);
    }

    #[rstest]
    #[case(Opcode::new(Instruction::Increment, 1), "INC")]
    #[case(Opcode::new(Instruction::Increment, 16), "ADD\t0x0010")]
    #[case(Opcode::new(Instruction::MoveLeft, 3), "PREV\t0x0003")]
    #[case(Opcode::new(Instruction::BranchForward, 10), "BEGIN\t0x000A")]
    #[case(Opcode::new(Instruction::Input, 1), "READ")]
    #[case(Opcode::terminate(), "HALT")]
    fn debug_format(#[case] opcode: Opcode, #[case] expected: &str) {
        assert_eq!(format!("{opcode:?}"), expected);
    }
}
