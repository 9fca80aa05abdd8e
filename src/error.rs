use std::io;

use thiserror::Error;

/// Errors raised while turning source into a linked `Program`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("More [ than ]: unmatched branch-forward at opcode 0x{index:04X}")]
    UnmatchedOpen { index: usize },
    #[error("More ] than [: unmatched branch-backward at opcode 0x{index:04X}")]
    UnmatchedClose { index: usize },
    #[error("Could not allocate {what} ({requested} entries)")]
    ResourceExhausted { what: &'static str, requested: usize },
}

/// Direction of a data pointer move, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Errors that abort a running program.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(
        "Tape overrun at opcode 0x{index:04X}: moving {direction:?} by {offset} from cell {pointer} (tape length {length})"
    )]
    TapeOverrun {
        index: usize,
        pointer: usize,
        offset: usize,
        direction: Direction,
        length: usize,
    },
    #[error("Could not allocate tape of {length} cells")]
    ResourceExhausted { length: usize },
    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}
