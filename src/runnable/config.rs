use std::num::NonZeroUsize;

/// Number of cells on the tape unless configured otherwise.
pub const DEFAULT_TAPE_LENGTH: NonZeroUsize = match NonZeroUsize::new(30_000) {
    Some(length) => length,
    None => panic!("tape length must be positive"),
};

/// What happens when the data pointer would leave the tape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerOverflow {
    /// Stop the program with a `TapeOverrun` error.
    #[default]
    Abort,
    /// Wrap around modulo the tape length.
    Wrap,
}

/// What an input instruction does once the input stream is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EofPolicy {
    /// Leave the current cell as it was.
    #[default]
    Unchanged,
    /// Store 0.
    Zero,
    /// Store `b'\n'`.
    Newline,
}

/// Execution settings for an `Interpreter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub tape_length: NonZeroUsize,
    pub pointer_overflow: PointerOverflow,
    pub eof: EofPolicy,
    /// Abort after this many executed opcodes. `None` runs without bound.
    pub step_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tape_length: DEFAULT_TAPE_LENGTH,
            pointer_overflow: PointerOverflow::default(),
            eof: EofPolicy::default(),
            step_limit: None,
        }
    }
}
