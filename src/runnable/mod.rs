use anyhow::Result;

/// Simple interface for an type that can be invoked without any arguments and
/// with no return value.
pub trait Runnable {
    /// Invoke this type.
    fn run(&mut self) -> Result<()>;
}

mod config;
mod interpreter;
mod tape;
#[cfg(test)]
mod test_buffer;
#[cfg(test)]
pub use self::test_buffer::SharedBuffer;

pub use self::config::{Config, DEFAULT_TAPE_LENGTH, EofPolicy, PointerOverflow};
pub use self::interpreter::{Halt, Interpreter};
pub use self::tape::Tape;
