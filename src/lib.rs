//! Run-length bytecode compiler and virtual machine for BrainFuck.
//!
//! Source flows through [`sanitize`], [`compile`] and [`link`] to produce a
//! [`Program`], which is then handed to the [`Interpreter`] or to a backend in
//! [`codegen`].

pub mod codegen;
mod error;
pub mod parser;
pub mod runnable;

pub use error::{CompileError, Direction, RuntimeError};
pub use parser::{Bytecode, Instruction, Opcode, Program, compile, link, sanitize};
pub use runnable::{Config, EofPolicy, Halt, Interpreter, PointerOverflow, Runnable, Tape};

/// Run the whole front end: sanitize, run-length encode, then link branches.
pub fn build(source: &[u8]) -> Result<Program, CompileError> {
    let commands = sanitize(source);
    compile(&commands)?.link()
}
