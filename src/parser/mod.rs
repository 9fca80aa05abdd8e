mod encoder;
mod instr;
mod linker;
mod program;
mod sanitizer;

pub use self::encoder::{Bytecode, compile, expand};
pub use self::instr::{Instruction, Opcode};
pub use self::linker::link;
pub use self::program::Program;
pub use self::sanitizer::sanitize;
