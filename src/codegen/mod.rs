//! Backends that translate a linked `Program` into another executable form.
//!
//! These rely only on the opcode contract: movement and arithmetic operands are
//! repeat counts, and branch opcodes come in matched pairs.

mod c;

pub use self::c::emit_c;
