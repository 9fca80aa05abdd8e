use std::io::{self, Write};

use crate::parser::{Instruction, Program};
use crate::runnable::{Config, EofPolicy, PointerOverflow};

/// Write a C translation unit equivalent to `program`.
///
/// The tape is a static array of `config.tape_length` cells. Under
/// `PointerOverflow::Wrap` pointer moves wrap modulo the tape length, under
/// `PointerOverflow::Abort` they are not bounds checked.
pub fn emit_c(program: &Program, config: &Config, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "#include <stdio.h>")?;
    writeln!(out)?;
    writeln!(out, "static unsigned char tape[{}];", config.tape_length)?;
    writeln!(out)?;
    writeln!(out, "int main(void) {{")?;
    writeln!(out, "    unsigned char *p = tape;")?;

    let length = config.tape_length.get();
    let wrap = config.pointer_overflow == PointerOverflow::Wrap;
    let mut depth = 1usize;

    for opcode in program {
        let n = opcode.auxiliary;

        if opcode.instruction == Instruction::BranchBackward {
            depth = depth.saturating_sub(1);
        }

        let indent = "    ".repeat(depth);

        match opcode.instruction {
            Instruction::MoveLeft if wrap => {
                let back = length - n % length;
                writeln!(out, "{indent}p = tape + (p - tape + {back}) % {length};")?;
            }
            Instruction::MoveRight if wrap => {
                let ahead = n % length;
                writeln!(out, "{indent}p = tape + (p - tape + {ahead}) % {length};")?;
            }
            Instruction::MoveLeft => writeln!(out, "{indent}p -= {n};")?,
            Instruction::MoveRight => writeln!(out, "{indent}p += {n};")?,
            // Cells are unsigned char, so the addition wraps modulo 256.
            Instruction::Increment => writeln!(out, "{indent}*p += {};", n % 256)?,
            Instruction::Decrement => writeln!(out, "{indent}*p -= {};", n % 256)?,
            Instruction::Output => writeln!(out, "{indent}putchar(*p);")?,
            Instruction::Input => {
                let on_eof = match config.eof {
                    EofPolicy::Unchanged => String::new(),
                    EofPolicy::Zero => " else *p = 0;".to_string(),
                    EofPolicy::Newline => " else *p = '\\n';".to_string(),
                };
                writeln!(
                    out,
                    "{indent}{{ int c = getchar(); if (c != EOF) *p = (unsigned char)c;{on_eof} }}"
                )?;
            }
            Instruction::BranchForward => {
                writeln!(out, "{indent}while (*p) {{")?;
                depth += 1;
            }
            Instruction::BranchBackward => writeln!(out, "{indent}}}")?,
            Instruction::Terminate => writeln!(out, "{indent}return 0;")?,
        }
    }

    writeln!(out, "}}")?;

    tracing::debug!(opcodes = program.len(), "emitted C source");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build;
    use std::num::NonZeroUsize;

    fn emit(source: &str, config: &Config) -> String {
        let program = build(source.as_bytes()).unwrap();
        let mut out = Vec::new();
        emit_c(&program, config, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn emits_nested_loops() {
        let source = emit("++++++++[>++++++++<-]>.", &Config::default());

        assert_eq!(
            source,
            "#include <stdio.h>\n\
             \n\
             static unsigned char tape[30000];\n\
             \n\
             int main(void) {\n\
             \x20   unsigned char *p = tape;\n\
             \x20   *p += 8;\n\
             \x20   while (*p) {\n\
             \x20       p += 1;\n\
             \x20       *p += 8;\n\
             \x20       p -= 1;\n\
             \x20       *p -= 1;\n\
             \x20   }\n\
             \x20   p += 1;\n\
             \x20   putchar(*p);\n\
             \x20   return 0;\n\
             }\n"
        );
    }

    #[test]
    fn input_follows_eof_policy() {
        let config = Config {
            eof: EofPolicy::Zero,
            ..Config::default()
        };
        let source = emit(",", &config);

        assert!(source.contains("if (c != EOF) *p = (unsigned char)c; else *p = 0; }"));
    }

    #[test]
    fn wrap_policy_wraps_pointer_moves() {
        let config = Config {
            tape_length: NonZeroUsize::new(4).unwrap(),
            pointer_overflow: PointerOverflow::Wrap,
            ..Config::default()
        };
        let source = emit("<+.>>>>>>", &config);

        assert!(source.contains("static unsigned char tape[4];"));
        assert!(source.contains("    p = tape + (p - tape + 3) % 4;\n    *p += 1;"));
        assert!(source.contains("    p = tape + (p - tape + 2) % 4;\n"));
        assert!(!source.contains("\n    p -= "));
        assert!(!source.contains("\n    p += "));
    }

    #[test]
    fn increments_reduce_modulo_256() {
        let source = emit(&"+".repeat(300), &Config::default());
        assert!(source.contains("*p += 44;"));
    }
}
