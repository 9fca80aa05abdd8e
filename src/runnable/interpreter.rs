use std::io::{self, Read, Write};

use anyhow::Result;

use super::{Config, EofPolicy, Runnable, Tape};
use crate::error::{Direction, RuntimeError};
use crate::parser::{Instruction, Program};

/// How a program stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Reached the final `Terminate` or ran off the end of the program.
    Completed,
    /// Reached a `Terminate` before the end of the program.
    Premature { index: usize },
}

/// brainfuck virtual machine
pub struct Interpreter {
    program: Program,
    config: Config,
    tape: Tape,
    /// Program counter
    pc: usize,
    /// Opcodes executed so far
    steps: u64,
    /// Reader used by brainfuck's , command
    io_read: Box<dyn Read>,
    /// Writer used by brainfuck's . command
    io_write: Box<dyn Write>,
}

impl Interpreter {
    /// Set up a VM reading stdin and writing stdout.
    pub fn new(program: Program, config: Config) -> Result<Self, RuntimeError> {
        Ok(Self {
            program,
            config,
            tape: Tape::new(config.tape_length, config.pointer_overflow)?,
            pc: 0,
            steps: 0,
            io_read: Box::new(io::stdin()),
            io_write: Box::new(io::stdout()),
        })
    }

    /// Replace the streams used by `,` and `.`.
    #[must_use]
    pub fn with_io(mut self, read: impl Read + 'static, write: impl Write + 'static) -> Self {
        self.io_read = Box::new(read);
        self.io_write = Box::new(write);
        self
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Execute a single opcode on the VM.
    ///
    /// Returns Ok(None) to continue execution, Ok(Some(_)) once the program
    /// has halted, or Err(_) on execution errors.
    pub fn step(&mut self) -> Result<Option<Halt>, RuntimeError> {
        // Terminate if the program counter is outside of the program.
        let Some(&opcode) = self.program.get(self.pc) else {
            return Ok(Some(Halt::Completed));
        };

        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                return Err(RuntimeError::StepLimitExceeded { limit });
            }
        }
        self.steps += 1;

        let n = opcode.auxiliary;

        match opcode.instruction {
            Instruction::MoveLeft => self.tape.shift(Direction::Left, n, self.pc)?,
            Instruction::MoveRight => self.tape.shift(Direction::Right, n, self.pc)?,
            Instruction::Increment => self.tape.add(n),
            Instruction::Decrement => self.tape.sub(n),
            Instruction::Output => {
                self.io_write
                    .write_all(&[self.tape.get()])
                    .map_err(|source| RuntimeError::Io {
                        context: "Failed to write output character",
                        source,
                    })?;
            }
            Instruction::Input => self.read_cell()?,
            // A taken branch lands on its partner; the advance below then
            // steps past it.
            Instruction::BranchForward => {
                if self.tape.get() == 0 {
                    self.pc = n;
                }
            }
            Instruction::BranchBackward => {
                if self.tape.get() != 0 {
                    self.pc = n;
                }
            }
            Instruction::Terminate => {
                if self.pc + 1 == self.program.len() {
                    return Ok(Some(Halt::Completed));
                }

                tracing::warn!("premature termination @ {}", self.pc);
                return Ok(Some(Halt::Premature { index: self.pc }));
            }
        }

        self.pc += 1;
        Ok(None)
    }

    fn read_cell(&mut self) -> Result<(), RuntimeError> {
        // Make sure any prompt is visible before blocking on input.
        self.io_write.flush().map_err(|source| RuntimeError::Io {
            context: "Failed to flush output",
            source,
        })?;

        let mut buf = [0u8; 1];
        match self.io_read.read_exact(&mut buf) {
            Ok(()) => self.tape.set(buf[0]),
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => match self.config.eof {
                EofPolicy::Unchanged => {}
                EofPolicy::Zero => self.tape.set(0),
                EofPolicy::Newline => self.tape.set(b'\n'),
            },
            Err(source) => {
                return Err(RuntimeError::Io {
                    context: "Failed to read input character",
                    source,
                });
            }
        }

        Ok(())
    }

    /// Run until the program halts or fails. Output is flushed either way.
    pub fn execute(&mut self) -> Result<Halt, RuntimeError> {
        let result = loop {
            match self.step() {
                Ok(None) => {}
                Ok(Some(halt)) => break Ok(halt),
                Err(error) => break Err(error),
            }
        };

        let flushed = self.io_write.flush().map_err(|source| RuntimeError::Io {
            context: "Failed to flush output",
            source,
        });

        tracing::debug!(steps = self.steps, "execution finished");

        let halt = result?;
        flushed?;
        Ok(halt)
    }

    pub fn reset(&mut self) -> Result<(), RuntimeError> {
        self.tape = Tape::new(self.config.tape_length, self.config.pointer_overflow)?;
        self.pc = 0;
        self.steps = 0;
        Ok(())
    }
}

impl Runnable for Interpreter {
    fn run(&mut self) -> Result<()> {
        // A previous run leaves the tape dirty.
        if self.steps > 0 {
            self.reset()?;
        }

        let halt = self.execute()?;
        tracing::debug!(?halt, "program halted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_buffer::SharedBuffer;
    use super::*;
    use crate::build;
    use crate::parser::{Opcode, compile, link};
    use crate::runnable::PointerOverflow;
    use rstest::rstest;
    use std::io::Cursor;
    use std::num::NonZeroUsize;

    fn interpreter(source: &str, config: Config, input: &[u8]) -> (Interpreter, SharedBuffer) {
        let program = build(source.as_bytes()).unwrap();
        let buffer = SharedBuffer::new();
        let vm = Interpreter::new(program, config)
            .unwrap()
            .with_io(Cursor::new(input.to_vec()), buffer.clone());
        (vm, buffer)
    }

    fn run(source: &str) -> Vec<u8> {
        let (mut vm, buffer) = interpreter(source, Config::default(), b"");
        assert_eq!(vm.execute().unwrap(), Halt::Completed);
        buffer.get_content()
    }

    #[rstest]
    #[case("+++.", vec![3])]
    #[case("++++++++[>++++++++<-]>.", vec![64])]
    #[case("++++++++[>++++++++<-]>+.", b"A".to_vec())]
    #[case("[.]+.", vec![1])]
    #[case("-.", vec![255])]
    #[case("++>+++[<+>-]<.", vec![5])]
    fn outputs(#[case] source: &str, #[case] expected: Vec<u8>) {
        assert_eq!(run(source), expected);
    }

    #[test]
    fn run_hello_world() {
        let output = run(include_str!("../../tests/programs/hello_world.bf"));
        assert_eq!(String::from_utf8(output).unwrap(), "Hello World!\n");
    }

    #[test]
    fn run_rot13() {
        // The program stops once input is exhausted and the cell is left unchanged.
        let (mut vm, buffer) = interpreter(
            include_str!("../../tests/programs/rot13.bf"),
            Config::default(),
            b"Hello World! 123",
        );

        vm.execute().unwrap();
        assert_eq!(buffer.get_string_content(), "Uryyb Jbeyq! 123");
    }

    #[test]
    fn wraps_after_256_increments() {
        let source = "+".repeat(256);
        let (mut vm, _) = interpreter(&source, Config::default(), b"");

        vm.execute().unwrap();
        assert_eq!(vm.tape().get(), 0);
        // One merged opcode plus terminate.
        assert_eq!(vm.steps(), 2);
    }

    #[test]
    fn non_terminating_loop_hits_step_limit() {
        let config = Config {
            step_limit: Some(1000),
            ..Config::default()
        };
        let (mut vm, _) = interpreter("+[]", config, b"");

        let error = vm.execute().unwrap_err();
        assert!(matches!(error, RuntimeError::StepLimitExceeded { limit: 1000 }));
    }

    #[test]
    fn overrun_is_reported_after_flushing_output() {
        let config = Config {
            tape_length: NonZeroUsize::new(2).unwrap(),
            ..Config::default()
        };
        let (mut vm, buffer) = interpreter("+.>>.", config, b"");

        let error = vm.execute().unwrap_err();
        assert!(matches!(
            error,
            RuntimeError::TapeOverrun { index: 2, pointer: 0, offset: 2, length: 2, .. }
        ));
        assert_eq!(buffer.get_content(), vec![1]);
        assert!(buffer.flush_count() >= 1);
    }

    #[test]
    fn moving_left_of_origin_is_reported() {
        let (mut vm, _) = interpreter("<", Config::default(), b"");
        assert!(matches!(
            vm.execute(),
            Err(RuntimeError::TapeOverrun { direction: Direction::Left, .. })
        ));
    }

    #[test]
    fn wrap_policy_wraps_pointer() {
        let config = Config {
            tape_length: NonZeroUsize::new(3).unwrap(),
            pointer_overflow: PointerOverflow::Wrap,
            ..Config::default()
        };
        let (mut vm, buffer) = interpreter("<+++>>>.<.", config, b"");

        vm.execute().unwrap();
        assert_eq!(buffer.get_content(), vec![3, 0]);
    }

    #[test]
    fn echo_input() {
        let (mut vm, buffer) = interpreter(",.,.", Config::default(), b"hi");
        vm.execute().unwrap();
        assert_eq!(buffer.get_string_content(), "hi");
    }

    #[rstest]
    #[case(EofPolicy::Unchanged, 7)]
    #[case(EofPolicy::Zero, 0)]
    #[case(EofPolicy::Newline, b'\n')]
    fn exhausted_input(#[case] eof: EofPolicy, #[case] expected: u8) {
        let config = Config {
            eof,
            ..Config::default()
        };
        let (mut vm, buffer) = interpreter("+++++++,.", config, b"");

        vm.execute().unwrap();
        assert_eq!(buffer.get_content(), vec![expected]);
    }

    #[test]
    fn premature_termination_is_not_fatal() {
        let mut opcodes = compile(b"+.").unwrap().into_opcodes();
        opcodes.extend([Opcode::new(Instruction::Output, 1), Opcode::terminate()]);
        let program = link(opcodes).unwrap();

        let buffer = SharedBuffer::new();
        let mut vm = Interpreter::new(program, Config::default())
            .unwrap()
            .with_io(Cursor::new(Vec::new()), buffer.clone());

        let logs = SharedBuffer::new();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.make_writer())
            .with_ansi(false)
            .finish();
        let halt = tracing::subscriber::with_default(subscriber, || vm.execute().unwrap());

        assert_eq!(halt, Halt::Premature { index: 2 });
        assert_eq!(buffer.get_content(), vec![1]);
        assert!(logs.get_string_content().contains("premature termination @ 2"));
    }

    #[test]
    fn tape_allocation_failure_is_reported() {
        let config = Config {
            tape_length: NonZeroUsize::new(usize::MAX).unwrap(),
            ..Config::default()
        };
        let program = build(b"+").unwrap();

        assert!(matches!(
            Interpreter::new(program, config),
            Err(RuntimeError::ResourceExhausted { length: usize::MAX })
        ));
    }

    #[test]
    fn run_resets_tape() {
        let (mut vm, buffer) = interpreter("+++.", Config::default(), b"");

        vm.run().unwrap();
        assert_eq!(&vm.tape().cells()[..2], &[3u8, 0]);

        vm.run().unwrap();
        assert_eq!(buffer.get_content(), vec![3, 3]);
        assert_eq!(&vm.tape().cells()[..2], &[3u8, 0]);
        assert_eq!(vm.steps(), 3);
    }
}
