use std::fmt;
use std::ops::Index;
use std::slice;

use super::Opcode;

/// A linked, immutable sequence of opcodes.
///
/// Every `BranchForward` and `BranchBackward` holds its partner's index.
#[derive(Clone, PartialEq, Eq)]
pub struct Program {
    data: Vec<Opcode>,
}

impl Program {
    pub(super) fn new(data: Vec<Opcode>) -> Self {
        Program { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Opcode> {
        self.data.iter()
    }

    pub fn opcodes(&self) -> &[Opcode] {
        &self.data
    }

    pub fn get(&self, index: usize) -> Option<&Opcode> {
        self.data.get(index)
    }
}

impl Index<usize> for Program {
    type Output = Opcode;

    fn index(&self, index: usize) -> &Opcode {
        &self.data[index]
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Opcode;
    type IntoIter = slice::Iter<'a, Opcode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Addr\tInstr\tOperands")?;

        for (pos, opcode) in self.data.iter().enumerate() {
            writeln!(f, "0x{pos:04X}\t{opcode:?}")?;
        }

        writeln!(f)
    }
}
