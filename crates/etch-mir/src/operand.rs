// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Instruction operands.

/// SSA value, numbered per function (or per computed global).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

/// Something an instruction can read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirOperand {
    Value(ValueId),
    /// Integer immediate.
    Imm(i64),
    /// Undefined aggregate, the start of an `insertvalue` chain.
    Undef,
    /// Address of a function, by symbol name.
    Func(String),
}

impl MirOperand {
    pub fn as_value(&self) -> Option<ValueId> {
        match self {
            MirOperand::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<ValueId> for MirOperand {
    fn from(v: ValueId) -> Self {
        MirOperand::Value(v)
    }
}
