// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Instructions and terminators.

use crate::{BlockId, MirOperand, MirType, Signature, ValueId};

/// Call target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// A function by symbol name.
    Direct(String),
    /// A function reference held in a value.
    Indirect(MirOperand),
}

/// Integer width conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOp {
    /// Keep the low bits.
    Trunc,
    /// Widen, copying the sign bit.
    SExt,
}

impl CastOp {
    /// The conversion from `from` bits to `to` bits, `None` when the
    /// widths are equal.
    pub fn between(from: u32, to: u32) -> Option<CastOp> {
        match from.cmp(&to) {
            std::cmp::Ordering::Greater => Some(CastOp::Trunc),
            std::cmp::Ordering::Less => Some(CastOp::SExt),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Non-terminating instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirInst {
    Add {
        dst: ValueId,
        ty: MirType,
        lhs: MirOperand,
        rhs: MirOperand,
    },
    Mul {
        dst: ValueId,
        ty: MirType,
        lhs: MirOperand,
        rhs: MirOperand,
    },
    /// Read a global's value.
    Load {
        dst: ValueId,
        ty: MirType,
        global: String,
    },
    Call {
        /// `None` when the callee returns nothing.
        dst: Option<ValueId>,
        ret_ty: MirType,
        callee: Callee,
        arg: Option<MirOperand>,
    },
    /// `aggregate` with field `index` replaced by `value`.
    InsertValue {
        dst: ValueId,
        ty: MirType,
        aggregate: MirOperand,
        value: MirOperand,
        index: u32,
    },
    ExtractValue {
        dst: ValueId,
        aggregate_ty: MirType,
        aggregate: MirOperand,
        index: u32,
    },
    FuncRef {
        dst: ValueId,
        sig: Signature,
        name: String,
    },
    Cast {
        dst: ValueId,
        op: CastOp,
        from: MirType,
        to: MirType,
        value: MirOperand,
    },
}

impl MirInst {
    /// The value this instruction defines, if any.
    pub fn dst(&self) -> Option<ValueId> {
        match self {
            MirInst::Add { dst, .. }
            | MirInst::Mul { dst, .. }
            | MirInst::Load { dst, .. }
            | MirInst::InsertValue { dst, .. }
            | MirInst::ExtractValue { dst, .. }
            | MirInst::FuncRef { dst, .. }
            | MirInst::Cast { dst, .. } => Some(*dst),
            MirInst::Call { dst, .. } => *dst,
        }
    }

    /// Operands read by this instruction.
    pub fn operands(&self) -> Vec<&MirOperand> {
        match self {
            MirInst::Add { lhs, rhs, .. } | MirInst::Mul { lhs, rhs, .. } => vec![lhs, rhs],
            MirInst::Load { .. } | MirInst::FuncRef { .. } => Vec::new(),
            MirInst::Call { callee, arg, .. } => {
                let mut ops: Vec<&MirOperand> = arg.iter().collect();
                if let Callee::Indirect(target) = callee {
                    ops.push(target);
                }
                ops
            }
            MirInst::InsertValue {
                aggregate, value, ..
            } => vec![aggregate, value],
            MirInst::ExtractValue { aggregate, .. } => vec![aggregate],
            MirInst::Cast { value, .. } => vec![value],
        }
    }

    /// Type of the value this instruction defines.
    pub fn result_ty(&self) -> Option<MirType> {
        match self {
            MirInst::Add { ty, .. } | MirInst::Mul { ty, .. } | MirInst::Load { ty, .. } => Some(ty.clone()),
            MirInst::InsertValue { ty, .. } => Some(ty.clone()),
            MirInst::ExtractValue {
                aggregate_ty, index, ..
            } => aggregate_ty.field(*index).cloned(),
            MirInst::Call { dst, ret_ty, .. } => dst.map(|_| ret_ty.clone()),
            MirInst::FuncRef { sig, .. } => Some(MirType::FuncRef(Box::new(sig.clone()))),
            MirInst::Cast { to, .. } => Some(to.clone()),
        }
    }
}

/// Ends a basic block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirTerminator {
    Return { value: Option<MirOperand> },
    Jump { target: BlockId },
}
