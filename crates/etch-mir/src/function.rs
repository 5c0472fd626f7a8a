// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Functions and basic blocks.

use crate::{MirInst, MirTerminator, MirType, Signature, ValueId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

/// Basic block. `terminator` is `None` until the block is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirBlock {
    pub id: BlockId,
    pub insts: Vec<MirInst>,
    pub terminator: Option<MirTerminator>,
}

impl MirBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            insts: Vec::new(),
            terminator: None,
        }
    }
}

/// A top-level function with at most one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirFunction {
    pub name: String,
    pub param: Option<(ValueId, MirType)>,
    pub ret_ty: MirType,
    /// The first block is the entry block.
    pub blocks: Vec<MirBlock>,
}

impl MirFunction {
    pub fn signature(&self) -> Signature {
        Signature {
            param: self.param.as_ref().map(|(_, ty)| ty.clone()),
            ret: self.ret_ty.clone(),
        }
    }
}
