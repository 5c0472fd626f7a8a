// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! BlockBuilder - helper for block and SSA construction during codegen.

use crate::{
    BlockId, Callee, CastOp, MirBlock, MirFunction, MirInst, MirOperand, MirTerminator, MirType, Signature,
    ValueId,
};

pub struct BlockBuilder {
    blocks: Vec<MirBlock>,
    current_block: BlockId,
    next_value_id: u32,
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockBuilder {
    /// A builder positioned at a fresh entry block.
    pub fn new() -> Self {
        let entry = BlockId(0);
        Self {
            blocks: vec![MirBlock::new(entry)],
            current_block: entry,
            next_value_id: 0,
        }
    }

    pub fn alloc_value(&mut self) -> ValueId {
        let id = ValueId(self.next_value_id);
        self.next_value_id += 1;
        id
    }

    pub fn create_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(MirBlock::new(id));
        id
    }

    pub fn switch_to_block(&mut self, block: BlockId) {
        self.current_block = block;
    }

    pub fn current_block(&self) -> BlockId {
        self.current_block
    }

    pub fn push_inst(&mut self, inst: MirInst) {
        let block = &mut self.blocks[self.current_block.0 as usize];
        block.insts.push(inst);
    }

    pub fn terminate(&mut self, term: MirTerminator) {
        let block = &mut self.blocks[self.current_block.0 as usize];
        block.terminator = Some(term);
    }

    pub fn current_block_unterminated(&self) -> bool {
        self.blocks[self.current_block.0 as usize].terminator.is_none()
    }

    /// Close the current block with a jump to a new one and continue there.
    pub fn jump_to_new_block(&mut self) -> BlockId {
        let next = self.create_block();
        self.terminate(MirTerminator::Jump { target: next });
        self.switch_to_block(next);
        next
    }

    // ─── Instruction helpers ─────────────────────────────────────

    pub fn add(&mut self, ty: MirType, lhs: MirOperand, rhs: MirOperand) -> MirOperand {
        let dst = self.alloc_value();
        self.push_inst(MirInst::Add { dst, ty, lhs, rhs });
        dst.into()
    }

    pub fn mul(&mut self, ty: MirType, lhs: MirOperand, rhs: MirOperand) -> MirOperand {
        let dst = self.alloc_value();
        self.push_inst(MirInst::Mul { dst, ty, lhs, rhs });
        dst.into()
    }

    pub fn load(&mut self, ty: MirType, global: impl Into<String>) -> MirOperand {
        let dst = self.alloc_value();
        self.push_inst(MirInst::Load {
            dst,
            ty,
            global: global.into(),
        });
        dst.into()
    }

    /// Emit a call. Returns the result, or `None` for a zero-sized result.
    pub fn call(&mut self, ret_ty: MirType, callee: Callee, arg: Option<MirOperand>) -> Option<MirOperand> {
        let dst = (!ret_ty.is_zero_sized()).then(|| self.alloc_value());
        self.push_inst(MirInst::Call {
            dst,
            ret_ty,
            callee,
            arg,
        });
        dst.map(MirOperand::from)
    }

    pub fn insert_value(&mut self, ty: MirType, aggregate: MirOperand, value: MirOperand, index: u32) -> MirOperand {
        let dst = self.alloc_value();
        self.push_inst(MirInst::InsertValue {
            dst,
            ty,
            aggregate,
            value,
            index,
        });
        dst.into()
    }

    pub fn extract_value(&mut self, aggregate_ty: MirType, aggregate: MirOperand, index: u32) -> MirOperand {
        let dst = self.alloc_value();
        self.push_inst(MirInst::ExtractValue {
            dst,
            aggregate_ty,
            aggregate,
            index,
        });
        dst.into()
    }

    pub fn func_ref(&mut self, sig: Signature, name: impl Into<String>) -> MirOperand {
        let dst = self.alloc_value();
        self.push_inst(MirInst::FuncRef {
            dst,
            sig,
            name: name.into(),
        });
        dst.into()
    }

    /// Convert an integer between widths. Equal widths emit nothing.
    pub fn int_cast(&mut self, from: u32, to: u32, value: MirOperand) -> MirOperand {
        let Some(op) = CastOp::between(from, to) else {
            return value;
        };
        let dst = self.alloc_value();
        self.push_inst(MirInst::Cast {
            dst,
            op,
            from: MirType::Int(from),
            to: MirType::Int(to),
            value,
        });
        dst.into()
    }

    // ─── Finishing ───────────────────────────────────────────────

    pub fn finish_function(self, name: String, param: Option<(ValueId, MirType)>, ret_ty: MirType) -> MirFunction {
        MirFunction {
            name,
            param,
            ret_ty,
            blocks: self.blocks,
        }
    }

    /// Blocks for a computed global body.
    pub fn finish_blocks(self) -> Vec<MirBlock> {
        self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_numbered_in_order() {
        let mut b = BlockBuilder::new();
        let p = b.alloc_value();
        let sum = b.add(MirType::i32(), p.into(), MirOperand::Imm(1));
        assert_eq!(sum, MirOperand::Value(ValueId(1)));
        b.terminate(MirTerminator::Return { value: Some(sum) });
        let f = b.finish_function("f".into(), Some((p, MirType::i32())), MirType::i32());
        assert_eq!(f.blocks.len(), 1);
        assert_eq!(f.blocks[0].insts.len(), 1);
    }

    #[test]
    fn void_calls_define_no_value() {
        let mut b = BlockBuilder::new();
        let r = b.call(MirType::Void, Callee::Direct("g".into()), None);
        assert!(r.is_none());
        assert_eq!(b.finish_blocks()[0].insts[0].dst(), None);
    }

    #[test]
    fn jump_to_new_block_closes_the_current_one() {
        let mut b = BlockBuilder::new();
        let next = b.jump_to_new_block();
        assert_eq!(next, BlockId(1));
        assert_eq!(b.current_block(), next);
        assert!(b.current_block_unterminated());
        let blocks = b.finish_blocks();
        assert_eq!(blocks[0].terminator, Some(MirTerminator::Jump { target: next }));
    }
}
