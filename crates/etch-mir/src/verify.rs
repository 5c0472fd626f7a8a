// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Structural and type consistency checks over a finished module.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{Callee, CastOp, GlobalKind, MirBlock, MirInst, MirModule, MirOperand, MirTerminator, MirType, ValueId};

/// One consistency violation. `symbol` names the function or global it was
/// found in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("`{symbol}` has no entry block")]
    MissingEntry { symbol: String },

    #[error("`{symbol}`: bb{block} is not terminated")]
    Unterminated { symbol: String, block: u32 },

    #[error("`{symbol}`: bb{block} jumps to missing bb{target}")]
    BadJumpTarget { symbol: String, block: u32, target: u32 },

    #[error("`{symbol}`: %{value} is used before it is defined")]
    UseBeforeDef { symbol: String, value: u32 },

    #[error("`{symbol}`: %{value} is defined more than once")]
    Redefined { symbol: String, value: u32 },

    #[error("`{symbol}`: reference to unknown {expected} `{name}`")]
    UnknownSymbol {
        symbol: String,
        expected: &'static str,
        name: String,
    },

    #[error("`{symbol}`: index {index} is out of range for {ty}")]
    IndexOutOfRange { symbol: String, index: u32, ty: String },

    #[error("`{symbol}`: return does not match result type {ty}")]
    ReturnMismatch { symbol: String, ty: String },

    #[error("alias `{symbol}` points to unknown global `{target}`")]
    DanglingAlias { symbol: String, target: String },

    #[error("symbol `{symbol}` is defined more than once")]
    DuplicateSymbol { symbol: String },

    #[error("`{symbol}`: {context} expects {expected}, found {found}")]
    TypeMismatch {
        symbol: String,
        context: &'static str,
        expected: String,
        found: String,
    },

    #[error("`{symbol}`: cannot {op} {from} to {to}")]
    BadCast {
        symbol: String,
        op: String,
        from: String,
        to: String,
    },
}

/// Check a module, returning every violation found.
pub fn verify(module: &MirModule) -> Result<(), Vec<VerifyError>> {
    let mut verifier = Verifier {
        module,
        errors: Vec::new(),
    };
    verifier.check_symbols();
    for global in &module.globals {
        match &global.kind {
            GlobalKind::Constant { .. } => {}
            GlobalKind::Alias { ty, target } => match module.global(target) {
                Some(aliased) => verifier.expect_ty(&global.name, "alias", ty, aliased.ty()),
                None => verifier.errors.push(VerifyError::DanglingAlias {
                    symbol: global.name.clone(),
                    target: target.clone(),
                }),
            },
            GlobalKind::Computed { ty, body } => verifier.check_body(&global.name, None, ty, body),
        }
    }
    for function in &module.functions {
        verifier.check_body(&function.name, function.param.clone(), &function.ret_ty, &function.blocks);
    }

    if verifier.errors.is_empty() {
        Ok(())
    } else {
        Err(verifier.errors)
    }
}

struct Verifier<'m> {
    module: &'m MirModule,
    errors: Vec<VerifyError>,
}

impl Verifier<'_> {
    fn check_symbols(&mut self) {
        let mut seen = HashSet::new();
        let names = self
            .module
            .globals
            .iter()
            .map(|g| &g.name)
            .chain(self.module.functions.iter().map(|f| &f.name));
        for name in names {
            if !seen.insert(name) {
                self.errors.push(VerifyError::DuplicateSymbol { symbol: name.clone() });
            }
        }
    }

    /// Blocks are checked in order; codegen only ever jumps forward, so
    /// a value must be defined in an earlier position to be used.
    fn check_body(&mut self, symbol: &str, param: Option<(ValueId, MirType)>, ret_ty: &MirType, blocks: &[MirBlock]) {
        if blocks.is_empty() {
            self.errors.push(VerifyError::MissingEntry {
                symbol: symbol.to_string(),
            });
            return;
        }

        let mut defined: HashSet<ValueId> = param.iter().map(|(v, _)| *v).collect();
        let mut types: HashMap<ValueId, MirType> = param.into_iter().collect();
        for block in blocks {
            for inst in &block.insts {
                for op in inst.operands() {
                    self.check_operand(symbol, op, &defined);
                }
                self.check_inst(symbol, inst, &types);
                if let Some(dst) = inst.dst() {
                    if !defined.insert(dst) {
                        self.errors.push(VerifyError::Redefined {
                            symbol: symbol.to_string(),
                            value: dst.0,
                        });
                    }
                    if let Some(ty) = inst.result_ty() {
                        types.insert(dst, ty);
                    }
                }
            }

            match &block.terminator {
                None => self.errors.push(VerifyError::Unterminated {
                    symbol: symbol.to_string(),
                    block: block.id.0,
                }),
                Some(MirTerminator::Jump { target }) => {
                    if target.0 as usize >= blocks.len() {
                        self.errors.push(VerifyError::BadJumpTarget {
                            symbol: symbol.to_string(),
                            block: block.id.0,
                            target: target.0,
                        });
                    }
                }
                Some(MirTerminator::Return { value }) => {
                    if let Some(v) = value {
                        self.check_operand(symbol, v, &defined);
                        self.check_operand_ty(symbol, "return", ret_ty, v, &types);
                    }
                    if value.is_some() == ret_ty.is_zero_sized() {
                        self.errors.push(VerifyError::ReturnMismatch {
                            symbol: symbol.to_string(),
                            ty: ret_ty.to_string(),
                        });
                    }
                }
            }
        }
    }

    fn check_operand(&mut self, symbol: &str, op: &MirOperand, defined: &HashSet<ValueId>) {
        match op {
            MirOperand::Value(v) if !defined.contains(v) => {
                self.errors.push(VerifyError::UseBeforeDef {
                    symbol: symbol.to_string(),
                    value: v.0,
                });
            }
            MirOperand::Func(name) => self.expect_function(symbol, name),
            _ => {}
        }
    }

    fn check_inst(&mut self, symbol: &str, inst: &MirInst, types: &HashMap<ValueId, MirType>) {
        match inst {
            MirInst::Load { ty, global, .. } => match self.module.global(global) {
                Some(g) => self.expect_ty(symbol, "load", g.ty(), ty),
                None => self.errors.push(VerifyError::UnknownSymbol {
                    symbol: symbol.to_string(),
                    expected: "global",
                    name: global.clone(),
                }),
            },
            MirInst::Call {
                callee: Callee::Direct(name),
                arg,
                ..
            } => {
                self.expect_function(symbol, name);
                let param = self.module.function(name).and_then(|f| f.signature().param);
                if let (Some(param), Some(arg)) = (param, arg) {
                    self.check_operand_ty(symbol, "call argument", &param, arg, types);
                }
            }
            MirInst::FuncRef { name, .. } => self.expect_function(symbol, name),
            MirInst::InsertValue {
                ty,
                aggregate,
                value,
                index,
                ..
            } => {
                self.check_index(symbol, ty, *index);
                self.check_operand_ty(symbol, "insertvalue aggregate", ty, aggregate, types);
                if let Some(field) = ty.field(*index) {
                    self.check_operand_ty(symbol, "insertvalue field", field, value, types);
                }
            }
            MirInst::ExtractValue {
                aggregate_ty,
                aggregate,
                index,
                ..
            } => {
                self.check_index(symbol, aggregate_ty, *index);
                self.check_operand_ty(symbol, "extractvalue", aggregate_ty, aggregate, types);
            }
            MirInst::Add { ty, lhs, rhs, .. } | MirInst::Mul { ty, lhs, rhs, .. } => {
                self.check_operand_ty(symbol, "arithmetic", ty, lhs, types);
                self.check_operand_ty(symbol, "arithmetic", ty, rhs, types);
            }
            MirInst::Cast {
                op, from, to, value, ..
            } => {
                let valid = match (from, to) {
                    (MirType::Int(a), MirType::Int(b)) => CastOp::between(*a, *b) == Some(*op),
                    _ => false,
                };
                if !valid {
                    self.errors.push(VerifyError::BadCast {
                        symbol: symbol.to_string(),
                        op: op.to_string(),
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                self.check_operand_ty(symbol, "cast", from, value, types);
            }
            MirInst::Call { .. } => {}
        }
    }

    /// Immediates and `undef` take the type their use asks for.
    fn check_operand_ty(
        &mut self,
        symbol: &str,
        context: &'static str,
        expected: &MirType,
        op: &MirOperand,
        types: &HashMap<ValueId, MirType>,
    ) {
        let found = match op {
            MirOperand::Value(v) => types.get(v).cloned(),
            MirOperand::Func(name) => self
                .module
                .function(name)
                .map(|f| MirType::FuncRef(Box::new(f.signature()))),
            MirOperand::Imm(_) | MirOperand::Undef => None,
        };
        if let Some(found) = found {
            self.expect_ty(symbol, context, expected, &found);
        }
    }

    fn expect_ty(&mut self, symbol: &str, context: &'static str, expected: &MirType, found: &MirType) {
        if expected != found {
            self.errors.push(VerifyError::TypeMismatch {
                symbol: symbol.to_string(),
                context,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }

    fn expect_function(&mut self, symbol: &str, name: &str) {
        if self.module.function(name).is_none() {
            self.errors.push(VerifyError::UnknownSymbol {
                symbol: symbol.to_string(),
                expected: "function",
                name: name.to_string(),
            });
        }
    }

    fn check_index(&mut self, symbol: &str, ty: &MirType, index: u32) {
        if ty.field(index).is_none() {
            self.errors.push(VerifyError::IndexOutOfRange {
                symbol: symbol.to_string(),
                index,
                ty: ty.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockBuilder, BlockId, MirFunction, MirGlobal, Signature};

    fn add_one(name: &str) -> MirFunction {
        let mut b = BlockBuilder::new();
        let x = b.alloc_value();
        let sum = b.add(MirType::i32(), x.into(), MirOperand::Imm(1));
        b.terminate(MirTerminator::Return { value: Some(sum) });
        b.finish_function(name.into(), Some((x, MirType::i32())), MirType::i32())
    }

    #[test]
    fn well_formed_module_passes() {
        let mut module = MirModule::default();
        module.add_function(add_one("f"));
        let mut b = BlockBuilder::new();
        let r = b.call(MirType::i32(), Callee::Direct("f".into()), Some(MirOperand::Imm(41)));
        b.terminate(MirTerminator::Return { value: r });
        module.add_global(MirGlobal {
            name: "r".into(),
            kind: GlobalKind::Computed {
                ty: MirType::i32(),
                body: b.finish_blocks(),
            },
        });
        assert_eq!(verify(&module), Ok(()));
    }

    #[test]
    fn unterminated_block_and_bad_jump() {
        let mut module = MirModule::default();
        let mut b = BlockBuilder::new();
        b.terminate(MirTerminator::Jump { target: BlockId(7) });
        b.create_block();
        module.add_function(b.finish_function("g".into(), None, MirType::Void));
        let errors = verify(&module).unwrap_err();
        assert!(errors.contains(&VerifyError::BadJumpTarget {
            symbol: "g".into(),
            block: 0,
            target: 7
        }));
        assert!(errors.contains(&VerifyError::Unterminated {
            symbol: "g".into(),
            block: 1
        }));
    }

    #[test]
    fn use_before_def_and_unknown_callee() {
        let mut module = MirModule::default();
        let mut b = BlockBuilder::new();
        let ghost = ValueId(9);
        let r = b.call(MirType::i32(), Callee::Direct("missing".into()), Some(ghost.into()));
        b.terminate(MirTerminator::Return { value: r });
        module.add_function(b.finish_function("h".into(), None, MirType::i32()));
        let errors = verify(&module).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, VerifyError::UseBeforeDef { value: 9, .. })));
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::UnknownSymbol { name, .. } if name == "missing")));
    }

    #[test]
    fn aggregate_index_out_of_range() {
        let mut module = MirModule::default();
        let pair = MirType::Struct(vec![MirType::i32(), MirType::i32()]);
        let mut b = BlockBuilder::new();
        let agg = b.insert_value(pair.clone(), MirOperand::Undef, MirOperand::Imm(1), 0);
        let v = b.extract_value(pair, agg, 2);
        b.terminate(MirTerminator::Return { value: Some(v) });
        module.add_function(b.finish_function("k".into(), None, MirType::i32()));
        let errors = verify(&module).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], VerifyError::IndexOutOfRange { index: 2, .. }));
    }

    #[test]
    fn dangling_alias_duplicates_and_return_mismatch() {
        let mut module = MirModule::default();
        module.add_global(MirGlobal {
            name: "a".into(),
            kind: GlobalKind::Alias {
                ty: MirType::i32(),
                target: "nowhere".into(),
            },
        });
        module.add_function(add_one("a"));
        let mut b = BlockBuilder::new();
        b.terminate(MirTerminator::Return { value: None });
        module.add_function(b.finish_function("v".into(), None, MirType::i32()));
        let errors = verify(&module).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, VerifyError::DanglingAlias { .. })));
        assert!(errors.iter().any(|e| matches!(e, VerifyError::DuplicateSymbol { symbol } if symbol == "a")));
        assert!(errors.iter().any(|e| matches!(e, VerifyError::ReturnMismatch { symbol, .. } if symbol == "v")));
    }

    #[test]
    fn load_and_insertvalue_types_must_match() {
        let mut module = MirModule::default();
        module.add_global(MirGlobal {
            name: "x".into(),
            kind: GlobalKind::Constant {
                ty: MirType::Int(8),
                value: 44,
            },
        });
        let pair = MirType::Struct(vec![MirType::Int(8), MirType::i32()]);
        let mut b = BlockBuilder::new();
        let x = b.load(MirType::i32(), "x");
        let agg = b.insert_value(pair.clone(), MirOperand::Undef, x, 0);
        let agg = b.insert_value(pair.clone(), agg, MirOperand::Imm(1), 1);
        b.terminate(MirTerminator::Return { value: Some(agg) });
        module.add_global(MirGlobal {
            name: "z".into(),
            kind: GlobalKind::Computed {
                ty: pair,
                body: b.finish_blocks(),
            },
        });
        let errors = verify(&module).unwrap_err();
        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::TypeMismatch { context: "load", found, .. } if found == "i32")));
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::TypeMismatch { context: "insertvalue field", expected, .. } if expected == "i8")));
    }

    #[test]
    fn casts_must_change_width_in_their_direction() {
        let mut module = MirModule::default();
        let mut b = BlockBuilder::new();
        let x = b.alloc_value();
        let narrow = b.int_cast(32, 8, x.into());
        b.push_inst(MirInst::Cast {
            dst: ValueId(2),
            op: CastOp::SExt,
            from: MirType::Int(8),
            to: MirType::Int(4),
            value: narrow.clone(),
        });
        b.terminate(MirTerminator::Return { value: Some(narrow) });
        module.add_function(b.finish_function("c".into(), Some((x, MirType::i32())), MirType::Int(8)));
        let errors = verify(&module).unwrap_err();
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert!(matches!(&errors[0], VerifyError::BadCast { op, .. } if op == "sext"));
    }

    #[test]
    fn funcref_must_name_a_function() {
        let mut module = MirModule::default();
        let mut b = BlockBuilder::new();
        let sig = Signature {
            param: None,
            ret: MirType::i32(),
        };
        let f = b.func_ref(sig.clone(), "nope");
        b.terminate(MirTerminator::Return { value: Some(f) });
        module.add_function(b.finish_function("m".into(), None, MirType::FuncRef(Box::new(sig))));
        let errors = verify(&module).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, VerifyError::UnknownSymbol { expected: "function", .. })));
    }
}
