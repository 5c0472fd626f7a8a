// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Textual form of the backend module.

use std::fmt;

use crate::*;

impl fmt::Display for MirType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirType::Void => write!(f, "void"),
            MirType::Int(width) => write!(f, "i{}", width),
            MirType::Struct(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 { write!(f, ",")?; }
                    write!(f, " {}", field)?;
                }
                if !fields.is_empty() { write!(f, " ")?; }
                write!(f, "}}")
            }
            MirType::FuncRef(sig) => write!(f, "{}", sig),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "fn({}) -> {}", param, self.ret),
            None => write!(f, "fn() -> {}", self.ret),
        }
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

impl fmt::Display for MirOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirOperand::Value(v) => write!(f, "{}", v),
            MirOperand::Imm(value) => write!(f, "{}", value),
            MirOperand::Undef => write!(f, "undef"),
            MirOperand::Func(name) => write!(f, "@{}", name),
        }
    }
}

impl fmt::Display for Callee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callee::Direct(name) => write!(f, "@{}", name),
            Callee::Indirect(target) => write!(f, "{}", target),
        }
    }
}

impl fmt::Display for MirInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirInst::Add { dst, ty, lhs, rhs } => write!(f, "{} = add {} {}, {}", dst, ty, lhs, rhs),
            MirInst::Mul { dst, ty, lhs, rhs } => write!(f, "{} = mul {} {}, {}", dst, ty, lhs, rhs),
            MirInst::Load { dst, ty, global } => write!(f, "{} = load {}, @{}", dst, ty, global),
            MirInst::Call { dst, ret_ty, callee, arg } => {
                if let Some(d) = dst {
                    write!(f, "{} = ", d)?;
                }
                write!(f, "call {} {}(", ret_ty, callee)?;
                if let Some(arg) = arg {
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            MirInst::InsertValue { dst, ty, aggregate, value, index } => {
                write!(f, "{} = insertvalue {} {}, {}, {}", dst, ty, aggregate, value, index)
            }
            MirInst::ExtractValue { dst, aggregate_ty, aggregate, index } => {
                write!(f, "{} = extractvalue {} {}, {}", dst, aggregate_ty, aggregate, index)
            }
            MirInst::FuncRef { dst, sig, name } => write!(f, "{} = funcref {} @{}", dst, sig, name),
            MirInst::Cast { dst, op, from, to, value } => {
                write!(f, "{} = {} {} {} to {}", dst, op, from, value, to)
            }
        }
    }
}

impl fmt::Display for CastOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastOp::Trunc => write!(f, "trunc"),
            CastOp::SExt => write!(f, "sext"),
        }
    }
}

impl fmt::Display for MirTerminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirTerminator::Return { value: Some(v) } => write!(f, "return {}", v),
            MirTerminator::Return { value: None } => write!(f, "return"),
            MirTerminator::Jump { target } => write!(f, "jump {}", target),
        }
    }
}

impl fmt::Display for MirBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.id)?;
        for inst in &self.insts {
            writeln!(f, "  {}", inst)?;
        }
        match &self.terminator {
            Some(term) => writeln!(f, "  {}", term),
            None => writeln!(f, "  <unterminated>"),
        }
    }
}

impl fmt::Display for MirFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define {} @{}(", self.ret_ty, self.name)?;
        if let Some((value, ty)) = &self.param {
            write!(f, "{} {}", ty, value)?;
        }
        writeln!(f, ") {{")?;
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for MirGlobal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            GlobalKind::Constant { ty, value } => write!(f, "@{} = constant {} {}", self.name, ty, value),
            GlobalKind::Alias { ty, target } => write!(f, "@{} = alias {} @{}", self.name, ty, target),
            GlobalKind::Computed { ty, body } => {
                writeln!(f, "@{} = computed {} {{", self.name, ty)?;
                for block in body {
                    write!(f, "{}", block)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl fmt::Display for MirModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for global in &self.globals {
            writeln!(f, "{}", global)?;
        }
        for function in &self.functions {
            writeln!(f)?;
            writeln!(f, "{}", function)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_syntax() {
        let pair = MirType::Struct(vec![MirType::i32(), MirType::Int(8)]);
        assert_eq!(pair.to_string(), "{ i32, i8 }");
        assert_eq!(MirType::Struct(Vec::new()).to_string(), "{}");
        let sig = Signature { param: None, ret: MirType::i32() };
        assert_eq!(MirType::FuncRef(Box::new(sig)).to_string(), "fn() -> i32");
    }

    #[test]
    fn function_listing() {
        let mut b = BlockBuilder::new();
        let x = b.alloc_value();
        let sum = b.add(MirType::i32(), x.into(), MirOperand::Imm(1));
        b.terminate(MirTerminator::Return { value: Some(sum) });
        let func = b.finish_function("etch.1.add2".into(), Some((x, MirType::i32())), MirType::i32());
        assert_eq!(
            func.to_string(),
            "define i32 @etch.1.add2(i32 %0) {\n\
             bb0:\n\
             \x20 %1 = add i32 %0, 1\n\
             \x20 return %1\n\
             }"
        );
    }

    #[test]
    fn width_conversions() {
        let mut b = BlockBuilder::new();
        let x = b.alloc_value();
        let narrow = b.int_cast(32, 8, x.into());
        let wide = b.int_cast(8, 64, narrow.clone());
        assert_eq!(b.int_cast(64, 64, wide.clone()), wide);
        let blocks = b.finish_blocks();
        assert_eq!(blocks[0].insts[0].to_string(), "%1 = trunc i32 %0 to i8");
        assert_eq!(blocks[0].insts[1].to_string(), "%2 = sext i8 %1 to i64");
        assert_eq!(blocks[0].insts.len(), 2);
    }

    #[test]
    fn module_listing_puts_globals_first() {
        let mut module = MirModule::new("module.e");
        module.add_global(MirGlobal {
            name: "etch.1.x".into(),
            kind: GlobalKind::Constant { ty: MirType::i32(), value: 1 },
        });
        module.add_global(MirGlobal {
            name: "etch.1.y".into(),
            kind: GlobalKind::Alias { ty: MirType::i32(), target: "etch.1.x".into() },
        });
        let text = module.to_string();
        assert!(text.starts_with("; module module.e\n@etch.1.x = constant i32 1\n"));
        assert!(text.contains("@etch.1.y = alias i32 @etch.1.x"));
    }
}
