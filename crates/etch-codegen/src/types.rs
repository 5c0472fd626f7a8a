// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! IR type nodes → backend types.

use etch_ir::{Ir, Node, NodeId};
use etch_mir::{MirType, Signature};

use crate::{CodegenError, CodegenResult};

/// Translate a type node.
///
/// Tuples become structs and function types become function references.
/// Unresolved types are an error, never a guess.
pub fn lower_type(ir: &mut Ir, ty: NodeId) -> CodegenResult<MirType> {
    match ir.node(ty).clone() {
        Node::TypeInt { width } => Ok(MirType::Int(width)),
        Node::Tuple(fields) => {
            let fields = fields
                .into_iter()
                .map(|f| lower_type(ir, f))
                .collect::<CodegenResult<Vec<_>>>()?;
            Ok(MirType::Struct(fields))
        }
        Node::Function { arg, body } => Ok(MirType::FuncRef(Box::new(signature(ir, arg, body)?))),
        Node::TypeUnresolved => Err(CodegenError::unresolved(ir, ty)),
        _ => Err(CodegenError::unhandled_type(ir, ty)),
    }
}

/// Signature of a function type. A zero-sized argument takes no
/// parameter and a zero-sized result returns nothing.
pub fn signature(ir: &mut Ir, arg: NodeId, body: NodeId) -> CodegenResult<Signature> {
    let param = lower_type(ir, arg)?;
    let ret = lower_type(ir, body)?;
    Ok(Signature {
        param: (!param.is_zero_sized()).then_some(param),
        ret: if ret.is_zero_sized() { MirType::Void } else { ret },
    })
}

/// Backend type of a value node.
pub fn value_type(ir: &mut Ir, value: NodeId) -> CodegenResult<MirType> {
    let ty = ir.type_of(value);
    lower_type(ir, ty)
}

/// Signature of a function-typed value.
pub fn value_signature(ir: &mut Ir, value: NodeId) -> CodegenResult<Signature> {
    match value_type(ir, value)? {
        MirType::FuncRef(sig) => Ok(*sig),
        _ => Err(CodegenError::unhandled_local(ir, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_tuples_and_functions() {
        let mut ir = Ir::new();
        let i32_ty = ir.type_int(32);
        let i8_ty = ir.type_int(8);
        let pair = ir.add(Node::Tuple(vec![i32_ty, i8_ty]));
        assert_eq!(
            lower_type(&mut ir, pair).unwrap(),
            MirType::Struct(vec![MirType::Int(32), MirType::Int(8)])
        );

        let f = ir.add(Node::Function { arg: pair, body: i32_ty });
        let MirType::FuncRef(sig) = lower_type(&mut ir, f).unwrap() else {
            panic!("Expected function reference");
        };
        assert_eq!(sig.ret, MirType::i32());
        assert!(sig.param.is_some());
    }

    #[test]
    fn empty_argument_takes_no_parameter() {
        let mut ir = Ir::new();
        let unit = ir.empty_tuple();
        let i32_ty = ir.type_int(32);
        let sig = signature(&mut ir, unit, i32_ty).unwrap();
        assert_eq!(sig.param, None);
    }

    #[test]
    fn function_returning_function_returns_a_reference() {
        let mut ir = Ir::new();
        let i32_ty = ir.type_int(32);
        let inner = ir.add(Node::Function { arg: i32_ty, body: i32_ty });
        let sig = signature(&mut ir, i32_ty, inner).unwrap();
        assert!(matches!(sig.ret, MirType::FuncRef(_)));
    }

    #[test]
    fn unresolved_and_module_types_fail() {
        let mut ir = Ir::new();
        assert!(matches!(
            lower_type(&mut ir, Ir::TYPE_UNRESOLVED),
            Err(CodegenError::UnresolvedType { .. })
        ));
        assert!(matches!(
            lower_type(&mut ir, Ir::TYPE_MODULE),
            Err(CodegenError::UnhandledType { .. })
        ));
    }
}
