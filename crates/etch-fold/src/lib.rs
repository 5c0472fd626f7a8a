// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Constant folding for etch IR.
//!
//! One bottom-up rewrite, not iterated to a fixed point:
//! - intrinsic `+`/`*` on two constants become a constant;
//! - `int(w)` on a constant width becomes `type_int(w)`;
//! - a cast of a constant to an integer type becomes a constant;
//! - tuples drop empty elements and one-element tuples and blocks collapse;
//! - constants bound inside blocks and functions are propagated to their uses.

mod folder;

use etch_ir::{Ir, NodeId, Unit};

use folder::{ConstScope, Folder, ScopeKind};

/// Fold every module of a unit.
pub fn fold(unit: Unit) -> Unit {
    let Unit { mut ir, modules } = unit;
    let mut folder = Folder::new(&mut ir);
    let modules = modules
        .into_iter()
        .map(|m| {
            let mut root = ConstScope::root(ScopeKind::Module);
            folder.fold(m, &mut root)
        })
        .collect();
    log::debug!("fold finished: {} rewrite(s)", folder.folded);
    Unit { ir, modules }
}

/// Fold a single expression as if it appeared inside a block.
pub fn fold_expr(ir: &mut Ir, id: NodeId) -> NodeId {
    let mut root = ConstScope::root(ScopeKind::Block);
    Folder::new(ir).fold(id, &mut root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use etch_ir::Node;

    fn pipeline(src: &str) -> Unit {
        let lex = etch_lexer::Lexer::new(src).tokenize();
        assert!(lex.is_ok(), "Lex errors: {:?}", lex.errors);
        let parsed = etch_parser::Parser::new(lex.tokens).parse();
        assert!(parsed.is_ok(), "Parse errors: {:?}", parsed.errors);
        let unit = etch_ir::lower(&parsed.module).unwrap();
        let res = etch_resolve::resolve(unit).unwrap();
        assert!(res.diagnostics.is_empty(), "{:?}", res.diagnostics);
        fold(res.unit)
    }

    fn defs(unit: &Unit) -> Vec<(NodeId, NodeId)> {
        let Node::Module(defs) = unit.ir.node(unit.modules[0]) else {
            panic!("Expected module");
        };
        defs.iter()
            .map(|&d| match unit.ir.node(d) {
                Node::Definition { binding, value } => (*binding, *value),
                other => panic!("Expected definition, got {:?}", other),
            })
            .collect()
    }

    fn binary(ir: &mut Ir, op: Node, a: i64, b: i64) -> NodeId {
        let func = ir.add(op);
        let lhs = ir.add(Node::constant(a));
        let rhs = ir.add(Node::constant(b));
        let arg = ir.add(Node::Tuple(vec![lhs, rhs]));
        ir.add(Node::Call { func, arg })
    }

    // ═══════════════════════════════════════════════════════════
    // Intrinsics
    // ═══════════════════════════════════════════════════════════

    #[test]
    fn add_and_mul_of_constants() {
        let samples = [-7, -1, 0, 1, 2, 41, 1000];
        for &a in &samples {
            for &b in &samples {
                let mut ir = Ir::new();
                let sum = binary(&mut ir, Node::IntrAdd, a, b);
                let sum = fold_expr(&mut ir, sum);
                assert_eq!(ir.node(sum), &Node::constant(a + b));

                let product = binary(&mut ir, Node::IntrMul, a, b);
                let product = fold_expr(&mut ir, product);
                assert_eq!(ir.node(product), &Node::constant(a * b));
            }
        }
    }

    #[test]
    fn arithmetic_wraps_at_the_left_width() {
        let mut ir = Ir::new();
        let sum = binary(&mut ir, Node::IntrAdd, i64::from(i32::MAX), 1);
        let sum = fold_expr(&mut ir, sum);
        assert_eq!(ir.node(sum), &Node::constant(i64::from(i32::MIN)));
    }

    #[test]
    fn refolding_a_constant_is_a_no_op() {
        let mut ir = Ir::new();
        let sum = binary(&mut ir, Node::IntrAdd, 2, 3);
        let once = fold_expr(&mut ir, sum);
        let len = ir.len();
        assert_eq!(fold_expr(&mut ir, once), once);
        assert_eq!(ir.len(), len);
    }

    #[test]
    fn int_constructor_folds_constant_widths_only() {
        let mut ir = Ir::new();
        let func = ir.add(Node::IntrInt);
        let width = ir.add(Node::constant(8));
        let call = ir.add(Node::Call { func, arg: width });
        let folded = fold_expr(&mut ir, call);
        assert_eq!(ir.node(folded), &Node::TypeInt { width: 8 });

        let name = ir.add(Node::identifier("w"));
        let call = ir.add(Node::Call { func, arg: name });
        assert_eq!(fold_expr(&mut ir, call), call);

        for bad in [0, 65] {
            let width = ir.add(Node::constant(bad));
            let call = ir.add(Node::Call { func, arg: width });
            assert_eq!(fold_expr(&mut ir, call), call);
        }
    }

    #[test]
    fn non_constant_operands_stay_calls() {
        let mut ir = Ir::new();
        let func = ir.add(Node::IntrAdd);
        let x = ir.add(Node::identifier("x"));
        let one = ir.add(Node::constant(1));
        let arg = ir.add(Node::Tuple(vec![x, one]));
        let call = ir.add(Node::Call { func, arg });
        assert_eq!(fold_expr(&mut ir, call), call);
    }

    // ═══════════════════════════════════════════════════════════
    // Containers
    // ═══════════════════════════════════════════════════════════

    #[test]
    fn one_element_tuple_collapses() {
        let mut ir = Ir::new();
        let c = ir.add(Node::constant(9));
        let t = ir.add(Node::Tuple(vec![c]));
        assert_eq!(fold_expr(&mut ir, t), c);
    }

    #[test]
    fn tuple_of_empty_tuples_becomes_empty() {
        let mut ir = Ir::new();
        let e1 = ir.add(Node::Tuple(Vec::new()));
        let e2 = ir.add(Node::Tuple(Vec::new()));
        let t = ir.add(Node::Tuple(vec![e1, e2]));
        let folded = fold_expr(&mut ir, t);
        assert_eq!(ir.node(folded), &Node::Tuple(Vec::new()));
    }

    #[test]
    fn multi_element_tuple_keeps_arity() {
        let mut ir = Ir::new();
        let sum = binary(&mut ir, Node::IntrAdd, 1, 2);
        let x = ir.add(Node::identifier("x"));
        let empty = ir.add(Node::Tuple(Vec::new()));
        let t = ir.add(Node::Tuple(vec![sum, empty, x]));
        let folded = fold_expr(&mut ir, t);
        let Node::Tuple(vals) = ir.node(folded).clone() else {
            panic!("Expected tuple");
        };
        assert_eq!(vals.len(), 2);
        assert_eq!(ir.node(vals[0]), &Node::constant(3));
        assert_eq!(vals[1], x);
    }

    #[test]
    fn single_element_block_collapses() {
        let mut ir = Ir::new();
        let sum = binary(&mut ir, Node::IntrMul, 6, 7);
        let b = ir.add(Node::Block(vec![sum]));
        let folded = fold_expr(&mut ir, b);
        assert_eq!(ir.node(folded), &Node::constant(42));
    }

    #[test]
    fn cast_of_constant_changes_width() {
        let mut ir = Ir::new();
        let v = ir.add(Node::constant(300));
        let ty = ir.type_int(8);
        let cast = ir.add(Node::Cast { value: v, ty });
        let folded = fold_expr(&mut ir, cast);
        assert_eq!(ir.node(folded), &Node::ConstantInt { value: 44, width: 8 });
    }

    #[test]
    fn type_type_is_left_alone() {
        let mut ir = Ir::new();
        assert_eq!(fold_expr(&mut ir, Ir::TYPE_TYPE), Ir::TYPE_TYPE);
    }

    // ═══════════════════════════════════════════════════════════
    // Whole programs
    // ═══════════════════════════════════════════════════════════

    #[test]
    fn block_local_shadowing_folds_to_inner_value() {
        let unit = pipeline("x = 1; y = { x = 2; x }");
        let defs = defs(&unit);
        assert_eq!(unit.ir.node(defs[0].1), &Node::constant(1));
        assert_eq!(unit.ir.node(defs[1].1), &Node::constant(2));
    }

    #[test]
    fn module_constants_are_not_propagated() {
        let unit = pipeline("x = 1\ny = x + 1");
        let defs = defs(&unit);
        assert!(matches!(unit.ir.node(defs[1].1), Node::Call { .. }));
    }

    #[test]
    fn call_to_user_function_is_left_alone() {
        let unit = pipeline("add2 = (x) -> x + 1\nr = add2(41)");
        let defs = defs(&unit);
        let Node::Call { func, arg } = unit.ir.node(defs[1].1).clone() else {
            panic!("Expected call");
        };
        assert!(matches!(unit.ir.node(func), Node::Identifier { name, .. } if name == "add2"));
        // The one-element argument tuple collapsed to the literal.
        assert_eq!(unit.ir.node(arg), &Node::constant(41));

        let Node::Function { arg, .. } = unit.ir.node(defs[0].1).clone() else {
            panic!("Expected function");
        };
        assert!(matches!(unit.ir.node(arg), Node::Identifier { name, .. } if name == "x"));
    }

    #[test]
    fn identifier_types_are_normalized() {
        let mut unit = pipeline("t = int(8)\nv = 3: t\nf = (a: t) -> a");
        let defs = defs(&unit);
        assert_eq!(unit.ir.node(defs[1].1), &Node::ConstantInt { value: 3, width: 8 });

        let f_ty = unit.ir.type_of(defs[2].0);
        let Node::Function { arg, body } = unit.ir.node(f_ty).clone() else {
            panic!("Expected function type");
        };
        assert_eq!(unit.ir.node(arg), &Node::TypeInt { width: 8 });
        assert_eq!(unit.ir.node(body), &Node::TypeInt { width: 8 });
    }

    #[test]
    fn typed_binding_narrows_its_constant() {
        let mut unit = pipeline("x: int(8) = 300\n(a: int(16), b) = (70000, 2)");
        let defs = defs(&unit);
        assert_eq!(unit.ir.node(defs[0].1), &Node::ConstantInt { value: 44, width: 8 });
        let int8 = unit.ir.type_int(8);
        assert_eq!(unit.ir.type_of(defs[0].1), int8);

        let Node::Tuple(vals) = unit.ir.node(defs[1].1).clone() else {
            panic!("Expected tuple");
        };
        assert_eq!(unit.ir.node(vals[0]), &Node::ConstantInt { value: 4464, width: 16 });
        assert_eq!(unit.ir.node(vals[1]), &Node::constant(2));
    }

    #[test]
    fn parameters_shadow_block_constants() {
        let unit = pipeline("g = { x = 5; f = (x) -> x * 2; f }");
        let defs = defs(&unit);
        let Node::Block(vals) = unit.ir.node(defs[0].1).clone() else {
            panic!("Expected block");
        };
        // `x = 5` is dropped; `f`'s definition and the trailing `f` remain.
        assert_eq!(vals.len(), 2);
        let Node::Definition { value, .. } = unit.ir.node(vals[0]).clone() else {
            panic!("Expected definition");
        };
        let Node::Function { body, .. } = unit.ir.node(value).clone() else {
            panic!("Expected function");
        };
        let Node::Call { arg, .. } = unit.ir.node(body).clone() else {
            panic!("Expected call");
        };
        let Node::Tuple(ops) = unit.ir.node(arg).clone() else {
            panic!("Expected tuple");
        };
        assert!(matches!(unit.ir.node(ops[0]), Node::Identifier { name, .. } if name == "x"));
    }
}
