// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree printer used by diagnostics and the `ir` CLI command.
//!
//! Each node prints as `(kind ...)` followed by ` :: ` and its type, with
//! `| ` per level of depth. Nodes nested deeper than `MAX_DEPTH` print `...`.

use std::fmt::Write;

use crate::arena::Ir;
use crate::node::{Node, NodeId};

const MAX_DEPTH: usize = 8;

impl Ir {
    /// Dump one node and everything below it.
    pub fn dump(&mut self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, 0);
        out
    }

    /// Dump a whole unit, one `(module ...)` per module.
    pub fn dump_unit(&mut self, modules: &[NodeId]) -> String {
        let mut out = String::from("(unit\n");
        for &m in modules {
            self.write_node(&mut out, m, 1);
            out.push('\n');
        }
        out.push(')');
        out
    }

    fn write_node(&mut self, out: &mut String, id: NodeId, depth: usize) {
        indent(out, depth);
        if depth > MAX_DEPTH {
            out.push_str("...");
            return;
        }
        self.write_impl(out, id, depth);
        out.push_str(" :: ");
        let ty = self.type_of(id);
        self.write_impl(out, ty, depth);
    }

    fn write_impl(&mut self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.node(id).clone();
        match node {
            Node::TypeInt { width } => {
                let _ = write!(out, "(type_int {})", width);
            }
            Node::ConstantInt { value, .. } => {
                let _ = write!(out, "(constant_int {})", value);
            }
            Node::Identifier { name, .. } => {
                let _ = write!(out, "(identifier {})", name);
            }
            Node::Tuple(vals) | Node::Block(vals) => {
                out.push('(');
                out.push_str(self.node(id).kind_name());
                if !vals.is_empty() {
                    out.push('\n');
                    self.write_children(out, &vals, depth);
                    indent(out, depth);
                }
                out.push(')');
            }
            Node::Module(defs) => {
                out.push_str("(module\n");
                self.write_children(out, &defs, depth);
                indent(out, depth);
                out.push(')');
            }
            Node::Function { arg: a, body: b }
            | Node::Call { func: a, arg: b }
            | Node::Definition { binding: a, value: b }
            | Node::Cast { value: a, ty: b } => {
                out.push('(');
                out.push_str(self.node(id).kind_name());
                out.push('\n');
                self.write_children(out, &[a, b], depth);
                indent(out, depth);
                out.push(')');
            }
            leaf => {
                let _ = write!(out, "({})", leaf.kind_name());
            }
        }
    }

    fn write_children(&mut self, out: &mut String, children: &[NodeId], depth: usize) {
        for &child in children {
            self.write_node(out, child, depth + 1);
            out.push('\n');
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("| ");
    }
}
