// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Backend module representation - SSA values in explicit basic blocks.
//!
//! Code generation produces a [`MirModule`] of named globals and top-level
//! functions. Aggregates are built with `insertvalue` and taken apart with
//! `extractvalue`; every function takes at most one parameter.

mod builder;
mod display;
mod function;
mod inst;
mod module;
mod operand;
mod types;
mod verify;

pub use builder::BlockBuilder;
pub use function::{BlockId, MirBlock, MirFunction};
pub use inst::{Callee, CastOp, MirInst, MirTerminator};
pub use module::{GlobalKind, MirGlobal, MirModule, DEFAULT_MODULE_NAME};
pub use operand::{MirOperand, ValueId};
pub use types::{MirType, Signature};
pub use verify::{verify, VerifyError};
