// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! The backend module: named globals and functions.

use crate::{MirBlock, MirFunction, MirType};

/// Module name used when the caller does not pick one.
pub const DEFAULT_MODULE_NAME: &str = "module.e";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirModule {
    pub name: String,
    pub globals: Vec<MirGlobal>,
    pub functions: Vec<MirFunction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirGlobal {
    pub name: String,
    pub kind: GlobalKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalKind {
    /// Immutable integer constant.
    Constant { ty: MirType, value: i64 },
    /// Another name for an existing global.
    Alias { ty: MirType, target: String },
    /// Value computed by running `body` before program entry. The last
    /// block returns the value.
    Computed { ty: MirType, body: Vec<MirBlock> },
}

impl MirGlobal {
    pub fn ty(&self) -> &MirType {
        match &self.kind {
            GlobalKind::Constant { ty, .. }
            | GlobalKind::Alias { ty, .. }
            | GlobalKind::Computed { ty, .. } => ty,
        }
    }
}

impl MirModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            globals: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn global(&self, name: &str) -> Option<&MirGlobal> {
        self.globals.iter().find(|g| g.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&MirFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn add_global(&mut self, global: MirGlobal) {
        self.globals.push(global);
    }

    pub fn add_function(&mut self, function: MirFunction) {
        self.functions.push(function);
    }
}

impl Default for MirModule {
    fn default() -> Self {
        Self::new(DEFAULT_MODULE_NAME)
    }
}
