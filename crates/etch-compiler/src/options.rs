// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compilation settings.

use etch_mir::DEFAULT_MODULE_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail when resolution leaves any name unresolved.
    pub strict: bool,
    /// Run the backend verifier on the generated module.
    pub verify: bool,
    pub module_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict: false,
            verify: true,
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CompileOptions::default();
        assert!(!options.strict);
        assert!(options.verify);
        assert_eq!(options.module_name, "module.e");
    }

    #[test]
    fn builder_overrides() {
        let options = CompileOptions::default().strict(true).verify(false).module_name("m.e");
        assert!(options.strict);
        assert!(!options.verify);
        assert_eq!(options.module_name, "m.e");
    }
}
