// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.
//!
//! `E00xx` lexer, `E01xx` parser, `E02xx` lowering and resolution,
//! `E03xx` code generation, `E04xx` backend verification.

use std::collections::HashMap;

/// Registry of all known error codes.
pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

/// Information about a single error code.
pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Lowering,
    Resolution,
    Codegen,
    Verification,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "Syntax"),
            ErrorCategory::Lowering => write!(f, "Lowering"),
            ErrorCategory::Resolution => write!(f, "Resolution"),
            ErrorCategory::Codegen => write!(f, "Codegen"),
            ErrorCategory::Verification => write!(f, "Verification"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

pub const INVALID_TOKEN: &str = "E0001";
pub const SYNTAX_ERROR: &str = "E0100";
pub const UNKNOWN_INTRINSIC: &str = "E0200";
pub const UNRESOLVED_NAME: &str = "E0201";
pub const UNRESOLVED_TYPE: &str = "E0202";
pub const UNHANDLED_BINDING: &str = "E0203";
pub const IR_MISUSE: &str = "E0204";
pub const REDEFINED_NAME: &str = "E0205";
pub const UNHANDLED_GLOBAL: &str = "E0300";
pub const UNHANDLED_LOCAL: &str = "E0301";
pub const UNHANDLED_PATTERN: &str = "E0302";
pub const UNRESOLVED_IN_CODEGEN: &str = "E0303";
pub const NO_BACKEND_TYPE: &str = "E0304";
pub const UNKNOWN_SYMBOL: &str = "E0305";
pub const CAPTURED_LOCAL: &str = "E0306";
pub const MODULE_EXPRESSION: &str = "E0307";
pub const VERIFICATION_FAILED: &str = "E0400";

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                "E0001" => ("invalid token", Syntax),
                "E0100" => ("syntax error", Syntax),

                "E0200" => ("unknown intrinsic", Lowering),
                "E0201" => ("unresolved name", Resolution),
                "E0202" => ("unresolved type", Resolution),
                "E0203" => ("unsupported binding pattern", Resolution),
                "E0204" => ("invalid IR operation", Resolution),
                "E0205" => ("name defined twice in one module", Resolution),

                "E0300" => ("value has no global form", Codegen),
                "E0301" => ("value cannot be computed at runtime", Codegen),
                "E0302" => ("unsupported binding pattern", Codegen),
                "E0303" => ("unresolved type reached code generation", Codegen),
                "E0304" => ("type has no backend representation", Codegen),
                "E0305" => ("unknown symbol", Codegen),
                "E0306" => ("closure captures a local", Codegen),
                "E0307" => ("module member is not a definition", Codegen),

                "E0400" => ("generated module is malformed", Verification),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }
}
