// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Symbol names.

/// Prefix of every mangled name, with the mangling version.
const PREFIX: &str = "etch.1";

/// Path of the runtime entry point the linker starts from.
pub const ENTRY_PATH: [&str; 3] = ["etch", "rt", "entry"];

/// `etch.1` followed by `.segment` for each path segment.
pub fn mangle<S: AsRef<str>>(path: &[S]) -> String {
    let mut name = String::from(PREFIX);
    for segment in path {
        name.push('.');
        name.push_str(segment.as_ref());
    }
    name
}

pub fn entry_symbol() -> String {
    mangle(&ENTRY_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangles_paths() {
        assert_eq!(mangle::<&str>(&[]), "etch.1");
        assert_eq!(mangle(&["add2"]), "etch.1.add2");
        assert_eq!(mangle(&["m".to_string(), "f".to_string()]), "etch.1.m.f");
        assert_eq!(entry_symbol(), "etch.1.etch.rt.entry");
    }
}
