// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Backend types.

/// Backend value type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MirType {
    Void,
    /// Integer of the given bit width.
    Int(u32),
    /// Anonymous aggregate with positional fields.
    Struct(Vec<MirType>),
    /// Reference to a function with the given signature.
    FuncRef(Box<Signature>),
}

/// Function signature: at most one parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub param: Option<MirType>,
    pub ret: MirType,
}

impl MirType {
    pub fn i32() -> Self {
        MirType::Int(32)
    }

    /// True for types that carry no data: `void` and the empty struct.
    pub fn is_zero_sized(&self) -> bool {
        match self {
            MirType::Void => true,
            MirType::Struct(fields) => fields.iter().all(MirType::is_zero_sized),
            _ => false,
        }
    }

    /// Field type of an aggregate, `None` when out of range or not an aggregate.
    pub fn field(&self, index: u32) -> Option<&MirType> {
        match self {
            MirType::Struct(fields) => fields.get(index as usize),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_types() {
        assert!(MirType::Void.is_zero_sized());
        assert!(MirType::Struct(Vec::new()).is_zero_sized());
        assert!(MirType::Struct(vec![MirType::Struct(Vec::new())]).is_zero_sized());
        assert!(!MirType::Struct(vec![MirType::i32()]).is_zero_sized());
        assert!(!MirType::Int(1).is_zero_sized());
    }

    #[test]
    fn struct_fields() {
        let ty = MirType::Struct(vec![MirType::i32(), MirType::Int(8)]);
        assert_eq!(ty.field(1), Some(&MirType::Int(8)));
        assert_eq!(ty.field(2), None);
        assert_eq!(MirType::i32().field(0), None);
    }
}
