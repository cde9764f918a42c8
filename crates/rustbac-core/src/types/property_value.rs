use crate::types::{BitString, DataValue, ObjectId};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// The semantic value held by a property: a scalar or an ordered list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    Single(DataValue),
    List(Vec<DataValue>),
}

impl PropertyValue {
    /// The value as a sequence; a scalar is a one-element sequence.
    pub fn elements(&self) -> &[DataValue] {
        match self {
            Self::Single(value) => core::slice::from_ref(value),
            Self::List(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.elements().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
}

macro_rules! single_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(value: $ty) -> Self {
                    Self::Single(value.into())
                }
            }
        )+
    };
}

single_from!(DataValue, bool, u32, i32, f32, f64, &str, String, ObjectId, BitString);

impl From<Vec<DataValue>> for PropertyValue {
    fn from(values: Vec<DataValue>) -> Self {
        Self::List(values)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => write!(f, "{value}"),
            Self::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}
