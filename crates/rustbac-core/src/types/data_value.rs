use crate::types::{AppTag, BitString, Date, ObjectId, Time};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One tagged primitive value, ready for the wire encoder.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    OctetString(Vec<u8>),
    CharacterString(String),
    BitString(BitString),
    Enumerated(u32),
    Date(Date),
    Time(Time),
    ObjectId(ObjectId),
}

impl DataValue {
    /// The application tag this value carries on the wire.
    pub const fn tag(&self) -> AppTag {
        match self {
            Self::Null => AppTag::Null,
            Self::Boolean(_) => AppTag::Boolean,
            Self::Unsigned(_) => AppTag::UnsignedInt,
            Self::Signed(_) => AppTag::SignedInt,
            Self::Real(_) => AppTag::Real,
            Self::Double(_) => AppTag::Double,
            Self::OctetString(_) => AppTag::OctetString,
            Self::CharacterString(_) => AppTag::CharacterString,
            Self::BitString(_) => AppTag::BitString,
            Self::Enumerated(_) => AppTag::Enumerated,
            Self::Date(_) => AppTag::Date,
            Self::Time(_) => AppTag::Time,
            Self::ObjectId(_) => AppTag::ObjectId,
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<u32> for DataValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        Self::Signed(value)
    }
}

impl From<f32> for DataValue {
    fn from(value: f32) -> Self {
        Self::Real(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::CharacterString(value.into())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::CharacterString(value)
    }
}

impl From<ObjectId> for DataValue {
    fn from(value: ObjectId) -> Self {
        Self::ObjectId(value)
    }
}

impl From<BitString> for DataValue {
    fn from(value: BitString) -> Self {
        Self::BitString(value)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::OctetString(bytes) => {
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                Ok(())
            }
            Self::CharacterString(s) => write!(f, "{s:?}"),
            Self::BitString(bits) => {
                f.write_str("{")?;
                for bit in 0..bits.len() {
                    f.write_str(if bits.get(bit) { "1" } else { "0" })?;
                }
                f.write_str("}")
            }
            Self::Enumerated(v) => write!(f, "{v}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::ObjectId(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DataValue;
    use crate::types::{AppTag, BitString, ObjectId, ObjectType};
    use alloc::string::ToString;

    #[test]
    fn reports_its_tag() {
        assert_eq!(DataValue::Real(1.0).tag(), AppTag::Real);
        assert_eq!(
            DataValue::ObjectId(ObjectId::new(ObjectType::Device, 1)).tag(),
            AppTag::ObjectId
        );
        assert_eq!(DataValue::from("x").tag(), AppTag::CharacterString);
    }

    #[test]
    fn displays_human_readable() {
        assert_eq!(DataValue::Real(1.5).to_string(), "1.5");
        assert_eq!(DataValue::from("abc").to_string(), "\"abc\"");
        assert_eq!(
            DataValue::BitString(BitString::from_flags(&[true, false, true])).to_string(),
            "{101}"
        );
        assert_eq!(DataValue::OctetString(alloc::vec![0xC0, 0xA8]).to_string(), "C0A8");
    }
}
