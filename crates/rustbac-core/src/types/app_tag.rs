use core::fmt;

/// Application tag numbers: the wire type of a primitive value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectId = 12,
}

impl AppTag {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Null),
            1 => Some(Self::Boolean),
            2 => Some(Self::UnsignedInt),
            3 => Some(Self::SignedInt),
            4 => Some(Self::Real),
            5 => Some(Self::Double),
            6 => Some(Self::OctetString),
            7 => Some(Self::CharacterString),
            8 => Some(Self::BitString),
            9 => Some(Self::Enumerated),
            10 => Some(Self::Date),
            11 => Some(Self::Time),
            12 => Some(Self::ObjectId),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Boolean => "BOOLEAN",
            Self::UnsignedInt => "UNSIGNED_INTEGER",
            Self::SignedInt => "SIGNED_INTEGER",
            Self::Real => "REAL",
            Self::Double => "DOUBLE",
            Self::OctetString => "OCTET_STRING",
            Self::CharacterString => "CHARACTER_STRING",
            Self::BitString => "BIT_STRING",
            Self::Enumerated => "ENUMERATED",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::ObjectId => "OBJECTIDENTIFIER",
        }
    }
}

impl fmt::Display for AppTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
