use crate::types::AppTag;
use core::fmt;

/// Failure turning a property value into tagged wire items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The tag has no encoding rule.
    NotImplemented(AppTag),
    /// A value element does not fit the property's tag.
    TypeMismatch { tag: AppTag },
    ValueOutOfRange,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented(tag) => write!(f, "encoding not implemented for {tag}"),
            Self::TypeMismatch { tag } => write!(f, "value does not match application tag {tag}"),
            Self::ValueOutOfRange => f.write_str("value out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[cfg(test)]
mod tests {
    use super::EncodeError;
    use crate::types::AppTag;
    use alloc::string::ToString;

    #[test]
    fn names_the_tag() {
        assert_eq!(
            EncodeError::NotImplemented(AppTag::Date).to_string(),
            "encoding not implemented for DATE"
        );
    }
}
