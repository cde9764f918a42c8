use crate::types::ObjectType;
use core::fmt;

/// A packed BACnet object identifier combining an [`ObjectType`] and a 22-bit
/// instance number into a single `u32`.
///
/// The upper 10 bits encode the object type and the lower 22 bits encode the
/// instance number, matching the BACnet wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(u32);

impl ObjectId {
    /// Highest instance number an object may be configured with.
    pub const MAX_INSTANCE: u32 = 0x3F_FFFE;
    /// Instance number meaning "whichever device receives this request".
    pub const WILDCARD_INSTANCE: u32 = 0x3F_FFFF;

    /// Creates an `ObjectId` from a type and instance number.
    pub const fn new(object_type: ObjectType, instance: u32) -> Self {
        Self((((object_type.to_u16() as u32) & 0x03FF) << 22) | (instance & 0x3F_FFFF))
    }

    /// Returns the raw packed `u32` representation.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Constructs an `ObjectId` from a pre-packed `u32`.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Extracts the [`ObjectType`] from the upper 10 bits.
    pub const fn object_type(self) -> ObjectType {
        let t = ((self.0 >> 22) & 0x03FF) as u16;
        ObjectType::from_u16(t)
    }

    /// Extracts the 22-bit instance number.
    pub const fn instance(self) -> u32 {
        self.0 & 0x3F_FFFF
    }

    /// Returns `true` for a device identifier carrying the wildcard instance.
    pub fn is_device_wildcard(self) -> bool {
        self.object_type() == ObjectType::Device && self.instance() == Self::WILDCARD_INSTANCE
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type(), self.instance())
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectId;
    use crate::types::ObjectType;

    #[test]
    fn encodes_object_id() {
        let id = ObjectId::new(ObjectType::AnalogInput, 1);
        assert_eq!(id.object_type(), ObjectType::AnalogInput);
        assert_eq!(id.instance(), 1);
    }

    #[test]
    fn detects_device_wildcard() {
        assert!(ObjectId::new(ObjectType::Device, ObjectId::WILDCARD_INSTANCE).is_device_wildcard());
        assert!(!ObjectId::new(ObjectType::Device, 123).is_device_wildcard());
        assert!(
            !ObjectId::new(ObjectType::AnalogInput, ObjectId::WILDCARD_INSTANCE)
                .is_device_wildcard()
        );
    }

    #[test]
    fn displays_type_and_instance() {
        let id = ObjectId::new(ObjectType::AnalogInput, 7);
        assert_eq!(alloc::format!("{id}"), "ANALOG_INPUT:7");
    }
}
