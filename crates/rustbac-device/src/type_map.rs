use rustbac_core::types::{AppTag, PropertyId};
use std::collections::HashMap;

/// Default application tag for each property id, used when a property is
/// added without an explicit tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTypeMap {
    tags: HashMap<PropertyId, AppTag>,
}

impl PropertyTypeMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table for the standard properties this crate knows about.
    /// `PRESENT_VALUE` is deliberately absent: its type depends on the object.
    pub fn standard() -> Self {
        use PropertyId as P;

        let groups: [(AppTag, &[PropertyId]); 6] = [
            (
                AppTag::CharacterString,
                &[
                    P::ApplicationSoftwareVersion,
                    P::Description,
                    P::DeviceType,
                    P::FirmwareRevision,
                    P::Location,
                    P::ModelName,
                    P::ObjectName,
                    P::VendorName,
                ],
            ),
            (
                AppTag::UnsignedInt,
                &[
                    P::ApduTimeout,
                    P::DatabaseRevision,
                    P::MaxApduLengthAccepted,
                    P::NumberOfApduRetries,
                    P::ProtocolRevision,
                    P::ProtocolVersion,
                    P::VendorIdentifier,
                ],
            ),
            (AppTag::OctetString, &[P::DeviceAddressBinding]),
            (
                AppTag::Enumerated,
                &[
                    P::EventState,
                    P::ObjectType,
                    P::Polarity,
                    P::PropertyList,
                    P::Reliability,
                    P::SegmentationSupported,
                    P::SystemStatus,
                    P::Units,
                ],
            ),
            (AppTag::ObjectId, &[P::ObjectIdentifier, P::ObjectList]),
            (
                AppTag::BitString,
                &[
                    P::ProtocolObjectTypesSupported,
                    P::ProtocolServicesSupported,
                    P::StatusFlags,
                ],
            ),
        ];

        let mut map = Self::empty();
        for (tag, ids) in groups {
            for id in ids {
                map.insert(*id, tag);
            }
        }
        map.insert(P::OutOfService, AppTag::Boolean);
        map
    }

    pub fn get(&self, id: PropertyId) -> Option<AppTag> {
        self.tags.get(&id).copied()
    }

    pub fn insert(&mut self, id: PropertyId, tag: AppTag) -> Option<AppTag> {
        self.tags.insert(id, tag)
    }

    pub fn with(mut self, id: PropertyId, tag: AppTag) -> Self {
        self.insert(id, tag);
        self
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::PropertyTypeMap;
    use rustbac_core::types::{AppTag, PropertyId};

    #[test]
    fn standard_entries() {
        let map = PropertyTypeMap::standard();
        assert_eq!(map.get(PropertyId::ObjectName), Some(AppTag::CharacterString));
        assert_eq!(map.get(PropertyId::VendorIdentifier), Some(AppTag::UnsignedInt));
        assert_eq!(map.get(PropertyId::DeviceAddressBinding), Some(AppTag::OctetString));
        assert_eq!(map.get(PropertyId::StatusFlags), Some(AppTag::BitString));
        assert_eq!(map.get(PropertyId::OutOfService), Some(AppTag::Boolean));
        assert_eq!(map.get(PropertyId::PresentValue), None);
    }

    #[test]
    fn custom_entries_override() {
        let map = PropertyTypeMap::standard().with(PropertyId::PresentValue, AppTag::Real);
        assert_eq!(map.get(PropertyId::PresentValue), Some(AppTag::Real));
    }
}
