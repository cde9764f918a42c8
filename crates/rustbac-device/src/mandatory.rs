use rustbac_core::types::{ObjectType, PropertyId};

use PropertyId as P;

const ANALOG: &[PropertyId] = &[
    P::PresentValue,
    P::StatusFlags,
    P::EventState,
    P::OutOfService,
    P::Units,
];

const BINARY_INPUT: &[PropertyId] = &[
    P::PresentValue,
    P::StatusFlags,
    P::EventState,
    P::OutOfService,
    P::Polarity,
];

const BINARY_VALUE: &[PropertyId] = &[
    P::PresentValue,
    P::StatusFlags,
    P::EventState,
    P::OutOfService,
];

const DEVICE: &[PropertyId] = &[
    P::SystemStatus,
    P::VendorName,
    P::VendorIdentifier,
    P::ModelName,
    P::FirmwareRevision,
    P::ApplicationSoftwareVersion,
    P::ProtocolVersion,
    P::ProtocolRevision,
    P::ProtocolServicesSupported,
    P::ProtocolObjectTypesSupported,
    P::ObjectList,
    P::MaxApduLengthAccepted,
    P::SegmentationSupported,
    P::ApduTimeout,
    P::NumberOfApduRetries,
    P::DeviceAddressBinding,
    P::DatabaseRevision,
];

/// Properties an object of `object_type` must expose, excluding the identity
/// properties every object has. `None` when no table is defined for the type.
pub fn mandatory_properties(object_type: ObjectType) -> Option<&'static [PropertyId]> {
    match object_type {
        ObjectType::AnalogInput | ObjectType::AnalogValue => Some(ANALOG),
        ObjectType::BinaryInput => Some(BINARY_INPUT),
        ObjectType::BinaryValue => Some(BINARY_VALUE),
        ObjectType::Device => Some(DEVICE),
        _ => None,
    }
}
