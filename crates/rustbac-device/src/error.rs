use rustbac_core::types::{ErrorClass, ErrorCode, ObjectId, ObjectType, PropertyId};
use rustbac_core::EncodeError;
use thiserror::Error;

/// Errors raised while building or mutating the object model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("property {0} is read-only")]
    ReadOnly(PropertyId),
    #[error("property {0} is generated on the fly and cannot be stored")]
    DynamicProperty(PropertyId),
    #[error("no default application tag for property {0}")]
    NoDefaultType(PropertyId),
    #[error("object instance {0} is outside 0..=4194302")]
    InvalidInstance(u32),
    #[error("object type {0} is not recognized")]
    UnsupportedObjectType(ObjectType),
    #[error("object {0} already exists")]
    DuplicateObject(ObjectId),
}

/// Errors in the device configuration, raised at construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("device name must not be empty")]
    MissingName,
    #[error("device instance {0} is outside 0..=4194302")]
    InstanceOutOfRange(u32),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error("transport rejected message: {0}")]
    Rejected(String),
}

/// A protocol error pair returned to the requester.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("service error {error_class:?}/{error_code:?}")]
pub struct ServiceError {
    pub error_class: ErrorClass,
    pub error_code: ErrorCode,
}

impl ServiceError {
    pub const fn new(error_class: ErrorClass, error_code: ErrorCode) -> Self {
        Self {
            error_class,
            error_code,
        }
    }

    pub const fn unknown_object() -> Self {
        Self::new(ErrorClass::Object, ErrorCode::UnknownObject)
    }

    pub const fn unknown_property() -> Self {
        Self::new(ErrorClass::Property, ErrorCode::UnknownProperty)
    }

    pub const fn invalid_array_index() -> Self {
        Self::new(ErrorClass::Property, ErrorCode::InvalidArrayIndex)
    }

    pub const fn optional_functionality_not_supported() -> Self {
        Self::new(ErrorClass::Object, ErrorCode::OptionalFunctionalityNotSupported)
    }

    pub const fn not_cov_property() -> Self {
        Self::new(ErrorClass::Property, ErrorCode::NotCovProperty)
    }

    pub const fn unrecognized_service() -> Self {
        Self::new(ErrorClass::Services, ErrorCode::RejectUnrecognizedService)
    }
}

/// Outcome of reading a property: a protocol error for the requester, or a
/// local encoding defect.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    #[error("object {object_id} has no property {property_id}")]
    UnknownProperty {
        object_id: ObjectId,
        property_id: PropertyId,
    },
    #[error("change cascade exceeded depth {depth}")]
    CascadeTooDeep { depth: usize },
}
