use crate::types::{DataValue, ErrorClass, ErrorCode, ObjectId, PropertyId};
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY_MULTIPLE: u8 = 0x0E;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyReference {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

impl PropertyReference {
    pub const fn whole(property_id: PropertyId) -> Self {
        Self {
            property_id,
            array_index: None,
        }
    }
}

/// One object and the properties requested from it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadAccessSpecification {
    pub object_id: ObjectId,
    pub properties: Vec<PropertyReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyMultipleRequest {
    pub specs: Vec<ReadAccessSpecification>,
}

/// Outcome of reading one property inside a bulk read.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReadResult {
    Value(Vec<DataValue>),
    Error {
        error_class: ErrorClass,
        error_code: ErrorCode,
    },
}

impl ReadResult {
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadResultElement {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub result: ReadResult,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadAccessResult {
    pub object_id: ObjectId,
    pub results: Vec<ReadResultElement>,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyMultipleAck {
    pub results: Vec<ReadAccessResult>,
}

impl ReadPropertyMultipleAck {
    pub fn result_for(&self, object_id: ObjectId) -> Option<&ReadAccessResult> {
        self.results.iter().find(|r| r.object_id == object_id)
    }
}
