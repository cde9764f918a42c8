use crate::types::{DataValue, ObjectId, PropertyId};
use alloc::vec::Vec;

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

/// Array index sentinel meaning "the whole property".
pub const BACNET_ARRAY_ALL: u32 = u32::MAX;

/// Returns `true` when `array_index` selects the whole value.
pub const fn is_whole_value(array_index: Option<u32>) -> bool {
    matches!(array_index, None | Some(BACNET_ARRAY_ALL))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
}

/// Positive response: the requested value as tagged items.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyAck {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub values: Vec<DataValue>,
}
