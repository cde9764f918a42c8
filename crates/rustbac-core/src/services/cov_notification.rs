use crate::types::{DataValue, ObjectId, PropertyId};
use alloc::vec::Vec;

pub const SERVICE_CONFIRMED_COV_NOTIFICATION: u8 = 0x01;

/// One changed property inside a notification bundle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovPropertyValue {
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: Vec<DataValue>,
    pub priority: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovNotificationRequest {
    pub subscriber_process_id: u32,
    pub initiating_device_id: ObjectId,
    pub monitored_object_id: ObjectId,
    pub time_remaining_seconds: u32,
    pub values: Vec<CovPropertyValue>,
}

impl CovNotificationRequest {
    pub fn value_of(&self, property_id: PropertyId) -> Option<&[DataValue]> {
        self.values
            .iter()
            .find(|v| v.property_id == property_id)
            .map(|v| v.value.as_slice())
    }
}
