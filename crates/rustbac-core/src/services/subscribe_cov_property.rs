use crate::services::read_property_multiple::PropertyReference;
use crate::types::ObjectId;

pub const SERVICE_SUBSCRIBE_COV_PROPERTY: u8 = 0x1C;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovPropertyRequest {
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    pub issue_confirmed_notifications: Option<bool>,
    pub lifetime_seconds: Option<u32>,
    pub monitored_property: PropertyReference,
    pub cov_increment: Option<f32>,
}

impl SubscribeCovPropertyRequest {
    pub const fn is_cancellation(&self) -> bool {
        super::is_cancellation(self.lifetime_seconds)
    }

    /// Only confirmed delivery is offered for property subscriptions.
    pub const fn wants_confirmed(&self) -> bool {
        matches!(self.issue_confirmed_notifications, Some(true))
    }
}
