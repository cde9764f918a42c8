use crate::types::ObjectId;

pub const SERVICE_SUBSCRIBE_COV: u8 = 0x05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovRequest {
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    pub issue_confirmed_notifications: Option<bool>,
    pub lifetime_seconds: Option<u32>,
}

impl SubscribeCovRequest {
    /// Absent or zero lifetime removes the subscription.
    pub const fn is_cancellation(&self) -> bool {
        super::is_cancellation(self.lifetime_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::SubscribeCovRequest;
    use crate::types::{ObjectId, ObjectType};

    fn request(lifetime_seconds: Option<u32>) -> SubscribeCovRequest {
        SubscribeCovRequest {
            subscriber_process_id: 7,
            monitored_object_id: ObjectId::new(ObjectType::AnalogInput, 1),
            issue_confirmed_notifications: Some(true),
            lifetime_seconds,
        }
    }

    #[test]
    fn zero_or_absent_lifetime_cancels() {
        assert!(request(None).is_cancellation());
        assert!(request(Some(0)).is_cancellation());
        assert!(!request(Some(60)).is_cancellation());
    }
}
