use crate::address::{DataLinkAddress, PeerAddress};
use rustbac_core::services::read_property_multiple::PropertyReference;
use rustbac_core::types::ObjectId;
use std::time::Duration;

/// One change-of-value subscriber.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovSubscription {
    pub subscriber: PeerAddress,
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    /// Set for property-level subscriptions.
    pub monitored_property: Option<PropertyReference>,
    pub issue_confirmed_notifications: bool,
    pub time_remaining: Duration,
    /// Reused for every confirmed notification sent to this subscriber.
    pub invoke_id: u8,
}

impl CovSubscription {
    pub fn key(&self) -> (DataLinkAddress, u32) {
        (self.subscriber.address, self.subscriber_process_id)
    }

    pub fn time_remaining_seconds(&self) -> u32 {
        u32::try_from(self.time_remaining.as_secs()).unwrap_or(u32::MAX)
    }

    pub fn is_expired(&self) -> bool {
        self.time_remaining.is_zero()
    }
}

/// What [`SubscriptionList::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionChange {
    Added,
    Replaced,
    Removed,
    NotFound,
}

impl SubscriptionChange {
    /// Replacing an existing entry counts as a new subscription.
    pub const fn is_addition(self) -> bool {
        matches!(self, Self::Added | Self::Replaced)
    }
}

/// Subscribers of one object or one property, unique by
/// `(subscriber address, process id)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionList {
    entries: Vec<CovSubscription>,
}

impl SubscriptionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds, replaces or removes the entry keyed like `subscription`.
    /// A zero lifetime removes. Expired entries are swept first.
    pub fn apply(&mut self, subscription: CovSubscription) -> SubscriptionChange {
        self.sweep();
        let key = subscription.key();
        let existing = self.entries.iter().position(|s| s.key() == key);
        match (existing, subscription.is_expired()) {
            (Some(pos), true) => {
                self.entries.remove(pos);
                SubscriptionChange::Removed
            }
            (None, true) => SubscriptionChange::NotFound,
            (Some(pos), false) => {
                self.entries[pos] = subscription;
                SubscriptionChange::Replaced
            }
            (None, false) => {
                self.entries.push(subscription);
                SubscriptionChange::Added
            }
        }
    }

    /// Drops entries whose lifetime has run out. Returns how many went.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|s| !s.is_expired());
        before - self.entries.len()
    }

    /// Ages every entry by `elapsed`, then sweeps.
    pub fn expire(&mut self, elapsed: Duration) -> usize {
        for entry in &mut self.entries {
            entry.time_remaining = entry.time_remaining.saturating_sub(elapsed);
        }
        self.sweep()
    }

    pub fn get(&self, address: DataLinkAddress, subscriber_process_id: u32) -> Option<&CovSubscription> {
        self.entries
            .iter()
            .find(|s| s.key() == (address, subscriber_process_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CovSubscription> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rustbac_core::types::ObjectType;

    fn peer(port: u16) -> PeerAddress {
        PeerAddress::direct(DataLinkAddress::Ip(
            format!("10.0.0.2:{port}").parse().unwrap(),
        ))
    }

    fn sub(port: u16, pid: u32, secs: u64) -> CovSubscription {
        CovSubscription {
            subscriber: peer(port),
            subscriber_process_id: pid,
            monitored_object_id: ObjectId::new(ObjectType::AnalogInput, 1),
            monitored_property: None,
            issue_confirmed_notifications: true,
            time_remaining: Duration::from_secs(secs),
            invoke_id: 1,
        }
    }

    #[test]
    fn same_key_replaces() {
        let mut list = SubscriptionList::new();
        assert_eq!(list.apply(sub(47808, 1, 60)), SubscriptionChange::Added);
        assert_eq!(list.apply(sub(47808, 1, 120)), SubscriptionChange::Replaced);
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.iter().next().unwrap().time_remaining,
            Duration::from_secs(120)
        );
    }

    #[test]
    fn zero_lifetime_removes() {
        let mut list = SubscriptionList::new();
        list.apply(sub(47808, 1, 60));
        assert_eq!(list.apply(sub(47808, 1, 0)), SubscriptionChange::Removed);
        assert!(list.is_empty());
        assert_eq!(list.apply(sub(47808, 1, 0)), SubscriptionChange::NotFound);
        assert!(!SubscriptionChange::NotFound.is_addition());
    }

    #[test]
    fn expire_ages_and_drops() {
        let mut list = SubscriptionList::new();
        list.apply(sub(47808, 1, 5));
        list.apply(sub(47808, 2, 60));
        assert_eq!(list.expire(Duration::from_secs(10)), 1);
        assert_eq!(list.len(), 1);
        let left = list.get(peer(47808).address, 2).unwrap();
        assert_eq!(left.time_remaining_seconds(), 50);
    }

    proptest! {
        #[test]
        fn at_most_one_entry_per_key(ops in proptest::collection::vec((0u16..3, 0u32..3, 0u64..3), 0..40)) {
            let mut list = SubscriptionList::new();
            for (port, pid, secs) in ops {
                list.apply(sub(47808 + port, pid, secs));
            }
            let mut keys: Vec<_> = list.iter().map(|s| s.key()).collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), total);
            prop_assert!(list.iter().all(|s| !s.is_expired()));
        }
    }
}
