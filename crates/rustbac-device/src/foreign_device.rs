use crate::address::DataLinkAddress;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignDeviceTableEntry {
    pub address: DataLinkAddress,
    pub ttl_seconds: u16,
}

/// Foreign devices that registered with this device. Entries are recorded
/// with the requested time-to-live and never purged.
#[derive(Debug, Clone, Default)]
pub struct ForeignDeviceTable {
    entries: BTreeMap<DataLinkAddress, u16>,
}

impl ForeignDeviceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or refreshes a registration, returning the previous TTL.
    pub fn register(&mut self, address: DataLinkAddress, ttl_seconds: u16) -> Option<u16> {
        self.entries.insert(address, ttl_seconds)
    }

    pub fn ttl(&self, address: DataLinkAddress) -> Option<u16> {
        self.entries.get(&address).copied()
    }

    pub fn entries(&self) -> Vec<ForeignDeviceTableEntry> {
        self.entries
            .iter()
            .map(|(address, ttl_seconds)| ForeignDeviceTableEntry {
                address: *address,
                ttl_seconds: *ttl_seconds,
            })
            .collect()
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

    #[test]
    fn reregistration_refreshes_ttl() {
        let a = DataLinkAddress::Ip("10.1.1.1:47808".parse().unwrap());
        let mut table = ForeignDeviceTable::new();
        assert_eq!(table.register(a, 60), None);
        assert_eq!(table.register(a, 300), Some(60));
        assert_eq!(table.ttl(a), Some(300));
        assert_eq!(
            table.entries(),
            vec![ForeignDeviceTableEntry {
                address: a,
                ttl_seconds: 300
            }]
        );
    }
}
