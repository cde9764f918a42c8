use core::fmt;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataLinkAddress {
    Ip(SocketAddr),
}

impl DataLinkAddress {
    pub const BACNET_IP_DEFAULT_PORT: u16 = 47808;

    pub fn new(addr: IpAddr, port: u16) -> Self {
        Self::Ip(SocketAddr::new(addr, port))
    }

    pub fn bacnet_default(addr: IpAddr) -> Self {
        Self::new(addr, Self::BACNET_IP_DEFAULT_PORT)
    }

    pub fn as_socket_addr(self) -> SocketAddr {
        match self {
            Self::Ip(addr) => addr,
        }
    }
}

impl fmt::Display for DataLinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(addr) => write!(f, "{addr}"),
        }
    }
}

/// Where a request came from, and the broadcast relay that forwarded it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerAddress {
    pub address: DataLinkAddress,
    #[cfg_attr(feature = "serde", serde(default))]
    pub forwarded_from: Option<DataLinkAddress>,
}

impl PeerAddress {
    pub const fn direct(address: DataLinkAddress) -> Self {
        Self {
            address,
            forwarded_from: None,
        }
    }

    pub const fn forwarded(address: DataLinkAddress, relay: DataLinkAddress) -> Self {
        Self {
            address,
            forwarded_from: Some(relay),
        }
    }

    pub const fn is_forwarded(&self) -> bool {
        self.forwarded_from.is_some()
    }

    /// The same peer with the relay marker removed, so replies go straight to it.
    pub const fn stripped(self) -> Self {
        Self::direct(self.address)
    }

    /// The same peer with `relay` recorded as the forwarding relay.
    pub const fn relayed_by(self, relay: DataLinkAddress) -> Self {
        Self::forwarded(self.address, relay)
    }
}

impl From<DataLinkAddress> for PeerAddress {
    fn from(address: DataLinkAddress) -> Self {
        Self::direct(address)
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.forwarded_from {
            Some(relay) => write!(f, "{} via {relay}", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> DataLinkAddress {
        DataLinkAddress::Ip(s.parse().unwrap())
    }

    #[test]
    fn strip_and_relay() {
        let peer = PeerAddress::forwarded(addr("10.0.0.5:47808"), addr("10.0.0.1:47808"));
        assert!(peer.is_forwarded());
        assert_eq!(peer.stripped(), PeerAddress::direct(addr("10.0.0.5:47808")));
        let own = addr("192.168.1.10:47808");
        assert_eq!(peer.relayed_by(own).forwarded_from, Some(own));
        assert_eq!(peer.to_string(), "10.0.0.5:47808 via 10.0.0.1:47808");
    }

    #[test]
    fn default_port() {
        let a = DataLinkAddress::bacnet_default("127.0.0.1".parse().unwrap());
        assert_eq!(a.as_socket_addr().port(), 47808);
    }
}
