use crate::address::PeerAddress;
use rustbac_core::services::read_property::ReadPropertyRequest;
use rustbac_core::services::read_property_multiple::ReadPropertyMultipleRequest;
use rustbac_core::services::subscribe_cov::SubscribeCovRequest;
use rustbac_core::services::subscribe_cov_property::SubscribeCovPropertyRequest;
use rustbac_core::services::who_is::WhoIsRequest;

/// Addressing and transaction details of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestHeader {
    pub sender: PeerAddress,
    pub expects_reply: bool,
    pub invoke_id: u8,
    pub confirmed: bool,
}

impl RequestHeader {
    pub const fn confirmed(sender: PeerAddress, invoke_id: u8) -> Self {
        Self {
            sender,
            expects_reply: true,
            invoke_id,
            confirmed: true,
        }
    }

    pub const fn unconfirmed(sender: PeerAddress) -> Self {
        Self {
            sender,
            expects_reply: false,
            invoke_id: 0,
            confirmed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ServiceRequest {
    WhoIs(WhoIsRequest),
    RegisterForeignDevice { ttl_seconds: u16 },
    ReadProperty(ReadPropertyRequest),
    ReadPropertyMultiple(ReadPropertyMultipleRequest),
    SubscribeCov(SubscribeCovRequest),
    SubscribeCovProperty(SubscribeCovPropertyRequest),
    /// A service this device does not implement.
    Unrecognized { service_choice: u8 },
}

impl ServiceRequest {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WhoIs(_) => "who-is",
            Self::RegisterForeignDevice { .. } => "register-foreign-device",
            Self::ReadProperty(_) => "read-property",
            Self::ReadPropertyMultiple(_) => "read-property-multiple",
            Self::SubscribeCov(_) => "subscribe-cov",
            Self::SubscribeCovProperty(_) => "subscribe-cov-property",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// One decoded inbound request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceEvent {
    pub header: RequestHeader,
    pub request: ServiceRequest,
}

impl ServiceEvent {
    pub const fn new(header: RequestHeader, request: ServiceRequest) -> Self {
        Self { header, request }
    }
}
