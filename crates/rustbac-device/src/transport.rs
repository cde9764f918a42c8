use crate::address::PeerAddress;
use crate::error::{ServiceError, TransportError};
use rustbac_core::services::cov_notification::CovNotificationRequest;
use rustbac_core::services::i_am::IAmRequest;
use rustbac_core::services::read_property::ReadPropertyAck;
use rustbac_core::services::read_property_multiple::ReadPropertyMultipleAck;
use rustbac_core::types::{ErrorClass, ErrorCode};
use std::time::Duration;
use tokio::sync::mpsc;

/// Round-trip timeout used when a transport has no other setting.
pub const DEFAULT_APDU_TIMEOUT: Duration = Duration::from_secs(3);

/// BVLC result codes a device answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum BvlcResultCode {
    Successful = 0x0000,
}

impl BvlcResultCode {
    pub const fn to_u16(self) -> u16 {
        self as u16
    }
}

/// A structured message for the wire stack to encode and send.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outbound {
    Error {
        destination: PeerAddress,
        service_choice: u8,
        invoke_id: u8,
        error_class: ErrorClass,
        error_code: ErrorCode,
    },
    SimpleAck {
        destination: PeerAddress,
        service_choice: u8,
        invoke_id: u8,
    },
    ReadProperty {
        destination: PeerAddress,
        invoke_id: u8,
        ack: ReadPropertyAck,
    },
    ReadPropertyMultiple {
        destination: PeerAddress,
        invoke_id: u8,
        ack: ReadPropertyMultipleAck,
    },
    IAm {
        destination: PeerAddress,
        announcement: IAmRequest,
    },
    Result {
        destination: PeerAddress,
        result: BvlcResultCode,
    },
    ConfirmedCovNotification {
        destination: PeerAddress,
        invoke_id: u8,
        notification: CovNotificationRequest,
    },
}

impl Outbound {
    pub fn destination(&self) -> &PeerAddress {
        match self {
            Self::Error { destination, .. }
            | Self::SimpleAck { destination, .. }
            | Self::ReadProperty { destination, .. }
            | Self::ReadPropertyMultiple { destination, .. }
            | Self::IAm { destination, .. }
            | Self::Result { destination, .. }
            | Self::ConfirmedCovNotification { destination, .. } => destination,
        }
    }
}

/// The response side of the wire stack.
///
/// Implementors only provide [`send`](Self::send); the named response calls
/// build the matching [`Outbound`] message.
pub trait ServiceTransport {
    fn send(&mut self, message: Outbound) -> Result<(), TransportError>;

    /// The configured round-trip timeout, read live.
    fn apdu_timeout(&self) -> Duration;

    fn error_response(
        &mut self,
        destination: PeerAddress,
        service_choice: u8,
        invoke_id: u8,
        error: ServiceError,
    ) -> Result<(), TransportError> {
        self.send(Outbound::Error {
            destination,
            service_choice,
            invoke_id,
            error_class: error.error_class,
            error_code: error.error_code,
        })
    }

    fn simple_ack_response(
        &mut self,
        destination: PeerAddress,
        service_choice: u8,
        invoke_id: u8,
    ) -> Result<(), TransportError> {
        self.send(Outbound::SimpleAck {
            destination,
            service_choice,
            invoke_id,
        })
    }

    fn read_property_response(
        &mut self,
        destination: PeerAddress,
        invoke_id: u8,
        ack: ReadPropertyAck,
    ) -> Result<(), TransportError> {
        self.send(Outbound::ReadProperty {
            destination,
            invoke_id,
            ack,
        })
    }

    fn read_property_multiple_response(
        &mut self,
        destination: PeerAddress,
        invoke_id: u8,
        ack: ReadPropertyMultipleAck,
    ) -> Result<(), TransportError> {
        self.send(Outbound::ReadPropertyMultiple {
            destination,
            invoke_id,
            ack,
        })
    }

    fn i_am_response(
        &mut self,
        destination: PeerAddress,
        announcement: IAmRequest,
    ) -> Result<(), TransportError> {
        self.send(Outbound::IAm {
            destination,
            announcement,
        })
    }

    fn result_response(
        &mut self,
        destination: PeerAddress,
        result: BvlcResultCode,
    ) -> Result<(), TransportError> {
        self.send(Outbound::Result {
            destination,
            result,
        })
    }

    fn confirmed_cov_notification(
        &mut self,
        destination: PeerAddress,
        invoke_id: u8,
        notification: CovNotificationRequest,
    ) -> Result<(), TransportError> {
        self.send(Outbound::ConfirmedCovNotification {
            destination,
            invoke_id,
            notification,
        })
    }
}

/// Hands outbound messages to an I/O task over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Outbound>,
    apdu_timeout: Duration,
}

impl ChannelTransport {
    pub fn new(apdu_timeout: Duration) -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, apdu_timeout }, rx)
    }

    pub fn set_apdu_timeout(&mut self, apdu_timeout: Duration) {
        self.apdu_timeout = apdu_timeout;
    }
}

impl ServiceTransport for ChannelTransport {
    fn send(&mut self, message: Outbound) -> Result<(), TransportError> {
        self.tx.send(message).map_err(|_| TransportError::Closed)
    }

    fn apdu_timeout(&self) -> Duration {
        self.apdu_timeout
    }
}

/// Keeps every outbound message in memory.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    sent: Vec<Outbound>,
    apdu_timeout: Duration,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new(DEFAULT_APDU_TIMEOUT)
    }
}

impl RecordingTransport {
    pub fn new(apdu_timeout: Duration) -> Self {
        Self {
            sent: Vec::new(),
            apdu_timeout,
        }
    }

    pub fn sent(&self) -> &[Outbound] {
        &self.sent
    }

    /// Drains the recorded messages.
    pub fn take(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.sent)
    }

    pub fn set_apdu_timeout(&mut self, apdu_timeout: Duration) {
        self.apdu_timeout = apdu_timeout;
    }
}

impl ServiceTransport for RecordingTransport {
    fn send(&mut self, message: Outbound) -> Result<(), TransportError> {
        self.sent.push(message);
        Ok(())
    }

    fn apdu_timeout(&self) -> Duration {
        self.apdu_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::DataLinkAddress;

    fn peer() -> PeerAddress {
        PeerAddress::direct(DataLinkAddress::Ip("10.0.0.9:47808".parse().unwrap()))
    }

    #[test]
    fn named_calls_build_messages() {
        let mut t = RecordingTransport::default();
        t.simple_ack_response(peer(), 5, 9).unwrap();
        t.error_response(peer(), 12, 3, ServiceError::unknown_object())
            .unwrap();
        let sent = t.take();
        assert_eq!(
            sent[0],
            Outbound::SimpleAck {
                destination: peer(),
                service_choice: 5,
                invoke_id: 9
            }
        );
        assert!(matches!(
            sent[1],
            Outbound::Error {
                error_code: ErrorCode::UnknownObject,
                ..
            }
        ));
        assert!(t.sent().is_empty());
    }

    #[tokio::test]
    async fn channel_forwards_until_closed() {
        let (mut t, mut rx) = ChannelTransport::new(Duration::from_millis(500));
        assert_eq!(t.apdu_timeout(), Duration::from_millis(500));
        t.result_response(peer(), BvlcResultCode::Successful).unwrap();
        let got = rx.recv().await.unwrap();
        assert_eq!(got.destination(), &peer());
        drop(rx);
        assert_eq!(
            t.result_response(peer(), BvlcResultCode::Successful),
            Err(TransportError::Closed)
        );
    }
}
