use crate::device::Device;
use crate::error::{DeviceError, ReadError, ServiceError};
use crate::service::{RequestHeader, ServiceEvent, ServiceRequest};
use crate::subscription::CovSubscription;
use crate::transport::{BvlcResultCode, ServiceTransport};
use rustbac_core::services::cov_notification::CovPropertyValue;
use rustbac_core::services::i_am::IAmRequest;
use rustbac_core::services::read_property::{ReadPropertyAck, ReadPropertyRequest, SERVICE_READ_PROPERTY};
use rustbac_core::services::read_property_multiple::{
    ReadAccessResult, ReadPropertyMultipleAck, ReadPropertyMultipleRequest, ReadResult,
    ReadResultElement,
};
use rustbac_core::services::subscribe_cov::{SubscribeCovRequest, SERVICE_SUBSCRIBE_COV};
use rustbac_core::services::subscribe_cov_property::{
    SubscribeCovPropertyRequest, SERVICE_SUBSCRIBE_COV_PROPERTY,
};
use rustbac_core::services::who_is::WhoIsRequest;
use rustbac_core::types::{DataValue, ObjectId, PropertyId};
use rustbac_core::EncodeError;
use std::time::Duration;

impl<T: ServiceTransport> Device<T> {
    /// Handles one inbound request to completion.
    ///
    /// Protocol failures are answered to the requester; an `Err` means a
    /// local defect or a transport failure.
    pub fn handle(&mut self, event: ServiceEvent) -> Result<(), DeviceError> {
        let ServiceEvent { header, request } = event;
        log::debug!(
            "{} from {} (invoke {})",
            request.name(),
            header.sender,
            header.invoke_id
        );
        match request {
            ServiceRequest::WhoIs(req) => self.handle_who_is(&header, &req),
            ServiceRequest::RegisterForeignDevice { ttl_seconds } => {
                self.handle_register_foreign_device(&header, ttl_seconds)
            }
            ServiceRequest::ReadProperty(req) => self.handle_read_property(&header, &req),
            ServiceRequest::ReadPropertyMultiple(req) => {
                self.handle_read_property_multiple(&header, &req)
            }
            ServiceRequest::SubscribeCov(req) => self.handle_subscribe_cov(&header, &req),
            ServiceRequest::SubscribeCovProperty(req) => {
                self.handle_subscribe_cov_property(&header, &req)
            }
            ServiceRequest::Unrecognized { service_choice } => {
                self.handle_unrecognized(&header, service_choice)
            }
        }
    }

    fn handle_who_is(&mut self, header: &RequestHeader, req: &WhoIsRequest) -> Result<(), DeviceError> {
        if !req.matches(self.instance()) {
            return Ok(());
        }
        let announcement = IAmRequest {
            device_id: self.id(),
            max_apdu: self.config.max_apdu_length_accepted,
            segmentation: self.config.segmentation,
            vendor_id: self.config.vendor_id,
        };
        // Answer the originator directly rather than through the relay.
        self.transport
            .i_am_response(header.sender.stripped(), announcement)?;
        Ok(())
    }

    fn handle_register_foreign_device(
        &mut self,
        header: &RequestHeader,
        ttl_seconds: u16,
    ) -> Result<(), DeviceError> {
        let previous = self
            .foreign_devices
            .register(header.sender.address, ttl_seconds);
        log::info!(
            "foreign device {} registered for {ttl_seconds}s{}",
            header.sender.address,
            if previous.is_some() { " (renewed)" } else { "" }
        );
        self.transport
            .result_response(header.sender, BvlcResultCode::Successful)?;
        Ok(())
    }

    /// A device read of the wildcard instance means "this device".
    fn resolve_wildcard(&self, object_id: ObjectId) -> ObjectId {
        if object_id.is_device_wildcard() {
            self.id()
        } else {
            object_id
        }
    }

    fn handle_read_property(
        &mut self,
        header: &RequestHeader,
        req: &ReadPropertyRequest,
    ) -> Result<(), DeviceError> {
        let object_id = self.resolve_wildcard(req.object_id);
        match self.read_value(object_id, req.property_id, req.array_index) {
            Ok(values) => {
                let ack = ReadPropertyAck {
                    object_id,
                    property_id: req.property_id,
                    array_index: req.array_index,
                    values,
                };
                self.transport
                    .read_property_response(header.sender, header.invoke_id, ack)?;
            }
            Err(ReadError::Service(error)) => {
                self.transport.error_response(
                    header.sender,
                    SERVICE_READ_PROPERTY,
                    header.invoke_id,
                    error,
                )?;
            }
            Err(ReadError::Encode(e)) => return Err(e.into()),
        }
        Ok(())
    }

    fn handle_read_property_multiple(
        &mut self,
        header: &RequestHeader,
        req: &ReadPropertyMultipleRequest,
    ) -> Result<(), DeviceError> {
        let mut ack = ReadPropertyMultipleAck::default();
        for spec in &req.specs {
            let object_id = self.resolve_wildcard(spec.object_id);
            let mut results = Vec::new();
            match self.root.find_object(object_id) {
                None => {
                    for reference in &spec.properties {
                        results.push(error_element(
                            reference.property_id,
                            reference.array_index,
                            ServiceError::unknown_object(),
                        ));
                    }
                }
                Some(object) => {
                    for reference in &spec.properties {
                        if reference.property_id == PropertyId::All {
                            for property_id in object.all_property_ids() {
                                if property_id == PropertyId::PropertyList {
                                    continue;
                                }
                                results.push(self.read_element(object_id, property_id, None)?);
                            }
                        } else {
                            results.push(self.read_element(
                                object_id,
                                reference.property_id,
                                reference.array_index,
                            )?);
                        }
                    }
                }
            }
            ack.results.push(ReadAccessResult { object_id, results });
        }
        self.transport
            .read_property_multiple_response(header.sender, header.invoke_id, ack)?;
        Ok(())
    }

    /// One bulk-read item. Protocol errors are embedded; encoding defects abort.
    fn read_element(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        array_index: Option<u32>,
    ) -> Result<ReadResultElement, EncodeError> {
        match self.read_value(object_id, property_id, array_index) {
            Ok(values) => Ok(ReadResultElement {
                property_id,
                array_index,
                result: ReadResult::Value(values),
            }),
            Err(ReadError::Service(error)) => Ok(error_element(property_id, array_index, error)),
            Err(ReadError::Encode(e)) => Err(e),
        }
    }

    fn handle_subscribe_cov(
        &mut self,
        header: &RequestHeader,
        req: &SubscribeCovRequest,
    ) -> Result<(), DeviceError> {
        let subscription = CovSubscription {
            subscriber: header.sender,
            subscriber_process_id: req.subscriber_process_id,
            monitored_object_id: req.monitored_object_id,
            monitored_property: None,
            issue_confirmed_notifications: req.issue_confirmed_notifications.unwrap_or(true),
            time_remaining: lifetime(req.lifetime_seconds),
            invoke_id: header.invoke_id,
        };

        let Some(object) = self.root.find_object_mut(req.monitored_object_id) else {
            self.transport.error_response(
                header.sender,
                SERVICE_SUBSCRIBE_COV,
                header.invoke_id,
                ServiceError::unknown_object(),
            )?;
            return Ok(());
        };
        // The initial sample carries every stored value of the object. It is
        // built before anything is committed so an encoding failure leaves no
        // subscription behind.
        let initial = if req.is_cancellation() {
            None
        } else {
            Some(
                object
                    .stored_properties()
                    .filter(|p| p.value().is_some())
                    .map(|p| {
                        Ok(CovPropertyValue {
                            property_id: p.id(),
                            array_index: None,
                            value: p.encode()?,
                            priority: None,
                        })
                    })
                    .collect::<Result<Vec<_>, EncodeError>>()?,
            )
        };
        let change = object.subscriptions_mut().apply(subscription.clone());
        log::info!(
            "cov subscription {change:?}: {} process {} on {}",
            header.sender,
            req.subscriber_process_id,
            req.monitored_object_id
        );

        self.transport
            .simple_ack_response(header.sender, SERVICE_SUBSCRIBE_COV, header.invoke_id)?;
        if let Some(values) = initial.filter(|_| change.is_addition()) {
            self.notify(&subscription, values);
        }
        Ok(())
    }

    fn handle_subscribe_cov_property(
        &mut self,
        header: &RequestHeader,
        req: &SubscribeCovPropertyRequest,
    ) -> Result<(), DeviceError> {
        let property_id = req.monitored_property.property_id;
        let (subscription, initial) = match self.subscribe_property(header, req) {
            Ok(accepted) => accepted,
            Err(ReadError::Service(error)) => {
                self.transport.error_response(
                    header.sender,
                    SERVICE_SUBSCRIBE_COV_PROPERTY,
                    header.invoke_id,
                    error,
                )?;
                return Ok(());
            }
            Err(ReadError::Encode(e)) => return Err(e.into()),
        };

        self.transport.simple_ack_response(
            header.sender,
            SERVICE_SUBSCRIBE_COV_PROPERTY,
            header.invoke_id,
        )?;
        if let Some(value) = initial {
            let bundle = vec![CovPropertyValue {
                property_id,
                array_index: None,
                value,
                priority: None,
            }];
            self.notify(&subscription, bundle);
        }
        Ok(())
    }

    /// Validates and applies a property subscription. On success returns the
    /// subscription and, for additions, the encoded current value. Nothing is
    /// committed when the value cannot be encoded.
    fn subscribe_property(
        &mut self,
        header: &RequestHeader,
        req: &SubscribeCovPropertyRequest,
    ) -> Result<(CovSubscription, Option<Vec<DataValue>>), ReadError> {
        if !req.is_cancellation() && !req.wants_confirmed() {
            return Err(ServiceError::optional_functionality_not_supported().into());
        }
        let property_id = req.monitored_property.property_id;
        let object = self
            .root
            .find_object_mut(req.monitored_object_id)
            .ok_or(ServiceError::unknown_object())?;
        if object.is_dynamic(property_id) {
            return Err(ServiceError::not_cov_property().into());
        }
        let property = object
            .property_mut(property_id)
            .ok_or(ServiceError::unknown_property())?;

        let initial = if req.is_cancellation() {
            None
        } else {
            Some(property.encode()?)
        };
        let subscription = CovSubscription {
            subscriber: header.sender,
            subscriber_process_id: req.subscriber_process_id,
            monitored_object_id: req.monitored_object_id,
            monitored_property: Some(req.monitored_property),
            issue_confirmed_notifications: true,
            time_remaining: lifetime(req.lifetime_seconds),
            invoke_id: header.invoke_id,
        };
        let change = property.subscriptions_mut().apply(subscription.clone());
        log::info!(
            "cov property subscription {change:?}: {} process {} on {} {}",
            header.sender,
            req.subscriber_process_id,
            req.monitored_object_id,
            property_id
        );
        Ok((subscription, initial.filter(|_| change.is_addition())))
    }

    fn handle_unrecognized(&mut self, header: &RequestHeader, service_choice: u8) -> Result<(), DeviceError> {
        if !header.expects_reply {
            log::debug!("ignoring unrecognized service {service_choice} from {}", header.sender);
            return Ok(());
        }
        // A relayed request is answered as the relay itself, so the
        // originator keeps seeing a live device.
        let destination = if header.sender.is_forwarded() {
            header.sender.relayed_by(self.address)
        } else {
            header.sender
        };
        self.transport.error_response(
            destination,
            service_choice,
            header.invoke_id,
            ServiceError::unrecognized_service(),
        )?;
        Ok(())
    }
}

fn lifetime(seconds: Option<u32>) -> Duration {
    Duration::from_secs(u64::from(seconds.unwrap_or(0)))
}

fn error_element(
    property_id: PropertyId,
    array_index: Option<u32>,
    error: ServiceError,
) -> ReadResultElement {
    ReadResultElement {
        property_id,
        array_index,
        result: ReadResult::Error {
            error_class: error.error_class,
            error_code: error.error_code,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{DataLinkAddress, PeerAddress};
    use crate::config::DeviceConfig;
    use crate::transport::RecordingTransport;
    use rustbac_core::services::read_property_multiple::PropertyReference;
    use rustbac_core::types::{AppTag, ObjectType, PropertyValue};
    use std::net::{IpAddr, Ipv4Addr};

    /// Analog input 1 holds an octet string, which has no encoding yet.
    fn device_with_unencodable_value() -> (Device<RecordingTransport>, ObjectId) {
        let config = DeviceConfig::new(123, "Example device", 260, 1, IpAddr::V4(Ipv4Addr::LOCALHOST));
        let mut device = Device::new(config, RecordingTransport::default()).unwrap();
        let ai = device
            .add_object(1, ObjectType::AnalogInput, "Example value")
            .unwrap();
        ai.add_property(PropertyId::Description, Some(AppTag::OctetString))
            .unwrap()
            .store(PropertyValue::from(DataValue::OctetString(vec![0x01])))
            .unwrap();
        let id = ai.id();
        (device, id)
    }

    fn header() -> RequestHeader {
        let sender = DataLinkAddress::Ip("10.0.0.5:47808".parse().unwrap());
        RequestHeader::confirmed(PeerAddress::direct(sender), 9)
    }

    #[test]
    fn object_subscription_is_not_kept_when_initial_sample_fails() {
        let (mut device, ai) = device_with_unencodable_value();
        let request = ServiceRequest::SubscribeCov(SubscribeCovRequest {
            subscriber_process_id: 1,
            monitored_object_id: ai,
            issue_confirmed_notifications: Some(true),
            lifetime_seconds: Some(300),
        });

        let err = device.handle(ServiceEvent::new(header(), request)).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Encode(EncodeError::NotImplemented(AppTag::OctetString))
        ));
        assert!(device.object(ai).unwrap().subscriptions().is_empty());
        assert!(device.transport().sent().is_empty());
    }

    #[test]
    fn property_subscription_is_not_kept_when_initial_sample_fails() {
        let (mut device, ai) = device_with_unencodable_value();
        let request = ServiceRequest::SubscribeCovProperty(SubscribeCovPropertyRequest {
            subscriber_process_id: 1,
            monitored_object_id: ai,
            issue_confirmed_notifications: Some(true),
            lifetime_seconds: Some(300),
            monitored_property: PropertyReference::whole(PropertyId::Description),
            cov_increment: None,
        });

        let err = device.handle(ServiceEvent::new(header(), request)).unwrap_err();
        assert!(matches!(err, DeviceError::Encode(_)));
        let description = device
            .get_property(ai, PropertyId::Description)
            .unwrap();
        assert!(description.subscriptions().is_empty());
        assert!(device.transport().sent().is_empty());
    }

    #[test]
    fn cancelling_needs_no_initial_sample() {
        let (mut device, ai) = device_with_unencodable_value();
        let request = ServiceRequest::SubscribeCov(SubscribeCovRequest {
            subscriber_process_id: 1,
            monitored_object_id: ai,
            issue_confirmed_notifications: None,
            lifetime_seconds: None,
        });

        device.handle(ServiceEvent::new(header(), request)).unwrap();
        assert_eq!(device.transport().sent().len(), 1);
    }
}
