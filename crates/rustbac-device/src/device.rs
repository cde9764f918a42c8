use crate::address::DataLinkAddress;
use crate::config::DeviceConfig;
use crate::error::{DeviceError, ModelError, ReadError, ServiceError};
use crate::foreign_device::ForeignDeviceTable;
use crate::object::{describe, Object, PropertyRef};
use crate::property::{Cascade, Property};
use crate::subscription::CovSubscription;
use crate::transport::ServiceTransport;
use crate::type_map::PropertyTypeMap;
use rustbac_core::services::cov_notification::{CovNotificationRequest, CovPropertyValue};
use rustbac_core::services::value_codec::encode_property_value;
use rustbac_core::types::{
    AppTag, BitString, DataValue, ObjectId, ObjectType, PropertyId, PropertyValue,
    ServicesSupported,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Deepest chain of callback-scheduled writes applied by one `set_value`.
pub const MAX_CASCADE_DEPTH: usize = 8;

pub const PROTOCOL_VERSION: u32 = 1;
pub const PROTOCOL_REVISION: u32 = 14;

/// Services listed in `PROTOCOL_SERVICES_SUPPORTED`.
pub const SUPPORTED_SERVICES: [ServicesSupported; 6] = [
    ServicesSupported::SubscribeCov,
    ServicesSupported::ReadProperty,
    ServicesSupported::ReadPropertyMultiple,
    ServicesSupported::IAm,
    ServicesSupported::WhoIs,
    ServicesSupported::SubscribeCovProperty,
];

const SYSTEM_STATUS_OPERATIONAL: u32 = 0;

/// A BACnet device: the root of the object tree and the service engine
/// answering requests through `T`.
#[derive(Debug)]
pub struct Device<T: ServiceTransport> {
    pub(crate) root: Object,
    pub(crate) config: DeviceConfig,
    pub(crate) address: DataLinkAddress,
    pub(crate) foreign_devices: ForeignDeviceTable,
    pub(crate) transport: T,
}

impl<T: ServiceTransport> Device<T> {
    pub fn new(config: DeviceConfig, transport: T) -> Result<Self, DeviceError> {
        Self::with_type_map(config, transport, Arc::new(PropertyTypeMap::standard()))
    }

    pub fn with_type_map(
        config: DeviceConfig,
        transport: T,
        types: Arc<PropertyTypeMap>,
    ) -> Result<Self, DeviceError> {
        config.validate()?;
        let id = ObjectId::new(ObjectType::Device, config.device_instance);
        let mut root = Object::new(id, &config.name, types)?;
        root.add_dynamic(PropertyId::ApduTimeout);
        root.insert_own_entry();
        store_device_defaults(&mut root, &config)?;

        Ok(Self {
            root,
            address: config.address(),
            config,
            foreign_devices: ForeignDeviceTable::new(),
            transport,
        })
    }

    pub fn id(&self) -> ObjectId {
        self.root.id()
    }

    pub fn instance(&self) -> u32 {
        self.root.instance()
    }

    /// The device's own network address.
    pub fn address(&self) -> DataLinkAddress {
        self.address
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn root(&self) -> &Object {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Object {
        &mut self.root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn foreign_devices(&self) -> &ForeignDeviceTable {
        &self.foreign_devices
    }

    /// Adds a direct child of the device object.
    pub fn add_object(
        &mut self,
        instance: u32,
        object_type: ObjectType,
        name: &str,
    ) -> Result<&mut Object, DeviceError> {
        let parent = self.id();
        self.add_object_under(parent, instance, object_type, name)
    }

    /// Adds a child below `parent`, which may sit anywhere in the tree.
    ///
    /// Identities are unique across the whole device, so an object can never
    /// be shadowed by an earlier one with the same identity elsewhere.
    pub fn add_object_under(
        &mut self,
        parent: ObjectId,
        instance: u32,
        object_type: ObjectType,
        name: &str,
    ) -> Result<&mut Object, DeviceError> {
        let id = ObjectId::new(object_type, instance);
        if instance <= ObjectId::MAX_INSTANCE && self.root.find_object(id).is_some() {
            return Err(ModelError::DuplicateObject(id).into());
        }
        let parent = self
            .root
            .find_object_mut(parent)
            .ok_or(DeviceError::UnknownObject(parent))?;
        Ok(parent.add_object(instance, object_type, name)?)
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.root.find_object(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.root.find_object_mut(id)
    }

    /// Resolves a property anywhere in the tree, including the live
    /// `APDU_TIMEOUT` of the device object.
    pub fn get_property(&self, object_id: ObjectId, property_id: PropertyId) -> Option<PropertyRef<'_>> {
        let object = self.root.find_object(object_id)?;
        self.resolve_property(object, property_id)
    }

    pub(crate) fn resolve_property<'a>(
        &self,
        object: &'a Object,
        property_id: PropertyId,
    ) -> Option<PropertyRef<'a>> {
        if object.id() == self.id() && property_id == PropertyId::ApduTimeout {
            let millis = u32::try_from(self.transport.apdu_timeout().as_millis()).unwrap_or(u32::MAX);
            return Some(PropertyRef::Computed(Property::computed(
                property_id,
                AppTag::UnsignedInt,
                PropertyValue::from(millis),
            )));
        }
        object.get_property(property_id)
    }

    /// Reads one property the way the read services do.
    pub(crate) fn read_value(
        &self,
        object_id: ObjectId,
        property_id: PropertyId,
        array_index: Option<u32>,
    ) -> Result<Vec<DataValue>, ReadError> {
        let object = self
            .root
            .find_object(object_id)
            .ok_or(ServiceError::unknown_object())?;
        let property = self
            .resolve_property(object, property_id)
            .ok_or(ServiceError::unknown_property())?;
        property.read(array_index)
    }

    /// Changes a stored property and notifies everyone watching it.
    ///
    /// Object-level subscribers are notified first, then property-level
    /// subscribers, then change callbacks run. Writes the callbacks schedule
    /// are applied the same way before this returns.
    pub fn set_value(
        &mut self,
        object_id: ObjectId,
        property_id: PropertyId,
        value: impl Into<PropertyValue>,
    ) -> Result<(), DeviceError> {
        self.apply_write(object_id, property_id, value.into(), 0)
    }

    fn apply_write(
        &mut self,
        object_id: ObjectId,
        property_id: PropertyId,
        value: PropertyValue,
        depth: usize,
    ) -> Result<(), DeviceError> {
        if depth >= MAX_CASCADE_DEPTH {
            return Err(DeviceError::CascadeTooDeep { depth });
        }
        let unknown_property = DeviceError::UnknownProperty {
            object_id,
            property_id,
        };

        let object = self
            .root
            .find_object_mut(object_id)
            .ok_or(DeviceError::UnknownObject(object_id))?;
        let mut recipients: Vec<CovSubscription> = object.subscriptions().iter().cloned().collect();
        let property = object.property_mut(property_id).ok_or(unknown_property)?;
        if property.is_read_only() {
            return Err(ModelError::ReadOnly(property_id).into());
        }
        // A value that cannot be encoded never replaces the current one.
        let encoded = encode_property_value(property.tag(), &value)?;
        property.store(value)?;
        recipients.extend(property.subscriptions().iter().cloned());

        let bundle = vec![CovPropertyValue {
            property_id,
            array_index: None,
            value: encoded,
            priority: None,
        }];
        for subscription in &recipients {
            self.notify(subscription, bundle.clone());
        }

        let mut cascade = Cascade::new();
        if let Some(property) = self
            .root
            .find_object_mut(object_id)
            .and_then(|object| object.property_mut(property_id))
        {
            property.run_callbacks(&mut cascade);
        }
        for write in cascade.into_writes() {
            self.apply_write(write.object_id, write.property_id, write.value, depth + 1)?;
        }
        Ok(())
    }

    /// Sends one confirmed notification. Delivery failures are logged only.
    pub(crate) fn notify(&mut self, subscription: &CovSubscription, values: Vec<CovPropertyValue>) {
        let notification = CovNotificationRequest {
            subscriber_process_id: subscription.subscriber_process_id,
            initiating_device_id: self.id(),
            monitored_object_id: subscription.monitored_object_id,
            time_remaining_seconds: subscription.time_remaining_seconds(),
            values,
        };
        if let Err(e) = self.transport.confirmed_cov_notification(
            subscription.subscriber,
            subscription.invoke_id,
            notification,
        ) {
            log::warn!(
                "failed to notify {} (process {}) about {}: {e}",
                subscription.subscriber,
                subscription.subscriber_process_id,
                subscription.monitored_object_id
            );
        }
    }

    /// Ages every subscription by `elapsed` and drops those that ran out.
    pub fn expire_subscriptions(&mut self, elapsed: Duration) -> usize {
        let expired = self.root.expire_subscriptions(elapsed);
        if expired > 0 {
            log::info!("{expired} cov subscription(s) expired");
        }
        expired
    }

    /// Every object's readable properties, keyed by object identity.
    pub fn dump_objects(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.root
            .object_ids()
            .into_iter()
            .filter_map(|id| {
                let object = self.root.find_object(id)?;
                let mut props = object.dump_properties();
                if id == self.id() {
                    if let Some(timeout) = self.resolve_property(object, PropertyId::ApduTimeout) {
                        props.insert(PropertyId::ApduTimeout.to_string(), describe(&timeout));
                    }
                }
                Some((id.to_string(), props))
            })
            .collect()
    }
}

fn store_device_defaults(root: &mut Object, config: &DeviceConfig) -> Result<(), DeviceError> {
    let text = |value: &Option<String>| PropertyValue::from(value.clone().unwrap_or_default());
    let services = SUPPORTED_SERVICES.map(|s| s.bit());

    let mut defaults = vec![
        (
            PropertyId::SystemStatus,
            PropertyValue::from(DataValue::Enumerated(SYSTEM_STATUS_OPERATIONAL)),
        ),
        (PropertyId::VendorName, text(&config.vendor_name)),
        (PropertyId::VendorIdentifier, PropertyValue::from(config.vendor_id)),
        (PropertyId::ModelName, text(&config.model_name)),
        (PropertyId::FirmwareRevision, text(&config.firmware_revision)),
        (
            PropertyId::ApplicationSoftwareVersion,
            text(&config.application_software_version),
        ),
        (PropertyId::ProtocolVersion, PropertyValue::from(PROTOCOL_VERSION)),
        (PropertyId::ProtocolRevision, PropertyValue::from(PROTOCOL_REVISION)),
        (
            PropertyId::ProtocolServicesSupported,
            PropertyValue::from(BitString::from_members(&services)),
        ),
        (
            PropertyId::MaxApduLengthAccepted,
            PropertyValue::from(config.max_apdu_length_accepted),
        ),
        (
            PropertyId::SegmentationSupported,
            PropertyValue::from(DataValue::Enumerated(config.segmentation.to_u32())),
        ),
        (
            PropertyId::NumberOfApduRetries,
            PropertyValue::from(config.number_of_apdu_retries),
        ),
        (PropertyId::DeviceAddressBinding, PropertyValue::List(Vec::new())),
        (
            PropertyId::DatabaseRevision,
            PropertyValue::from(config.database_revision),
        ),
    ];
    if let Some(description) = &config.description {
        defaults.push((PropertyId::Description, PropertyValue::from(description.as_str())));
    }
    if let Some(location) = &config.location {
        defaults.push((PropertyId::Location, PropertyValue::from(location.as_str())));
    }

    for (id, value) in defaults {
        root.add_property(id, None)?.store(value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Outbound, RecordingTransport};
    use rustbac_core::EncodeError;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Mutex;

    fn device() -> Device<RecordingTransport> {
        let config = DeviceConfig::new(123, "Example device", 260, 1, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Device::new(config, RecordingTransport::default()).unwrap()
    }

    fn ai(device: &mut Device<RecordingTransport>) -> ObjectId {
        let obj = device.add_object(1, ObjectType::AnalogInput, "Example value").unwrap();
        obj.add_property(PropertyId::PresentValue, Some(AppTag::Real))
            .unwrap();
        let id = obj.id();
        device.set_value(id, PropertyId::PresentValue, 1.0f32).unwrap();
        id
    }

    #[test]
    fn construction_validates_config() {
        let bad = DeviceConfig::new(4_194_303, "x", 1, 1, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(matches!(
            Device::new(bad, RecordingTransport::default()),
            Err(DeviceError::Config(_))
        ));
        let unnamed = DeviceConfig::new(1, "", 1, 1, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(matches!(
            Device::new(unnamed, RecordingTransport::default()),
            Err(DeviceError::Config(_))
        ));
    }

    #[test]
    fn device_has_no_missing_mandatory_properties() {
        let device = device();
        assert!(device.root().missing_mandatory_properties().is_empty());
        assert!(device.root().is_dynamic(PropertyId::ApduTimeout));
    }

    #[test]
    fn object_list_contains_device_once() {
        let mut device = device();
        let ai = ai(&mut device);
        assert_eq!(device.root().object_ids(), vec![ai, device.id()]);
    }

    #[test]
    fn apdu_timeout_is_live() {
        let mut device = device();
        let read = |d: &Device<RecordingTransport>| {
            d.get_property(d.id(), PropertyId::ApduTimeout)
                .unwrap()
                .encode()
                .unwrap()
        };
        assert_eq!(read(&device), vec![DataValue::Unsigned(3000)]);
        device
            .transport_mut()
            .set_apdu_timeout(Duration::from_millis(750));
        assert_eq!(read(&device), vec![DataValue::Unsigned(750)]);
    }

    #[test]
    fn services_supported_is_one_bit_string() {
        let device = device();
        let services = device
            .get_property(device.id(), PropertyId::ProtocolServicesSupported)
            .unwrap()
            .encode()
            .unwrap();
        assert_eq!(services.len(), 1);
        let DataValue::BitString(bits) = &services[0] else {
            panic!("expected bit string");
        };
        for service in SUPPORTED_SERVICES {
            assert!(bits.get(service.bit() as usize));
        }
        assert!(!bits.get(ServicesSupported::WriteProperty.bit() as usize));
    }

    #[test]
    fn set_value_on_read_only_fails_without_notifying() {
        let mut device = device();
        let ai = ai(&mut device);
        device
            .object_mut(ai)
            .unwrap()
            .property_mut(PropertyId::PresentValue)
            .unwrap()
            .set_read_only(true);
        let err = device.set_value(ai, PropertyId::PresentValue, 5.0f32).unwrap_err();
        assert!(matches!(err, DeviceError::Model(_)));
        assert!(device.transport().sent().is_empty());
        assert_eq!(
            device.get_property(ai, PropertyId::PresentValue).unwrap().value(),
            Some(&PropertyValue::from(1.0f32))
        );
    }

    #[test]
    fn mismatched_value_keeps_previous_value() {
        let mut device = device();
        let ai = ai(&mut device);
        let err = device
            .set_value(ai, PropertyId::PresentValue, "not a number")
            .unwrap_err();
        assert!(matches!(
            err,
            DeviceError::Encode(EncodeError::TypeMismatch { tag: AppTag::Real })
        ));
        let present = device.get_property(ai, PropertyId::PresentValue).unwrap();
        assert_eq!(present.value(), Some(&PropertyValue::from(1.0f32)));
        assert_eq!(present.encode().unwrap(), vec![DataValue::Real(1.0)]);
        assert!(device.transport().sent().is_empty());
    }

    #[test]
    fn identities_are_unique_across_the_tree() {
        let mut device = device();
        let view = device
            .add_object(1, ObjectType::StructuredView, "Floor 1")
            .unwrap()
            .id();
        let bv = device
            .add_object_under(view, 3, ObjectType::BinaryValue, "Occupied")
            .unwrap()
            .id();
        assert_eq!(device.object(bv).unwrap().name(), Some("Occupied"));

        let err = device
            .add_object(3, ObjectType::BinaryValue, "Shadow")
            .unwrap_err();
        assert!(matches!(err, DeviceError::Model(ModelError::DuplicateObject(id)) if id == bv));
        let err = device
            .add_object_under(view, 123, ObjectType::Device, "Device again")
            .unwrap_err();
        assert!(matches!(err, DeviceError::Model(ModelError::DuplicateObject(_))));

        let missing = ObjectId::new(ObjectType::StructuredView, 9);
        assert!(matches!(
            device.add_object_under(missing, 4, ObjectType::BinaryValue, "Orphan"),
            Err(DeviceError::UnknownObject(id)) if id == missing
        ));
    }

    #[test]
    fn set_value_unknown_targets() {
        let mut device = device();
        let missing = ObjectId::new(ObjectType::AnalogInput, 99);
        assert!(matches!(
            device.set_value(missing, PropertyId::PresentValue, 1.0f32),
            Err(DeviceError::UnknownObject(id)) if id == missing
        ));
        let id = device.id();
        assert!(matches!(
            device.set_value(id, PropertyId::PresentValue, 1.0f32),
            Err(DeviceError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn cascade_applies_follow_up_writes() {
        let mut device = device();
        let ai = ai(&mut device);
        let av = device
            .add_object(2, ObjectType::AnalogValue, "mirror")
            .unwrap()
            .add_property(PropertyId::PresentValue, Some(AppTag::Real))
            .map(|_| ObjectId::new(ObjectType::AnalogValue, 2))
            .unwrap();
        device
            .object_mut(ai)
            .unwrap()
            .property_mut(PropertyId::PresentValue)
            .unwrap()
            .add_callback("mirror", move |prop, cascade| {
                if let Some(value) = prop.value() {
                    cascade.write(av, PropertyId::PresentValue, value.clone());
                }
            });
        device.set_value(ai, PropertyId::PresentValue, 7.0f32).unwrap();
        assert_eq!(
            device.get_property(av, PropertyId::PresentValue).unwrap().value(),
            Some(&PropertyValue::from(7.0f32))
        );
    }

    #[test]
    fn self_feeding_cascade_is_bounded() {
        let mut device = device();
        let ai = ai(&mut device);
        let writes = Arc::new(Mutex::new(0usize));
        let counter = writes.clone();
        device
            .object_mut(ai)
            .unwrap()
            .property_mut(PropertyId::PresentValue)
            .unwrap()
            .add_callback("loop", move |prop, cascade| {
                *counter.lock().unwrap() += 1;
                if let Some(PropertyValue::Single(DataValue::Real(v))) = prop.value() {
                    cascade.write(ai, PropertyId::PresentValue, v + 1.0);
                }
            });
        let err = device.set_value(ai, PropertyId::PresentValue, 0.0f32).unwrap_err();
        assert!(matches!(err, DeviceError::CascadeTooDeep { depth: MAX_CASCADE_DEPTH }));
        assert_eq!(*writes.lock().unwrap(), MAX_CASCADE_DEPTH);
    }

    #[test]
    fn dump_covers_every_object() {
        let mut device = device();
        ai(&mut device);
        let dump = device.dump_objects();
        assert_eq!(dump.len(), 2);
        let dev = &dump["DEVICE:123"];
        assert_eq!(dev["OBJECT_NAME"], "\"Example device\"");
        assert_eq!(dev["APDU_TIMEOUT"], "3000");
        assert_eq!(dump["ANALOG_INPUT:1"]["PRESENT_VALUE"], "1");
        assert!(device.transport().sent().iter().all(|m| !matches!(m, Outbound::Error { .. })));
    }
}
