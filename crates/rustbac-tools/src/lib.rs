use clap::ValueEnum;
use rustbac_core::types::{AppTag, ObjectId, ObjectType, PropertyId, PropertyValue};
use rustbac_device::{Device, DeviceConfig, DeviceError, ServiceTransport};
use serde::Deserialize;

/// CLI-friendly enum for selecting BACnet object types.
///
/// Maps human-readable names to [`ObjectType`] variants for use with clap argument parsing.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ObjectTypeArg {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Device,
    MultiStateInput,
    MultiStateValue,
    StructuredView,
}

impl ObjectTypeArg {
    /// Convert to the core [`ObjectType`] representation.
    pub const fn into_object_type(self) -> ObjectType {
        match self {
            Self::AnalogInput => ObjectType::AnalogInput,
            Self::AnalogOutput => ObjectType::AnalogOutput,
            Self::AnalogValue => ObjectType::AnalogValue,
            Self::BinaryInput => ObjectType::BinaryInput,
            Self::BinaryOutput => ObjectType::BinaryOutput,
            Self::BinaryValue => ObjectType::BinaryValue,
            Self::Device => ObjectType::Device,
            Self::MultiStateInput => ObjectType::MultiStateInput,
            Self::MultiStateValue => ObjectType::MultiStateValue,
            Self::StructuredView => ObjectType::StructuredView,
        }
    }
}

/// A device and its object tree as loaded from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceDescription {
    pub device: DeviceConfig,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectDescription {
    pub object_type: ObjectType,
    pub instance: u32,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
    /// Children nested below this object, e.g. members of a structured view.
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDescription {
    pub property: PropertyId,
    /// Falls back to the standard type table when omitted.
    #[serde(default)]
    pub tag: Option<AppTag>,
    pub value: PropertyValue,
    #[serde(default)]
    pub read_only: bool,
}

impl DeviceDescription {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Builds the described device on top of `transport`.
    pub fn build<T: ServiceTransport>(&self, transport: T) -> Result<Device<T>, DeviceError> {
        let mut device = Device::new(self.device.clone(), transport)?;
        let root = device.id();
        for object in &self.objects {
            add_described_object(&mut device, root, object)?;
        }
        log::debug!(
            "built device {} with {} object(s)",
            device.id(),
            device.root().object_ids().len()
        );
        Ok(device)
    }
}

fn add_described_object<T: ServiceTransport>(
    device: &mut Device<T>,
    parent: ObjectId,
    description: &ObjectDescription,
) -> Result<(), DeviceError> {
    let id = device
        .add_object_under(
            parent,
            description.instance,
            description.object_type,
            &description.name,
        )?
        .id();
    for property in &description.properties {
        device
            .object_mut(id)
            .ok_or(DeviceError::UnknownObject(id))?
            .add_property(property.property, property.tag)?;
        device.set_value(id, property.property, property.value.clone())?;
        if let Some(stored) = device
            .object_mut(id)
            .and_then(|object| object.property_mut(property.property))
        {
            stored.set_read_only(property.read_only);
        }
    }
    for child in &description.objects {
        add_described_object(device, id, child)?;
    }
    Ok(())
}
