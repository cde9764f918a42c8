//! BACnet device application model for the rustbac crate family.
//!
//! A [`Device`] owns a tree of [`Object`]s and their [`Property`] cells,
//! answers decoded service requests (discovery, property reads, COV
//! subscriptions, foreign-device registration) and fans out change-of-value
//! notifications. The wire stack sits behind [`ServiceTransport`]: it feeds
//! [`ServiceEvent`]s in and receives structured [`Outbound`] messages.
//!
//! ```no_run
//! use rustbac_core::types::{AppTag, ObjectType, PropertyId};
//! use rustbac_device::{Device, DeviceConfig, RecordingTransport};
//!
//! # fn main() -> Result<(), rustbac_device::DeviceError> {
//! let config = DeviceConfig::new(123, "Example device", 260, 1, "0.0.0.0".parse().unwrap());
//! let mut device = Device::new(config, RecordingTransport::default())?;
//! let ai = device.add_object(1, ObjectType::AnalogInput, "Example value")?;
//! ai.add_property(PropertyId::PresentValue, Some(AppTag::Real))?;
//! let ai = ai.id();
//! device.set_value(ai, PropertyId::PresentValue, 1.0f32)?;
//! println!("{:#?}", device.dump_objects());
//! # Ok(())
//! # }
//! ```
//!
//! # Feature flags
//!
//! - **`serde`** — derives `Serialize`/`Deserialize` on configuration,
//!   events and outbound messages.

pub mod address;
pub mod config;
pub mod device;
pub mod error;
pub mod foreign_device;
mod handlers;
pub mod mandatory;
pub mod object;
pub mod property;
pub mod runner;
pub mod service;
pub mod subscription;
pub mod transport;
pub mod type_map;

pub use address::{DataLinkAddress, PeerAddress};
pub use config::DeviceConfig;
pub use device::{Device, MAX_CASCADE_DEPTH};
pub use error::{ConfigError, DeviceError, ModelError, ReadError, ServiceError, TransportError};
pub use foreign_device::{ForeignDeviceTable, ForeignDeviceTableEntry};
pub use object::{Object, ObjectEntry, PropertyRef};
pub use property::{Cascade, ChangeCallback, PendingWrite, Property};
pub use runner::run;
pub use service::{RequestHeader, ServiceEvent, ServiceRequest};
pub use subscription::{CovSubscription, SubscriptionChange, SubscriptionList};
pub use transport::{BvlcResultCode, ChannelTransport, Outbound, RecordingTransport, ServiceTransport};
pub use type_map::PropertyTypeMap;
