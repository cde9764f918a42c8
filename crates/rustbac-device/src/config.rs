use crate::address::DataLinkAddress;
use crate::error::ConfigError;
use rustbac_core::types::{ObjectId, Segmentation};
use std::net::IpAddr;

/// Identity and capabilities a device is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    pub device_instance: u32,
    pub name: String,
    pub vendor_id: u32,
    pub database_revision: u32,
    pub ip: IpAddr,
    #[cfg_attr(feature = "serde", serde(default = "default_port"))]
    pub port: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vendor_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub model_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub firmware_revision: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub application_software_version: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<String>,
    #[cfg_attr(feature = "serde", serde(default = "default_max_apdu"))]
    pub max_apdu_length_accepted: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_segmentation"))]
    pub segmentation: Segmentation,
    #[cfg_attr(feature = "serde", serde(default = "default_retries"))]
    pub number_of_apdu_retries: u32,
}

#[cfg(feature = "serde")]
fn default_port() -> u16 {
    DataLinkAddress::BACNET_IP_DEFAULT_PORT
}

#[cfg(feature = "serde")]
fn default_max_apdu() -> u32 {
    DeviceConfig::DEFAULT_MAX_APDU
}

#[cfg(feature = "serde")]
fn default_segmentation() -> Segmentation {
    Segmentation::NoSegmentation
}

#[cfg(feature = "serde")]
fn default_retries() -> u32 {
    DeviceConfig::DEFAULT_APDU_RETRIES
}

impl DeviceConfig {
    pub const DEFAULT_MAX_APDU: u32 = 1476;
    pub const DEFAULT_APDU_RETRIES: u32 = 3;

    pub fn new(
        device_instance: u32,
        name: impl Into<String>,
        vendor_id: u32,
        database_revision: u32,
        ip: IpAddr,
    ) -> Self {
        Self {
            device_instance,
            name: name.into(),
            vendor_id,
            database_revision,
            ip,
            port: DataLinkAddress::BACNET_IP_DEFAULT_PORT,
            vendor_name: None,
            model_name: None,
            firmware_revision: None,
            application_software_version: None,
            description: None,
            location: None,
            max_apdu_length_accepted: Self::DEFAULT_MAX_APDU,
            segmentation: Segmentation::NoSegmentation,
            number_of_apdu_retries: Self::DEFAULT_APDU_RETRIES,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn with_application_software_version(mut self, version: impl Into<String>) -> Self {
        self.application_software_version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        if self.device_instance > ObjectId::MAX_INSTANCE {
            return Err(ConfigError::InstanceOutOfRange(self.device_instance));
        }
        Ok(())
    }

    /// The device's own network address.
    pub fn address(&self) -> DataLinkAddress {
        DataLinkAddress::new(self.ip, self.port)
    }
}
