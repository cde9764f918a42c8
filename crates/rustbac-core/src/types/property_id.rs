use core::cmp::Ordering;
use core::fmt;

macro_rules! property_ids {
    ($($variant:ident = $value:literal => $name:literal,)+) => {
        /// BACnet property identifiers.
        ///
        /// Common standard properties are named variants; vendor-specific or
        /// unrecognised identifiers use [`Proprietary`](Self::Proprietary).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum PropertyId {
            $($variant,)+
            Proprietary(u32),
        }

        impl PropertyId {
            pub const fn to_u32(self) -> u32 {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Proprietary(v) => v,
                }
            }

            pub const fn from_u32(value: u32) -> Self {
                match value {
                    $($value => Self::$variant,)+
                    v => Self::Proprietary(v),
                }
            }

            /// Upper-case name as used in the standard's enumeration tables.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                    Self::Proprietary(_) => "PROPRIETARY",
                }
            }
        }
    };
}

property_ids! {
    ActiveText = 4 => "ACTIVE_TEXT",
    All = 8 => "ALL",
    ApduTimeout = 11 => "APDU_TIMEOUT",
    ApplicationSoftwareVersion = 12 => "APPLICATION_SOFTWARE_VERSION",
    CovIncrement = 22 => "COV_INCREMENT",
    Description = 28 => "DESCRIPTION",
    DeviceAddressBinding = 30 => "DEVICE_ADDRESS_BINDING",
    DeviceType = 31 => "DEVICE_TYPE",
    EventState = 36 => "EVENT_STATE",
    FirmwareRevision = 44 => "FIRMWARE_REVISION",
    InactiveText = 46 => "INACTIVE_TEXT",
    Location = 58 => "LOCATION",
    MaxApduLengthAccepted = 62 => "MAX_APDU_LENGTH_ACCEPTED",
    MaxPresValue = 65 => "MAX_PRES_VALUE",
    MinPresValue = 69 => "MIN_PRES_VALUE",
    ModelName = 70 => "MODEL_NAME",
    NumberOfApduRetries = 73 => "NUMBER_OF_APDU_RETRIES",
    NumberOfStates = 74 => "NUMBER_OF_STATES",
    ObjectIdentifier = 75 => "OBJECT_IDENTIFIER",
    ObjectList = 76 => "OBJECT_LIST",
    ObjectName = 77 => "OBJECT_NAME",
    ObjectType = 79 => "OBJECT_TYPE",
    Optional = 80 => "OPTIONAL",
    OutOfService = 81 => "OUT_OF_SERVICE",
    Polarity = 84 => "POLARITY",
    PresentValue = 85 => "PRESENT_VALUE",
    ProtocolObjectTypesSupported = 96 => "PROTOCOL_OBJECT_TYPES_SUPPORTED",
    ProtocolServicesSupported = 97 => "PROTOCOL_SERVICES_SUPPORTED",
    ProtocolVersion = 98 => "PROTOCOL_VERSION",
    Reliability = 103 => "RELIABILITY",
    Required = 105 => "REQUIRED",
    Resolution = 106 => "RESOLUTION",
    SegmentationSupported = 107 => "SEGMENTATION_SUPPORTED",
    StateText = 110 => "STATE_TEXT",
    StatusFlags = 111 => "STATUS_FLAGS",
    SystemStatus = 112 => "SYSTEM_STATUS",
    Units = 117 => "UNITS",
    VendorIdentifier = 120 => "VENDOR_IDENTIFIER",
    VendorName = 121 => "VENDOR_NAME",
    ProtocolRevision = 139 => "PROTOCOL_REVISION",
    DatabaseRevision = 155 => "DATABASE_REVISION",
    PropertyList = 371 => "PROPERTY_LIST",
}

impl Ord for PropertyId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u32().cmp(&other.to_u32())
    }
}

impl PartialOrd for PropertyId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proprietary(v) => write!(f, "PROPRIETARY({v})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PropertyId;

    #[test]
    fn known_numbers_round_trip() {
        for id in [
            PropertyId::PresentValue,
            PropertyId::PropertyList,
            PropertyId::DatabaseRevision,
            PropertyId::All,
        ] {
            assert_eq!(PropertyId::from_u32(id.to_u32()), id);
        }
        assert_eq!(PropertyId::from_u32(9999), PropertyId::Proprietary(9999));
    }

    #[test]
    fn orders_by_wire_number() {
        assert!(PropertyId::ObjectName < PropertyId::PresentValue);
        assert!(PropertyId::PresentValue < PropertyId::PropertyList);
    }
}
