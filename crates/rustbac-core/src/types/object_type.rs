use core::cmp::Ordering;
use core::fmt;

/// BACnet object type identifiers as defined in the BACnet specification.
///
/// Known standard types are represented as named variants; proprietary
/// vendor-specific types use the [`Proprietary`](Self::Proprietary) variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectType {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Calendar,
    Command,
    Device,
    EventEnrollment,
    File,
    Group,
    Loop,
    MultiStateInput,
    MultiStateOutput,
    NotificationClass,
    Program,
    Schedule,
    Averaging,
    MultiStateValue,
    TrendLog,
    LifeSafetyPoint,
    LifeSafetyZone,
    Accumulator,
    PulseConverter,
    EventLog,
    GlobalGroup,
    TrendLogMultiple,
    LoadControl,
    StructuredView,
    AccessDoor,
    CharacterStringValue,
    IntegerValue,
    PositiveIntegerValue,
    NetworkPort,
    Proprietary(u16),
}

impl ObjectType {
    /// First type number reserved for vendor-specific object types.
    pub const PROPRIETARY_MIN: u16 = 128;
    /// Largest type number that fits the 10-bit object identifier field.
    pub const MAX: u16 = 0x03FF;

    /// Converts this object type to its numeric BACnet identifier.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogOutput => 1,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::BinaryOutput => 4,
            Self::BinaryValue => 5,
            Self::Calendar => 6,
            Self::Command => 7,
            Self::Device => 8,
            Self::EventEnrollment => 9,
            Self::File => 10,
            Self::Group => 11,
            Self::Loop => 12,
            Self::MultiStateInput => 13,
            Self::MultiStateOutput => 14,
            Self::NotificationClass => 15,
            Self::Program => 16,
            Self::Schedule => 17,
            Self::Averaging => 18,
            Self::MultiStateValue => 19,
            Self::TrendLog => 20,
            Self::LifeSafetyPoint => 21,
            Self::LifeSafetyZone => 22,
            Self::Accumulator => 23,
            Self::PulseConverter => 24,
            Self::EventLog => 25,
            Self::GlobalGroup => 26,
            Self::TrendLogMultiple => 27,
            Self::LoadControl => 28,
            Self::StructuredView => 29,
            Self::AccessDoor => 30,
            Self::CharacterStringValue => 40,
            Self::IntegerValue => 45,
            Self::PositiveIntegerValue => 48,
            Self::NetworkPort => 56,
            Self::Proprietary(v) => v,
        }
    }

    /// Creates an `ObjectType` from its numeric BACnet identifier.
    ///
    /// Values without a known standard mapping become [`Proprietary`](Self::Proprietary).
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::AnalogInput,
            1 => Self::AnalogOutput,
            2 => Self::AnalogValue,
            3 => Self::BinaryInput,
            4 => Self::BinaryOutput,
            5 => Self::BinaryValue,
            6 => Self::Calendar,
            7 => Self::Command,
            8 => Self::Device,
            9 => Self::EventEnrollment,
            10 => Self::File,
            11 => Self::Group,
            12 => Self::Loop,
            13 => Self::MultiStateInput,
            14 => Self::MultiStateOutput,
            15 => Self::NotificationClass,
            16 => Self::Program,
            17 => Self::Schedule,
            18 => Self::Averaging,
            19 => Self::MultiStateValue,
            20 => Self::TrendLog,
            21 => Self::LifeSafetyPoint,
            22 => Self::LifeSafetyZone,
            23 => Self::Accumulator,
            24 => Self::PulseConverter,
            25 => Self::EventLog,
            26 => Self::GlobalGroup,
            27 => Self::TrendLogMultiple,
            28 => Self::LoadControl,
            29 => Self::StructuredView,
            30 => Self::AccessDoor,
            40 => Self::CharacterStringValue,
            45 => Self::IntegerValue,
            48 => Self::PositiveIntegerValue,
            56 => Self::NetworkPort,
            v => Self::Proprietary(v),
        }
    }

    /// Returns `true` for named standard types and for proprietary numbers
    /// inside the vendor range that still fit an object identifier.
    pub const fn is_recognized(self) -> bool {
        match self {
            Self::Proprietary(v) => v >= Self::PROPRIETARY_MIN && v <= Self::MAX,
            _ => true,
        }
    }

    /// Upper-case name as used in the standard's enumeration tables.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AnalogInput => "ANALOG_INPUT",
            Self::AnalogOutput => "ANALOG_OUTPUT",
            Self::AnalogValue => "ANALOG_VALUE",
            Self::BinaryInput => "BINARY_INPUT",
            Self::BinaryOutput => "BINARY_OUTPUT",
            Self::BinaryValue => "BINARY_VALUE",
            Self::Calendar => "CALENDAR",
            Self::Command => "COMMAND",
            Self::Device => "DEVICE",
            Self::EventEnrollment => "EVENT_ENROLLMENT",
            Self::File => "FILE",
            Self::Group => "GROUP",
            Self::Loop => "LOOP",
            Self::MultiStateInput => "MULTI_STATE_INPUT",
            Self::MultiStateOutput => "MULTI_STATE_OUTPUT",
            Self::NotificationClass => "NOTIFICATION_CLASS",
            Self::Program => "PROGRAM",
            Self::Schedule => "SCHEDULE",
            Self::Averaging => "AVERAGING",
            Self::MultiStateValue => "MULTI_STATE_VALUE",
            Self::TrendLog => "TREND_LOG",
            Self::LifeSafetyPoint => "LIFE_SAFETY_POINT",
            Self::LifeSafetyZone => "LIFE_SAFETY_ZONE",
            Self::Accumulator => "ACCUMULATOR",
            Self::PulseConverter => "PULSE_CONVERTER",
            Self::EventLog => "EVENT_LOG",
            Self::GlobalGroup => "GLOBAL_GROUP",
            Self::TrendLogMultiple => "TREND_LOG_MULTIPLE",
            Self::LoadControl => "LOAD_CONTROL",
            Self::StructuredView => "STRUCTURED_VIEW",
            Self::AccessDoor => "ACCESS_DOOR",
            Self::CharacterStringValue => "CHARACTERSTRING_VALUE",
            Self::IntegerValue => "INTEGER_VALUE",
            Self::PositiveIntegerValue => "POSITIVE_INTEGER_VALUE",
            Self::NetworkPort => "NETWORK_PORT",
            Self::Proprietary(_) => "PROPRIETARY",
        }
    }
}

// Ordered by wire number so maps keyed by type iterate like the standard's tables.
impl Ord for ObjectType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u16().cmp(&other.to_u16())
    }
}

impl PartialOrd for ObjectType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proprietary(v) => write!(f, "PROPRIETARY({v})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectType;

    #[test]
    fn numbers_round_trip_for_named_types() {
        for n in 0u16..64 {
            assert_eq!(ObjectType::from_u16(n).to_u16(), n);
        }
    }

    #[test]
    fn recognizes_vendor_range_only() {
        assert!(ObjectType::AnalogInput.is_recognized());
        assert!(ObjectType::Proprietary(200).is_recognized());
        assert!(!ObjectType::Proprietary(31).is_recognized());
        assert!(!ObjectType::Proprietary(1024).is_recognized());
    }

    #[test]
    fn orders_by_wire_number() {
        assert!(ObjectType::AnalogInput < ObjectType::Device);
        assert!(ObjectType::NetworkPort < ObjectType::Proprietary(128));
    }
}
