pub mod app_tag;
pub mod bit_string;
pub mod data_value;
pub mod date_time;
pub mod object_id;
pub mod object_type;
pub mod property_id;
pub mod property_value;
pub mod spec;

pub use app_tag::AppTag;
pub use bit_string::BitString;
pub use data_value::DataValue;
pub use date_time::{Date, Time};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use property_value::PropertyValue;
pub use spec::{ErrorClass, ErrorCode, Segmentation, ServicesSupported};
