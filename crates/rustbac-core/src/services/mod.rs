//! Decoded payloads for the services a device answers.
//!
//! The wire stack owns framing and tag decoding; these types are the
//! structured shapes it hands over and accepts back.

pub mod cov_notification;
pub mod i_am;
pub mod read_property;
pub mod read_property_multiple;
pub mod subscribe_cov;
pub mod subscribe_cov_property;
pub mod value_codec;
pub mod who_is;

/// Whether a subscribe request's lifetime field asks for cancellation.
///
/// An absent or zero lifetime removes the subscription.
pub(crate) const fn is_cancellation(lifetime_seconds: Option<u32>) -> bool {
    matches!(lifetime_seconds, None | Some(0))
}
