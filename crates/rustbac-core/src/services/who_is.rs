pub const SERVICE_WHO_IS: u8 = 0x08;

/// Device discovery request, optionally limited to an instance range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhoIsRequest {
    pub low_limit: Option<u32>,
    pub high_limit: Option<u32>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self {
            low_limit: None,
            high_limit: None,
        }
    }

    pub const fn range(low: u32, high: u32) -> Self {
        Self {
            low_limit: Some(low),
            high_limit: Some(high),
        }
    }

    /// Returns `true` when a device with `instance` should answer.
    ///
    /// A range is only applied when both limits are present.
    pub const fn matches(&self, instance: u32) -> bool {
        match (self.low_limit, self.high_limit) {
            (Some(low), Some(high)) => low <= instance && instance <= high,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WhoIsRequest;
    use proptest::prelude::*;

    #[test]
    fn global_matches_everything() {
        assert!(WhoIsRequest::global().matches(0));
        assert!(WhoIsRequest::global().matches(4_194_302));
    }

    #[test]
    fn range_is_inclusive() {
        let req = WhoIsRequest::range(100, 200);
        assert!(req.matches(100));
        assert!(req.matches(123));
        assert!(req.matches(200));
        assert!(!req.matches(99));
        assert!(!req.matches(201));
    }

    #[test]
    fn half_open_range_is_ignored() {
        let req = WhoIsRequest {
            low_limit: Some(500),
            high_limit: None,
        };
        assert!(req.matches(1));
    }

    proptest! {
        #[test]
        fn matches_iff_inside(low in 0u32..0x3F_FFFF, span in 0u32..1000, instance in 0u32..0x3F_FFFF) {
            let high = low.saturating_add(span);
            let req = WhoIsRequest::range(low, high);
            prop_assert_eq!(req.matches(instance), instance >= low && instance <= high);
        }
    }
}
