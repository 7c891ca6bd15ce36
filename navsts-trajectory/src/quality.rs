//! Status code to quality tier classification
//!
//! Tiers run from 1 (fault) to 5. Status codes 0..=4 map to `status + 1`; every other
//! code, including composite bitmasks such as
//! [`RawMessage::STATUS_ALL_OK`](crate::RawMessage::STATUS_ALL_OK), shares the top tier
//! with velocity-ok. Tier and palette index are in bijection (`index = tier - 1`).

use crate::config::PALETTE_SIZE;
use std::fmt;

/// Coarse fix quality used to pick a rendering color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualityTier(u8);

impl QualityTier {
    pub const MAX: QualityTier = QualityTier(PALETTE_SIZE as u8);

    /// Classify a navigation status code
    pub fn from_status(status: u8) -> Self {
        if status <= 4 {
            QualityTier(status + 1)
        } else {
            Self::MAX
        }
    }

    /// Numeric tier in `1..=5`
    pub fn value(self) -> u8 {
        self.0
    }

    /// Index into the color palette, always `< PALETTE_SIZE`
    pub fn palette_index(self) -> usize {
        (self.0 as usize - 1).min(PALETTE_SIZE - 1)
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PALETTE;
    use crate::types::RawMessage;

    #[test]
    fn test_low_statuses_map_to_status_plus_one() {
        for status in 0..=3u8 {
            assert_eq!(QualityTier::from_status(status).value(), status + 1);
        }
    }

    #[test]
    fn test_composite_statuses_use_top_tier() {
        assert_eq!(
            QualityTier::from_status(RawMessage::STATUS_ESTIMATION_ERROR_OK),
            QualityTier::MAX
        );
        assert_eq!(QualityTier::from_status(RawMessage::STATUS_ALL_OK), QualityTier::MAX);
        assert_eq!(QualityTier::from_status(u8::MAX), QualityTier::MAX);
    }

    #[test]
    fn test_status_four_shares_top_tier_with_composite_codes() {
        // Status 4 yields tier 5 by the status + 1 rule; it must land on the last palette
        // entry and not split a run against statuses 8 or 15.
        let velocity_ok = QualityTier::from_status(RawMessage::STATUS_VELOCITY_OK);
        assert_eq!(velocity_ok.value(), 5);
        assert_eq!(velocity_ok.palette_index(), PALETTE_SIZE - 1);
        assert_eq!(velocity_ok, QualityTier::from_status(RawMessage::STATUS_ALL_OK));
    }

    #[test]
    fn test_palette_colors_by_status() {
        let color = |status: u8| DEFAULT_PALETTE[QualityTier::from_status(status).palette_index()];
        assert_eq!(color(RawMessage::STATUS_FAULT), "#f00");
        assert_eq!(color(RawMessage::STATUS_LOCAL_FRAME_OK), "#ffa500");
        assert_eq!(color(RawMessage::STATUS_GLOBAL_FRAME_OK), "#00f");
        assert_eq!(color(RawMessage::STATUS_POSITION_OK), "#0f0");
        assert_eq!(color(RawMessage::STATUS_VELOCITY_OK), "#000");
        assert_eq!(color(RawMessage::STATUS_ALL_OK), "#000");
    }
}
