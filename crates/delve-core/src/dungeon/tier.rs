//! Enemy difficulty tiers and the floor-number to tier-pool table

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Difficulty band for enemies
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnemyTier {
    #[default]
    Low,
    Mid,
    High,
    Boss,
}

/// Tier pool used for an inclusive range of floor numbers
///
/// `max_floor: None` means the band is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub min_floor: u32,
    pub max_floor: Option<u32>,
    pub tiers: Vec<EnemyTier>,
}

impl TierBand {
    pub fn new(min_floor: u32, max_floor: Option<u32>, tiers: &[EnemyTier]) -> Self {
        Self {
            min_floor,
            max_floor,
            tiers: tiers.to_vec(),
        }
    }

    pub fn contains(&self, floor_number: u32) -> bool {
        floor_number >= self.min_floor && self.max_floor.is_none_or(|max| floor_number <= max)
    }
}

/// Floors 1-2 low, 3-5 low+mid, 6-8 mid+high, 9+ high+boss
pub fn default_tier_bands() -> Vec<TierBand> {
    vec![
        TierBand::new(1, Some(2), &[EnemyTier::Low]),
        TierBand::new(3, Some(5), &[EnemyTier::Low, EnemyTier::Mid]),
        TierBand::new(6, Some(8), &[EnemyTier::Mid, EnemyTier::High]),
        TierBand::new(9, None, &[EnemyTier::High, EnemyTier::Boss]),
    ]
}

/// Tier pool for a floor
///
/// Floors below the first band use the first band; floors past a closed
/// final band use the last band.
pub fn tier_pool(bands: &[TierBand], floor_number: u32) -> &[EnemyTier] {
    if let Some(band) = bands.iter().find(|b| b.contains(floor_number)) {
        return band.tiers.as_slice();
    }
    match bands.first() {
        Some(first) if floor_number < first.min_floor => first.tiers.as_slice(),
        _ => bands.last().map(|b| b.tiers.as_slice()).unwrap_or(&[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bands() {
        let bands = default_tier_bands();
        assert_eq!(tier_pool(&bands, 1), &[EnemyTier::Low]);
        assert_eq!(tier_pool(&bands, 2), &[EnemyTier::Low]);
        assert_eq!(tier_pool(&bands, 3), &[EnemyTier::Low, EnemyTier::Mid]);
        assert_eq!(tier_pool(&bands, 5), &[EnemyTier::Low, EnemyTier::Mid]);
        assert_eq!(tier_pool(&bands, 6), &[EnemyTier::Mid, EnemyTier::High]);
        assert_eq!(tier_pool(&bands, 8), &[EnemyTier::Mid, EnemyTier::High]);
        assert_eq!(tier_pool(&bands, 9), &[EnemyTier::High, EnemyTier::Boss]);
        assert_eq!(tier_pool(&bands, 40), &[EnemyTier::High, EnemyTier::Boss]);
    }

    #[test]
    fn test_out_of_range_floors() {
        let bands = vec![TierBand::new(2, Some(3), &[EnemyTier::Mid])];
        assert_eq!(tier_pool(&bands, 0), &[EnemyTier::Mid]);
        assert_eq!(tier_pool(&bands, 10), &[EnemyTier::Mid]);
        assert!(tier_pool(&[], 1).is_empty());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(EnemyTier::Low < EnemyTier::Mid);
        assert!(EnemyTier::High < EnemyTier::Boss);
    }
}
