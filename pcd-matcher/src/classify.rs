use std::fmt;

use serde::Serialize;

/// Severity bucket for the magnitude of a height difference.
///
/// Upper bounds are inclusive: 0.1, 0.2, 0.5 and 1.0 m; everything above
/// 1.0 m falls into the last tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ClassificationTier {
    #[serde(rename = "zaļa")]
    Green,
    #[serde(rename = "oranža")]
    Orange,
    #[serde(rename = "sarkana")]
    Red,
    #[serde(rename = "zilā")]
    Blue,
    #[serde(rename = "violetā")]
    Violet,
}

impl ClassificationTier {
    pub const ALL: [ClassificationTier; 5] = [
        ClassificationTier::Green,
        ClassificationTier::Orange,
        ClassificationTier::Red,
        ClassificationTier::Blue,
        ClassificationTier::Violet,
    ];

    /// Inclusive upper bound of |ΔZ| in meters, `None` for the open-ended tier.
    pub fn upper_bound(self) -> Option<f64> {
        match self {
            ClassificationTier::Green => Some(0.1),
            ClassificationTier::Orange => Some(0.2),
            ClassificationTier::Red => Some(0.5),
            ClassificationTier::Blue => Some(1.0),
            ClassificationTier::Violet => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClassificationTier::Green => "zaļa",
            ClassificationTier::Orange => "oranža",
            ClassificationTier::Red => "sarkana",
            ClassificationTier::Blue => "zilā",
            ClassificationTier::Violet => "violetā",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ClassificationTier::Green => "#afffa6",
            ClassificationTier::Orange => "#ffeaa6",
            ClassificationTier::Red => "#ffaaaa",
            ClassificationTier::Blue => "#aaaaff",
            ClassificationTier::Violet => "#e6a6ff",
        }
    }

    pub fn interval(self) -> &'static str {
        match self {
            ClassificationTier::Green => "līdz 0.1 m",
            ClassificationTier::Orange => "0.1–0.2 m",
            ClassificationTier::Red => "0.2–0.5 m",
            ClassificationTier::Blue => "0.5–1.0 m",
            ClassificationTier::Violet => "virs 1.0 m",
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ClassificationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(delta_z_abs: f64) -> ClassificationTier {
    ClassificationTier::ALL
        .into_iter()
        .find(|tier| tier.upper_bound().is_some_and(|bound| delta_z_abs <= bound))
        .unwrap_or(ClassificationTier::Violet)
}

/// Number of results per tier; tiers with no results count zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts([usize; 5]);

impl TierCounts {
    pub fn from_tiers(tiers: impl IntoIterator<Item = ClassificationTier>) -> Self {
        let mut counts = Self::default();
        for tier in tiers {
            counts.0[tier.position()] += 1;
        }
        counts
    }

    pub fn get(&self, tier: ClassificationTier) -> usize {
        self.0[tier.position()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassificationTier, usize)> + '_ {
        ClassificationTier::ALL
            .into_iter()
            .map(move |tier| (tier, self.get(tier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(classify(0.0), ClassificationTier::Green);
        assert_eq!(classify(0.1), ClassificationTier::Green);
        assert_eq!(classify(0.1001), ClassificationTier::Orange);
        assert_eq!(classify(0.2), ClassificationTier::Orange);
        assert_eq!(classify(0.5), ClassificationTier::Red);
        assert_eq!(classify(1.0), ClassificationTier::Blue);
        assert_eq!(classify(1.0001), ClassificationTier::Violet);
        assert_eq!(classify(250.0), ClassificationTier::Violet);
    }

    #[test]
    fn test_classify_is_monotonic() {
        let mut previous = classify(0.0);
        for step in 0..=1500 {
            let tier = classify(step as f64 * 0.001);
            assert!(tier >= previous);
            previous = tier;
        }
        assert_eq!(previous, ClassificationTier::Violet);
    }

    #[test]
    fn test_every_tier_is_reachable() {
        let tiers: Vec<ClassificationTier> = [0.05, 0.15, 0.3, 0.7, 1.5]
            .into_iter()
            .map(classify)
            .collect();
        assert_eq!(tiers, ClassificationTier::ALL.to_vec());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ClassificationTier::Red.to_string(), "sarkana");
        assert_eq!(ClassificationTier::Violet.color(), "#e6a6ff");
        assert_eq!(ClassificationTier::Green.interval(), "līdz 0.1 m");
    }

    #[test]
    fn test_tier_counts_default_to_zero() {
        let counts = TierCounts::from_tiers([
            ClassificationTier::Red,
            ClassificationTier::Green,
            ClassificationTier::Red,
        ]);

        let collected: Vec<usize> = counts.iter().map(|(_, count)| count).collect();
        assert_eq!(collected, vec![1, 0, 2, 0, 0]);
        assert_eq!(counts.total(), 3);
        assert_eq!(TierCounts::default().total(), 0);
    }
}
