use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[serde(rename = "impossible")]
    Impossible,
    #[serde(rename = "very common")]
    VeryCommon,
    #[serde(rename = "common")]
    Common,
    #[serde(rename = "uncommon")]
    Uncommon,
    #[serde(rename = "rare")]
    Rare,
    #[serde(rename = "extremely rare")]
    ExtremelyRare,
}

impl Rarity {
    pub fn classify(density: f64) -> Self {
        if density <= 0.0 || density.is_nan() {
            Rarity::Impossible
        } else if density >= 0.1 {
            Rarity::VeryCommon
        } else if density >= 0.01 {
            Rarity::Common
        } else if density >= 0.001 {
            Rarity::Uncommon
        } else if density >= 1e-6 {
            Rarity::Rare
        } else {
            Rarity::ExtremelyRare
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Impossible => "impossible",
            Rarity::VeryCommon => "very common",
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::ExtremelyRare => "extremely rare",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "One in N" odds of an outcome: `floor(1 / density)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneIn {
    Finite(u64),
    Infinite,
}

impl OneIn {
    pub fn from_density(density: f64) -> Self {
        if density > 0.0 {
            // `as` saturates for densities below 1 / u64::MAX
            OneIn::Finite((1.0 / density).floor() as u64)
        } else {
            OneIn::Infinite
        }
    }

    pub fn finite(&self) -> Option<u64> {
        match self {
            OneIn::Finite(n) => Some(*n),
            OneIn::Infinite => None,
        }
    }
}

impl Serialize for OneIn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OneIn::Finite(n) => serializer.serialize_u64(*n),
            OneIn::Infinite => serializer.serialize_str("infinity"),
        }
    }
}

impl std::fmt::Display for OneIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OneIn::Finite(n) => write!(f, "1 in {n}"),
            OneIn::Infinite => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interpretation {
    pub percentage: f64,
    pub one_in: OneIn,
    pub rarity: Rarity,
    /// How many years a once-a-day experiment takes, on average, to hit the
    /// outcome once. Zero for impossible outcomes.
    pub years_if_daily: u64,
}

impl Interpretation {
    pub fn from_density(density: f64) -> Self {
        let one_in = OneIn::from_density(density);
        Self {
            percentage: density * 100.0,
            one_in,
            rarity: Rarity::classify(density),
            years_if_daily: one_in.finite().map_or(0, |n| n / 365),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_thresholds() {
        assert_eq!(Rarity::classify(1.0), Rarity::VeryCommon);
        assert_eq!(Rarity::classify(0.1), Rarity::VeryCommon);
        assert_eq!(Rarity::classify(0.05), Rarity::Common);
        assert_eq!(Rarity::classify(0.005), Rarity::Uncommon);
        assert_eq!(Rarity::classify(1e-4), Rarity::Rare);
        assert_eq!(Rarity::classify(1e-9), Rarity::ExtremelyRare);
        assert_eq!(Rarity::classify(0.0), Rarity::Impossible);
    }

    #[test]
    fn test_one_in() {
        assert_eq!(OneIn::from_density(1.0), OneIn::Finite(1));
        assert_eq!(OneIn::from_density(0.125), OneIn::Finite(8));
        assert_eq!(OneIn::from_density(0.3), OneIn::Finite(3));
        assert_eq!(OneIn::from_density(0.0), OneIn::Infinite);
        assert_eq!(OneIn::from_density(f64::MIN_POSITIVE), OneIn::Finite(u64::MAX));
    }

    #[test]
    fn test_one_in_serialization() {
        assert_eq!(serde_json::to_string(&OneIn::Finite(12)).unwrap(), "12");
        assert_eq!(
            serde_json::to_string(&OneIn::Infinite).unwrap(),
            "\"infinity\""
        );
    }

    #[test]
    fn test_rarity_serialization() {
        assert_eq!(
            serde_json::to_string(&Rarity::VeryCommon).unwrap(),
            "\"very common\""
        );
        assert_eq!(Rarity::ExtremelyRare.to_string(), "extremely rare");
    }

    #[test]
    fn test_interpretation() {
        let certain = Interpretation::from_density(1.0);
        assert_eq!(certain.percentage, 100.0);
        assert_eq!(certain.one_in, OneIn::Finite(1));
        assert_eq!(certain.rarity, Rarity::VeryCommon);
        assert_eq!(certain.years_if_daily, 0);

        let rare = Interpretation::from_density(1.0 / 8192.0);
        assert_eq!(rare.one_in, OneIn::Finite(8192));
        assert_eq!(rare.rarity, Rarity::Rare);
        assert_eq!(rare.years_if_daily, 22);

        let impossible = Interpretation::from_density(0.0);
        assert_eq!(impossible.one_in, OneIn::Infinite);
        assert_eq!(impossible.years_if_daily, 0);
    }
}
