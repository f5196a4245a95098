//! Unit conversion at the API boundary
//!
//! Health records and the plan calculator work in kilograms and
//! centimeters only. Requests may carry pounds or inches; they are
//! converted here before anything is stored or calculated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Decimal places kept for stored weights and heights
pub const MEASUREMENT_DECIMALS: u32 = 3;

/// Round a converted measurement to the precision it is stored at
pub fn round_measurement(value: f64) -> f64 {
    let factor = 10f64.powi(MEASUREMENT_DECIMALS as i32);
    (value * factor).round() / factor
}

// ============================================================================
// Weight Units
// ============================================================================

/// Weight unit accepted on input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * KG_PER_LB,
        }
    }

    /// Convert from kilograms to this unit
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lbs => kg / KG_PER_LB,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

// ============================================================================
// Height Units
// ============================================================================

/// Height unit accepted on input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeightUnit {
    #[default]
    Cm,
    Inches,
}

impl HeightUnit {
    /// Convert from this unit to centimeters
    pub fn to_cm(&self, value: f64) -> f64 {
        match self {
            HeightUnit::Cm => value,
            HeightUnit::Inches => value * CM_PER_INCH,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            HeightUnit::Cm => "cm",
            HeightUnit::Inches => "in",
        }
    }
}

impl fmt::Display for HeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for HeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cm" | "centimeter" | "centimeters" => Ok(HeightUnit::Cm),
            "in" | "inch" | "inches" => Ok(HeightUnit::Inches),
            _ => Err(format!("Unknown height unit: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_conversions() {
        assert!((WeightUnit::Lbs.to_kg(100.0) - 45.3592).abs() < 1e-9);
        assert_eq!(WeightUnit::Kg.to_kg(70.0), 70.0);
        assert!((HeightUnit::Inches.to_cm(70.0) - 177.8).abs() < 1e-9);
    }

    #[test]
    fn test_round_measurement() {
        assert_eq!(round_measurement(69.853168), 69.853);
        assert_eq!(round_measurement(499.9996), 500.0);
        assert_eq!(round_measurement(0.0004), 0.0);
        assert!(round_measurement(f64::NAN).is_nan());
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("LB".parse::<WeightUnit>().unwrap(), WeightUnit::Lbs);
        assert_eq!("kilograms".parse::<WeightUnit>().unwrap(), WeightUnit::Kg);
        assert_eq!("in".parse::<HeightUnit>().unwrap(), HeightUnit::Inches);
        assert!("stone".parse::<WeightUnit>().is_err());
        assert!("furlong".parse::<HeightUnit>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: pounds always convert to fewer kilograms
        #[test]
        fn prop_lbs_smaller_in_kg(lbs in 1.0f64..1100.0) {
            let kg = WeightUnit::Lbs.to_kg(lbs);
            prop_assert!(kg < lbs);
            prop_assert!((WeightUnit::Lbs.from_kg(kg) - lbs).abs() < 1e-9);
        }
    }
}
