//! Logged food and its nutrition payload
//!
//! Every food entry stores a [`FoodData`] document: the recognised items
//! plus their summed total. The total is always recomputed from the items
//! rather than trusted from a client or external API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Single food item with its nutrition values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
}

impl FoodItem {
    pub fn new(name: impl Into<String>, calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            name: name.into(),
            calories,
            protein,
            carbs,
            fat,
            serving_size: None,
            image_url: None,
            barcode: None,
        }
    }
}

/// Summed nutrition values
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

impl NutritionTotals {
    pub fn add(&mut self, other: &NutritionTotals) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

impl From<&FoodItem> for NutritionTotals {
    fn from(item: &FoodItem) -> Self {
        Self {
            calories: item.calories,
            protein: item.protein,
            carbs: item.carbs,
            fat: item.fat,
        }
    }
}

/// Stored payload of a food entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodData {
    pub items: Vec<FoodItem>,
    #[serde(default)]
    pub total: NutritionTotals,
}

impl FoodData {
    pub fn from_items(items: Vec<FoodItem>) -> Self {
        let mut data = Self {
            items,
            total: NutritionTotals::default(),
        };
        data.recompute_total();
        data
    }

    pub fn recompute_total(&mut self) {
        self.total = self.items.iter().fold(NutritionTotals::default(), |mut acc, item| {
            acc.add(&NutritionTotals::from(item));
            acc
        });
    }

    /// Name used for the entry: the first item's name
    pub fn primary_name(&self) -> Option<&str> {
        self.items.first().map(|item| item.name.as_str())
    }
}

// ============================================================================
// Entry Classification
// ============================================================================

/// How a food entry was captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Manual,
    Barcode,
    Image,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Manual => "manual",
            EntryType::Barcode => "barcode",
            EntryType::Image => "image",
        }
    }
}

/// Meal a food entry belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Other,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Other => "other",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(EntryType::Manual),
            "barcode" => Ok(EntryType::Barcode),
            "image" => Ok(EntryType::Image),
            _ => Err(format!("Unknown entry type: {}", s)),
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" | "snacks" => Ok(MealType::Snack),
            "other" | "" => Ok(MealType::Other),
            _ => Err(format!(
                "Invalid meal type. Must be one of: {}",
                MealType::ALL.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items_totals() {
        let data = FoodData::from_items(vec![
            FoodItem::new("Grilled Chicken Salad", 350.0, 30.0, 15.0, 18.0),
            FoodItem::new("Cherry Tomatoes", 25.0, 1.0, 5.0, 0.0),
        ]);
        assert_eq!(data.total.calories, 375.0);
        assert_eq!(data.total.protein, 31.0);
        assert_eq!(data.total.carbs, 20.0);
        assert_eq!(data.total.fat, 18.0);
        assert_eq!(data.primary_name(), Some("Grilled Chicken Salad"));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let data: FoodData = serde_json::from_str(r#"{"items":[{"name":"Water"}]}"#).unwrap();
        assert_eq!(data.items[0].calories, 0.0);
        assert_eq!(data.total, NutritionTotals::default());
    }

    #[test]
    fn test_meal_type_parsing() {
        assert_eq!("Snack".parse::<MealType>().unwrap(), MealType::Snack);
        assert_eq!("".parse::<MealType>().unwrap(), MealType::Other);
        assert!("brunch".parse::<MealType>().is_err());
        assert_eq!("image".parse::<EntryType>().unwrap(), EntryType::Image);
    }

    #[test]
    fn test_empty_items() {
        let data = FoodData::from_items(vec![]);
        assert_eq!(data.primary_name(), None);
        assert_eq!(data.total.calories, 0.0);
    }
}
