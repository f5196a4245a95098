//! Meal plan generation
//!
//! Picks catalog meals for each slot of the day and scales their portions
//! so the day adds up to the calorie target.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::nutrition::{round_i32, Macros};

/// Calorie shares per slot. Snacks split their share evenly.
pub const BREAKFAST_SHARE: f64 = 0.25;
pub const LUNCH_SHARE: f64 = 0.30;
pub const DINNER_SHARE: f64 = 0.30;
pub const SNACKS_SHARE: f64 = 0.15;

/// Maximum relative deviation of a day's meals from the target
pub const DAILY_TOLERANCE: f64 = 0.05;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub calories: i32,
    pub macros: Macros,
    /// Human-readable window such as "7:00-9:00 AM"
    pub timing: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_notes: Option<String>,
}

impl Meal {
    fn scaled(&self, factor: f64) -> Meal {
        Meal {
            calories: round_i32(self.calories as f64 * factor),
            macros: self.macros.scaled(factor),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTotals {
    pub calories: i32,
    #[serde(flatten)]
    pub macros: Macros,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMeals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snacks: Vec<Meal>,
    pub totals: MealTotals,
}

impl DailyMeals {
    pub fn iter(&self) -> impl Iterator<Item = &Meal> {
        [&self.breakfast, &self.lunch, &self.dinner]
            .into_iter()
            .chain(self.snacks.iter())
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Meal> {
        [&mut self.breakfast, &mut self.lunch, &mut self.dinner]
            .into_iter()
            .chain(self.snacks.iter_mut())
    }

    /// Recompute totals from the individual meals
    pub fn recompute_totals(&mut self) {
        self.totals = self.iter().fold(MealTotals::default(), |acc, meal| MealTotals {
            calories: acc.calories + meal.calories,
            macros: acc.macros + meal.macros,
        });
    }

    /// Relative deviation of the day's calories from `target`
    pub fn deviation_from(&self, target: i32) -> f64 {
        if target <= 0 {
            return 0.0;
        }
        (self.totals.calories - target).abs() as f64 / target as f64
    }
}

// ============================================================================
// Catalog
// ============================================================================

struct CatalogMeal {
    name: &'static str,
    calories: i32,
    protein: i32,
    carbs: i32,
    fat: i32,
    timing: &'static str,
    prep_notes: Option<&'static str>,
}

impl CatalogMeal {
    fn scaled_to(&self, target_calories: f64) -> Meal {
        let factor = target_calories / self.calories as f64;
        Meal {
            name: self.name.to_string(),
            calories: round_i32(self.calories as f64 * factor),
            macros: Macros::new(self.protein, self.carbs, self.fat).scaled(factor),
            timing: self.timing.to_string(),
            prep_notes: self.prep_notes.map(str::to_string),
        }
    }
}

const BREAKFASTS: [CatalogMeal; 4] = [
    CatalogMeal {
        name: "Greek Yogurt Parfait",
        calories: 350,
        protein: 25,
        carbs: 40,
        fat: 10,
        timing: "7:00-9:00 AM",
        prep_notes: Some("Layer yogurt with berries and granola"),
    },
    CatalogMeal {
        name: "Veggie Egg Scramble",
        calories: 400,
        protein: 28,
        carbs: 20,
        fat: 22,
        timing: "7:00-9:00 AM",
        prep_notes: Some("Scramble eggs with spinach, peppers and onions"),
    },
    CatalogMeal {
        name: "Overnight Oats",
        calories: 380,
        protein: 15,
        carbs: 58,
        fat: 10,
        timing: "7:00-9:00 AM",
        prep_notes: Some("Prepare the night before with milk and chia seeds"),
    },
    CatalogMeal {
        name: "Protein Smoothie Bowl",
        calories: 420,
        protein: 30,
        carbs: 55,
        fat: 9,
        timing: "7:00-9:00 AM",
        prep_notes: None,
    },
];

const LUNCHES: [CatalogMeal; 4] = [
    CatalogMeal {
        name: "Grilled Chicken Salad",
        calories: 450,
        protein: 40,
        carbs: 20,
        fat: 22,
        timing: "12:00-1:30 PM",
        prep_notes: Some("Use olive oil and lemon dressing"),
    },
    CatalogMeal {
        name: "Turkey and Avocado Wrap",
        calories: 520,
        protein: 35,
        carbs: 45,
        fat: 22,
        timing: "12:00-1:30 PM",
        prep_notes: None,
    },
    CatalogMeal {
        name: "Quinoa Buddha Bowl",
        calories: 500,
        protein: 20,
        carbs: 65,
        fat: 18,
        timing: "12:00-1:30 PM",
        prep_notes: Some("Batch-cook quinoa for the week"),
    },
    CatalogMeal {
        name: "Tuna Poke Bowl",
        calories: 480,
        protein: 38,
        carbs: 50,
        fat: 14,
        timing: "12:00-1:30 PM",
        prep_notes: None,
    },
];

const DINNERS: [CatalogMeal; 4] = [
    CatalogMeal {
        name: "Baked Salmon with Vegetables",
        calories: 550,
        protein: 40,
        carbs: 30,
        fat: 28,
        timing: "6:00-8:00 PM",
        prep_notes: Some("Roast vegetables on the same tray"),
    },
    CatalogMeal {
        name: "Lean Beef Stir-Fry",
        calories: 600,
        protein: 42,
        carbs: 55,
        fat: 22,
        timing: "6:00-8:00 PM",
        prep_notes: None,
    },
    CatalogMeal {
        name: "Chicken and Sweet Potato",
        calories: 520,
        protein: 45,
        carbs: 50,
        fat: 14,
        timing: "6:00-8:00 PM",
        prep_notes: Some("Bake sweet potato wedges while the chicken grills"),
    },
    CatalogMeal {
        name: "Lentil and Vegetable Curry",
        calories: 500,
        protein: 24,
        carbs: 70,
        fat: 14,
        timing: "6:00-8:00 PM",
        prep_notes: None,
    },
];

const SNACKS: [CatalogMeal; 5] = [
    CatalogMeal {
        name: "Apple with Almond Butter",
        calories: 200,
        protein: 5,
        carbs: 25,
        fat: 10,
        timing: "10:00-11:00 AM",
        prep_notes: None,
    },
    CatalogMeal {
        name: "Protein Shake",
        calories: 180,
        protein: 25,
        carbs: 10,
        fat: 4,
        timing: "Post-workout",
        prep_notes: None,
    },
    CatalogMeal {
        name: "Hummus and Veggies",
        calories: 150,
        protein: 5,
        carbs: 18,
        fat: 7,
        timing: "3:00-4:00 PM",
        prep_notes: Some("Pre-cut carrots, cucumber and peppers"),
    },
    CatalogMeal {
        name: "Cottage Cheese and Berries",
        calories: 160,
        protein: 18,
        carbs: 14,
        fat: 3,
        timing: "3:00-4:00 PM",
        prep_notes: None,
    },
    CatalogMeal {
        name: "Mixed Nuts",
        calories: 170,
        protein: 6,
        carbs: 6,
        fat: 15,
        timing: "Anytime",
        prep_notes: Some("Portion into 30g bags"),
    },
];

// ============================================================================
// Generation
// ============================================================================

/// Number of snack slots for a calorie target
pub fn snack_count(daily_calories: i32) -> usize {
    if daily_calories < 1800 {
        1
    } else if daily_calories > 2500 {
        3
    } else {
        2
    }
}

/// Bring a day back within tolerance of `daily_calories`.
///
/// Meals are first rescaled uniformly. For very small targets, per-meal
/// rounding can still leave the day off by a few kcal (or at zero), so any
/// remaining gap is settled on dinner.
pub fn rebalance_day(meals: &mut DailyMeals, daily_calories: i32) {
    if meals.deviation_from(daily_calories) <= DAILY_TOLERANCE {
        return;
    }
    if meals.totals.calories > 0 {
        let ratio = daily_calories as f64 / meals.totals.calories as f64;
        for meal in meals.iter_mut() {
            *meal = meal.scaled(ratio);
        }
        meals.recompute_totals();
    }
    if meals.deviation_from(daily_calories) > DAILY_TOLERANCE {
        let gap = daily_calories - meals.totals.calories;
        meals.dinner.calories = (meals.dinner.calories + gap).max(0);
        meals.recompute_totals();
    }
}

fn pick<'a, R: Rng + ?Sized>(catalog: &'a [CatalogMeal], rng: &mut R) -> &'a CatalogMeal {
    // Catalogs are non-empty constants
    catalog.choose(rng).unwrap_or(&catalog[0])
}

/// One day of meals scaled to `daily_calories`
pub fn generate_daily_meals<R: Rng + ?Sized>(daily_calories: i32, rng: &mut R) -> DailyMeals {
    let target = daily_calories as f64;
    let snack_slots = snack_count(daily_calories);
    let per_snack = target * SNACKS_SHARE / snack_slots as f64;

    let breakfast = pick(&BREAKFASTS, rng).scaled_to(target * BREAKFAST_SHARE);
    let lunch = pick(&LUNCHES, rng).scaled_to(target * LUNCH_SHARE);
    let dinner = pick(&DINNERS, rng).scaled_to(target * DINNER_SHARE);
    let snacks = SNACKS
        .choose_multiple(rng, snack_slots)
        .map(|snack| snack.scaled_to(per_snack))
        .collect();

    let mut meals = DailyMeals {
        breakfast,
        lunch,
        dinner,
        snacks,
        totals: MealTotals::default(),
    };
    meals.recompute_totals();
    rebalance_day(&mut meals, daily_calories);
    meals
}
