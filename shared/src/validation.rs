//! Input validation functions
//!
//! Field-level checks for request payloads. Range checks for the plan
//! calculator itself live on [`crate::health_metrics::UserHealth`].

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let well_formed = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false);
    if !well_formed {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a daily calorie goal (kcal)
pub fn validate_calorie_goal(calories: i32) -> Result<(), String> {
    if calories < 500 {
        return Err("Daily calorie goal must be at least 500 kcal".to_string());
    }
    if calories > 10000 {
        return Err("Daily calorie goal must be at most 10000 kcal".to_string());
    }
    Ok(())
}

/// Validate a daily macro goal (grams)
pub fn validate_macro_goal(grams: i32) -> Result<(), String> {
    if grams < 0 {
        return Err("Macro goal cannot be negative".to_string());
    }
    if grams > 2000 {
        return Err("Macro goal unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a logged nutrition value (calories or grams)
pub fn validate_nutrient_amount(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Value must be a valid number".to_string());
    }
    if value < 0.0 {
        return Err("Value cannot be negative".to_string());
    }
    if value > 50000.0 {
        return Err("Value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a reminder time in 24-hour HH:MM form
pub fn validate_reminder_time(time: &str) -> Result<(), String> {
    chrono::NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| "Reminder time must be in HH:MM format".to_string())
}

/// Validate a product barcode (EAN-8, UPC-A, EAN-13, GTIN-14)
pub fn validate_barcode(barcode: &str) -> Result<(), String> {
    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err("Barcode must contain only digits".to_string());
    }
    if !(8..=14).contains(&barcode.len()) {
        return Err("Barcode must be 8 to 14 digits long".to_string());
    }
    Ok(())
}

/// Validate a phone number: digits with optional leading + and separators
pub fn validate_phone_number(phone: &str) -> Result<(), String> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = phone
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')') || (c == '+' && i == 0));
    if !allowed || !(7..=15).contains(&digits) {
        return Err("Invalid phone number".to_string());
    }
    Ok(())
}

/// Validate a birthday: not in the future relative to `today`
pub fn validate_birthday(birthday: chrono::NaiveDate, today: chrono::NaiveDate) -> Result<(), String> {
    if birthday > today {
        return Err("Birthday cannot be in the future".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "age" => "Age",
        "weight" => "Weight",
        "height" => "Height",
        "gender" => "Gender",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "weight_unit" => "Weight Unit",
        "height_unit" => "Height Unit",
        "daily_calorie_goal" => "Daily Calorie Goal",
        "protein_goal" => "Protein Goal",
        "carbs_goal" => "Carbs Goal",
        "fat_goal" => "Fat Goal",
        "reminder_time" => "Reminder Time",
        "display_name" => "Display Name",
        "phone_number" => "Phone Number",
        "meal_type" => "Meal Type",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
