//! Request-shape validation for the conversion engine and the stored records.
//!
//! Each check collects every failing field instead of stopping at the first,
//! so a form can highlight all of them at once.

use crate::calc::WasteSample;
use crate::error::{FieldError, Result, WasteError};
use crate::types::{DailyLogRecord, LocationKind};
use chrono::NaiveDate;
use serde::Deserialize;

pub const MAX_KITCHEN_KG: f64 = 10.0;
pub const MAX_PLASTIC_KG: f64 = 5.0;
pub const MAX_PAPER_KG: f64 = 3.0;
pub const MAX_GARDEN_KG: f64 = 5.0;

fn check_range(errors: &mut Vec<FieldError>, path: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() {
        errors.push(FieldError::new(path, "must be a finite number"));
    } else if value < min {
        errors.push(FieldError::new(path, format!("must be at least {min}")));
    } else if value > max {
        errors.push(FieldError::new(path, format!("must be at most {max}")));
    }
}

fn check_non_empty(errors: &mut Vec<FieldError>, path: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(path, "must not be empty"));
    }
}

fn check_coordinates(errors: &mut Vec<FieldError>, latitude: f64, longitude: f64) {
    check_range(errors, "latitude", latitude, -90.0, 90.0);
    check_range(errors, "longitude", longitude, -180.0, 180.0);
}

fn finish<T>(errors: Vec<FieldError>, value: T) -> Result<T> {
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(WasteError::Validation(errors))
    }
}

// ---------------------------------------------------------------------------
// Waste quantities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WasteInput {
    pub kitchen_kg: f64,
    pub plastic_kg: f64,
    pub paper_kg: f64,
    pub garden_kg: f64,
}

impl WasteInput {
    fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_range(&mut errors, "kitchen_kg", self.kitchen_kg, 0.0, MAX_KITCHEN_KG);
        check_range(&mut errors, "plastic_kg", self.plastic_kg, 0.0, MAX_PLASTIC_KG);
        check_range(&mut errors, "paper_kg", self.paper_kg, 0.0, MAX_PAPER_KG);
        check_range(&mut errors, "garden_kg", self.garden_kg, 0.0, MAX_GARDEN_KG);
        errors
    }

    pub fn validate(&self) -> Result<WasteSample> {
        finish(
            self.field_errors(),
            WasteSample::new(self.kitchen_kg, self.plastic_kg, self.paper_kg, self.garden_kg),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogInput {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub waste: WasteInput,
}

impl LogInput {
    /// Validate and build a record, dating it `today` when no date was given.
    pub fn validate(&self, today: NaiveDate) -> Result<DailyLogRecord> {
        let mut errors = self.waste.field_errors();
        let date = self.date.unwrap_or(today);
        if date > today {
            errors.push(FieldError::new("date", "must not be in the future"));
        }
        let w = &self.waste;
        finish(
            errors,
            DailyLogRecord::new(date, w.kitchen_kg, w.plastic_kg, w.paper_kg, w.garden_kg),
        )
    }
}

// ---------------------------------------------------------------------------
// Locations and events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LocationInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub address: String,
    #[serde(default)]
    pub contact: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationInput {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        check_non_empty(&mut errors, "name", &self.name);
        check_non_empty(&mut errors, "address", &self.address);
        check_coordinates(&mut errors, self.latitude, self.longitude);
        finish(errors, ())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub event_name: String,
    pub event_date: String,
    pub food_quantity_kg: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl EventInput {
    /// Validate the event and return its parsed date.
    pub fn validate(&self) -> Result<NaiveDate> {
        let mut errors = Vec::new();
        check_non_empty(&mut errors, "event_name", &self.event_name);
        let date = NaiveDate::parse_from_str(self.event_date.trim(), "%Y-%m-%d");
        if date.is_err() {
            errors.push(FieldError::new("event_date", "must be a date in YYYY-MM-DD form"));
        }
        check_range(
            &mut errors,
            "food_quantity_kg",
            self.food_quantity_kg,
            0.0,
            f64::MAX,
        );
        check_coordinates(&mut errors, self.latitude, self.longitude);
        match date {
            Ok(d) => finish(errors, d),
            Err(_) => Err(WasteError::Validation(errors)),
        }
    }
}
