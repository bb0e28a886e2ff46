use crate::error::WasteError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// DailyLogRecord / WasteLog
// ---------------------------------------------------------------------------

/// One day of logged household waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub kitchen_kg: f64,
    #[serde(default)]
    pub plastic_kg: f64,
    #[serde(default)]
    pub paper_kg: f64,
    #[serde(default)]
    pub garden_kg: f64,
    #[serde(default)]
    pub total_kg: f64,
}

impl DailyLogRecord {
    /// Build a record whose `total_kg` is the sum of the four categories.
    pub fn new(
        date: NaiveDate,
        kitchen_kg: f64,
        plastic_kg: f64,
        paper_kg: f64,
        garden_kg: f64,
    ) -> Self {
        Self {
            date,
            kitchen_kg,
            plastic_kg,
            paper_kg,
            garden_kg,
            total_kg: kitchen_kg + plastic_kg + paper_kg + garden_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub record: DailyLogRecord,
    pub created_at: DateTime<Utc>,
}

impl WasteLog {
    pub fn new(user_id: Uuid, record: DailyLogRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            record,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default = "default_household_size")]
    pub household_size: u32,
    pub created_at: DateTime<Utc>,
}

fn default_household_size() -> u32 {
    1
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>, household_size: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            household_size: household_size.max(1),
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// CalculationRecord
// ---------------------------------------------------------------------------

/// A saved conversion, stored with the column names the dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub biogas_l: f64,
    pub electricity_kwh: f64,
    pub cost_savings_inr: i64,
    pub co2_reduction_kg: f64,
    pub fertilizer_kg: f64,
    pub created_at: DateTime<Utc>,
}

impl CalculationRecord {
    pub fn from_result(user_id: Uuid, result: &crate::calc::ConversionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            biogas_l: result.biogas_liters,
            electricity_kwh: result.electricity_kwh,
            cost_savings_inr: result.cost_savings_inr,
            co2_reduction_kg: result.co2_reduction_kg,
            fertilizer_kg: result.fertilizer_kg,
            created_at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Eco points, products, purchases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoPointEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: i64,
    pub activity: String,
    pub activity_type: String,
    pub earned_at: DateTime<Utc>,
}

impl EcoPointEntry {
    pub fn new(
        user_id: Uuid,
        points: i64,
        activity: impl Into<String>,
        activity_type: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            points,
            activity: activity.into(),
            activity_type: activity_type.into(),
            earned_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub points_cost: i64,
    #[serde(default)]
    pub category: String,
    pub stock: u32,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        points_cost: i64,
        category: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            points_cost,
            category: category.into(),
            stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub points_spent: i64,
    pub purchased_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Community locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Digester,
    Compost,
    Pickup,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Digester => "digester",
            LocationKind::Compost => "compost",
            LocationKind::Pickup => "pickup",
        }
    }

    pub fn all() -> &'static [LocationKind] {
        &[
            LocationKind::Digester,
            LocationKind::Compost,
            LocationKind::Pickup,
        ]
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = WasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digester" => Ok(LocationKind::Digester),
            "compost" => Ok(LocationKind::Compost),
            "pickup" => Ok(LocationKind::Pickup),
            other => Err(WasteError::InvalidRequest(format!(
                "unknown location type '{other}': expected digester, compost or pickup"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityLocation {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Food donation events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub food_quantity_kg: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Coach recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recommendation_text: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(user_id: Uuid, text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            recommendation_text: text.into(),
            category: category.into(),
            created_at: Utc::now(),
        }
    }
}
