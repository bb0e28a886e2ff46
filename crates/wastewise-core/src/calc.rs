//! Waste-to-energy conversion.
//!
//! A fixed arithmetic pipeline from four daily waste masses to biogas,
//! electricity, savings, CO₂ and fertilizer estimates. Only organic waste
//! (kitchen + garden) contributes; plastic and paper are accepted so callers
//! can pass a whole sample, but they do not move any output.
//!
//! Inputs are not range-checked here. Bounds belong to [`crate::validate`].

use serde::{Deserialize, Serialize};

/// Litres of biogas per kg of kitchen waste.
pub const KITCHEN_BIOGAS_L_PER_KG: f64 = 0.4;
/// Litres of biogas per kg of garden waste.
pub const GARDEN_BIOGAS_L_PER_KG: f64 = 0.3;
/// kWh generated per cubic metre of biogas.
pub const KWH_PER_M3_BIOGAS: f64 = 2.0;
/// Savings in INR per kWh generated.
pub const INR_PER_KWH: f64 = 8.0;
/// kg of CO₂ avoided per kg of organic waste processed.
pub const CO2_KG_PER_ORGANIC_KG: f64 = 0.3;
/// kg of fertilizer produced per kg of organic waste.
pub const FERTILIZER_KG_PER_ORGANIC_KG: f64 = 0.15;

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One household's daily waste, in kg per category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WasteSample {
    pub kitchen_kg: f64,
    pub plastic_kg: f64,
    pub paper_kg: f64,
    pub garden_kg: f64,
}

impl WasteSample {
    pub fn new(kitchen_kg: f64, plastic_kg: f64, paper_kg: f64, garden_kg: f64) -> Self {
        Self {
            kitchen_kg,
            plastic_kg,
            paper_kg,
            garden_kg,
        }
    }

    pub fn organic_kg(&self) -> f64 {
        self.kitchen_kg + self.garden_kg
    }

    pub fn total_kg(&self) -> f64 {
        self.kitchen_kg + self.plastic_kg + self.paper_kg + self.garden_kg
    }

    pub fn convert(&self) -> ConversionResult {
        convert(
            self.kitchen_kg,
            self.plastic_kg,
            self.paper_kg,
            self.garden_kg,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjection {
    pub biogas: f64,
    pub electricity: f64,
    pub savings: i64,
    pub co2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// L/day, 1 dp.
    pub biogas_liters: f64,
    /// kWh/month, 1 dp.
    pub electricity_kwh: f64,
    /// INR/month, whole rupees.
    pub cost_savings_inr: i64,
    /// kg/year, 1 dp.
    pub co2_reduction_kg: f64,
    /// kg/month, 1 dp.
    pub fertilizer_kg: f64,
    pub monthly_projection: MonthlyProjection,
}

/// One week of the monthly projection, as drawn by the calculator chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBreakdown {
    pub week: String,
    pub biogas: f64,
    pub electricity: f64,
    pub savings: f64,
}

// ---------------------------------------------------------------------------
// Step functions
// ---------------------------------------------------------------------------

/// Biogas in L/day from kitchen and garden waste.
pub fn biogas_liters(kitchen_kg: f64, garden_kg: f64) -> f64 {
    kitchen_kg * KITCHEN_BIOGAS_L_PER_KG + garden_kg * GARDEN_BIOGAS_L_PER_KG
}

/// Monthly electricity in kWh from a daily biogas volume in litres.
pub fn electricity_kwh(biogas_liters: f64) -> f64 {
    let daily = (biogas_liters / 1000.0) * KWH_PER_M3_BIOGAS;
    daily * DAYS_PER_MONTH
}

pub fn cost_savings(electricity_kwh: f64) -> f64 {
    electricity_kwh * INR_PER_KWH
}

/// Yearly CO₂ avoided from daily organic waste.
pub fn co2_reduction_kg(organic_kg: f64) -> f64 {
    let daily = organic_kg * CO2_KG_PER_ORGANIC_KG;
    daily * DAYS_PER_YEAR
}

/// Monthly fertilizer from daily organic waste.
pub fn fertilizer_kg(organic_kg: f64) -> f64 {
    let daily = organic_kg * FERTILIZER_KG_PER_ORGANIC_KG;
    daily * DAYS_PER_MONTH
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full conversion for one day's waste.
pub fn convert(kitchen_kg: f64, _plastic_kg: f64, _paper_kg: f64, garden_kg: f64) -> ConversionResult {
    let organic = kitchen_kg + garden_kg;
    let biogas = biogas_liters(kitchen_kg, garden_kg);
    let electricity = electricity_kwh(biogas);
    let savings = cost_savings(electricity);
    let co2 = co2_reduction_kg(organic);
    let fertilizer = fertilizer_kg(organic);

    ConversionResult {
        biogas_liters: round1(biogas),
        electricity_kwh: round1(electricity),
        cost_savings_inr: round_whole(savings),
        co2_reduction_kg: round1(co2),
        fertilizer_kg: round1(fertilizer),
        monthly_projection: MonthlyProjection {
            biogas: round1(biogas * DAYS_PER_MONTH),
            // Already a monthly figure; passed through unrounded.
            electricity,
            savings: round_whole(savings),
            co2: round1((co2 / DAYS_PER_YEAR) * DAYS_PER_MONTH),
        },
    }
}

/// Split the monthly projection into four equal weeks.
pub fn weekly_breakdown(result: &ConversionResult) -> Vec<WeeklyBreakdown> {
    let p = &result.monthly_projection;
    (1..=4)
        .map(|n| WeeklyBreakdown {
            week: format!("Week {n}"),
            biogas: p.biogas / 4.0,
            electricity: p.electricity / 4.0,
            savings: p.savings as f64 / 4.0,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
