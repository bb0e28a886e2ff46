use crate::calc::ConversionResult;
use crate::types::{EcoPointEntry, Purchase};
use serde::{Deserialize, Serialize};

pub const DEFAULT_POINTS_PER_KG: f64 = 10.0;
pub const WASTE_TRACKING_ACTIVITY: &str = "waste_tracking";
pub const GENERAL_ACTIVITY: &str = "general";

/// Points awarded for tracking `total_kg` of waste.
pub fn points_for_waste(total_kg: f64, points_per_kg: f64) -> i64 {
    (total_kg * points_per_kg).round() as i64
}

/// Ledger description written when a calculation is saved.
pub fn tracking_activity(total_kg: f64, result: &ConversionResult) -> String {
    format!(
        "Tracked {:.1}kg of waste - Biogas: {:.1}L, CO₂ saved: {:.1}kg",
        total_kg, result.biogas_liters, result.co2_reduction_kg
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub total_earned: i64,
    pub total_spent: i64,
    pub available_points: i64,
}

impl Balance {
    pub fn compute<'a>(
        earned: impl IntoIterator<Item = &'a EcoPointEntry>,
        purchases: impl IntoIterator<Item = &'a Purchase>,
    ) -> Self {
        let total_earned: i64 = earned.into_iter().map(|e| e.points).sum();
        let total_spent: i64 = purchases.into_iter().map(|p| p.points_spent).sum();
        Self {
            total_earned,
            total_spent,
            available_points: total_earned - total_spent,
        }
    }

    pub fn can_afford(&self, cost: i64) -> bool {
        self.available_points >= cost
    }
}
