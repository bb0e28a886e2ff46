//! Demo data for a fresh install.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Result, WasteError};
use crate::store::Store;
use crate::types::{CommunityLocation, DailyLogRecord, LocationKind, Product, User, WasteLog};

pub const DEMO_EMAIL: &str = "demo@wastewise.app";
pub const DEMO_NAME: &str = "Demo User";
pub const DEMO_HOUSEHOLD_SIZE: u32 = 4;
pub const DEMO_LOG_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub user: User,
    pub token: String,
    pub logs: usize,
    pub locations: usize,
    pub products: usize,
}

fn two_dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One randomised day of household waste.
fn demo_record(rng: &mut StdRng, date: NaiveDate) -> DailyLogRecord {
    DailyLogRecord::new(
        date,
        two_dp(2.0 + rng.gen::<f64>() * 2.0),
        two_dp(0.5 + rng.gen::<f64>()),
        two_dp(0.3 + rng.gen::<f64>() * 0.5),
        two_dp(1.0 + rng.gen::<f64>() * 2.0),
    )
}

/// `DEMO_LOG_DAYS` consecutive days of logs ending on `today`, newest first.
pub fn demo_logs(user_id: Uuid, seed: u64, today: NaiveDate) -> Vec<WasteLog> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..DEMO_LOG_DAYS)
        .map(|i| WasteLog::new(user_id, demo_record(&mut rng, today - Duration::days(i))))
        .collect()
}

pub fn demo_locations() -> Vec<CommunityLocation> {
    let spot = |name: &str,
                kind: LocationKind,
                address: &str,
                contact: &str,
                latitude: f64,
                longitude: f64| {
        CommunityLocation {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            address: address.to_string(),
            contact: Some(contact.to_string()),
            latitude,
            longitude,
        }
    };
    vec![
        spot(
            "Community Biogas Digester - Bangalore",
            LocationKind::Digester,
            "123 Green Street, Bangalore",
            "+91 98765 43210",
            12.9716,
            77.5946,
        ),
        spot(
            "Eco Compost Hub",
            LocationKind::Compost,
            "456 Eco Lane, Bangalore",
            "+91 87654 32109",
            12.9352,
            77.6245,
        ),
        spot(
            "Waste Pickup Route - Zone A",
            LocationKind::Pickup,
            "Various locations",
            "+91 76543 21098",
            12.9897,
            77.611,
        ),
    ]
}

pub fn demo_products() -> Vec<Product> {
    vec![
        Product::new(
            "Cloth Shopping Bag",
            "Reusable cotton bag for market runs",
            50,
            "shopping",
            100,
        ),
        Product::new(
            "Steel Lunch Box",
            "Three-tier stainless tiffin",
            150,
            "kitchen",
            40,
        ),
        Product::new(
            "Bamboo Toothbrush Set",
            "Pack of four compostable toothbrushes",
            80,
            "personal care",
            60,
        ),
        Product::new(
            "Home Compost Bin",
            "Two-chamber aerobic compost bin",
            400,
            "composting",
            15,
        ),
        Product::new(
            "Compost Starter Culture",
            "Microbial culture for faster composting",
            120,
            "composting",
            30,
        ),
    ]
}

/// Populate a store with the demo household, its logs, locations and catalogue.
///
/// Fails with `UserExists` when the demo user is already present.
pub fn seed(store: &Store, seed: u64, today: NaiveDate) -> Result<SeedReport> {
    if store.user_by_email(DEMO_EMAIL).is_ok() {
        return Err(WasteError::UserExists(DEMO_EMAIL.to_string()));
    }

    let user = User::new(DEMO_EMAIL, DEMO_NAME, DEMO_HOUSEHOLD_SIZE);
    let token = store.create_user(&user)?;

    let logs = demo_logs(user.id, seed, today);
    store.insert_waste_logs(&logs)?;

    let locations = demo_locations();
    for location in &locations {
        store.insert_location(location)?;
    }

    let products = demo_products();
    for product in &products {
        store.insert_product(product)?;
    }

    tracing::info!(
        user = %user.email,
        logs = logs.len(),
        locations = locations.len(),
        products = products.len(),
        "seeded demo data"
    );

    Ok(SeedReport {
        user,
        token,
        logs: logs.len(),
        locations: locations.len(),
        products: products.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    #[test]
    fn demo_logs_cover_thirty_days_ending_today() {
        let logs = demo_logs(Uuid::new_v4(), 7, today());
        assert_eq!(logs.len(), 30);
        assert_eq!(logs[0].record.date, today());
        assert_eq!(
            logs[29].record.date,
            NaiveDate::from_ymd_opt(2026, 9, 2).unwrap()
        );
    }

    #[test]
    fn demo_logs_stay_in_range() {
        for log in demo_logs(Uuid::new_v4(), 42, today()) {
            let r = &log.record;
            assert!((2.0..=4.0).contains(&r.kitchen_kg), "{r:?}");
            assert!((0.5..=1.5).contains(&r.plastic_kg), "{r:?}");
            assert!((0.3..=0.8).contains(&r.paper_kg), "{r:?}");
            assert!((1.0..=3.0).contains(&r.garden_kg), "{r:?}");
            let sum = r.kitchen_kg + r.plastic_kg + r.paper_kg + r.garden_kg;
            assert!((r.total_kg - sum).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_logs() {
        let user = Uuid::new_v4();
        let a: Vec<DailyLogRecord> = demo_logs(user, 3, today())
            .into_iter()
            .map(|l| l.record)
            .collect();
        let b: Vec<DailyLogRecord> = demo_logs(user, 3, today())
            .into_iter()
            .map(|l| l.record)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn seed_populates_store_once() {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("seed.redb")).unwrap();
        let report = seed(&store, 1, today()).unwrap();
        assert_eq!(report.logs, 30);
        assert_eq!(report.locations, 3);
        assert_eq!(report.user.household_size, 4);

        assert_eq!(store.waste_logs_for(report.user.id).unwrap().len(), 30);
        assert_eq!(
            store.list_locations(Some(LocationKind::Compost)).unwrap().len(),
            1
        );
        assert_eq!(
            store.list_products_in_stock().unwrap().len(),
            report.products
        );
        assert_eq!(
            store.user_by_token(&report.token).unwrap().map(|u| u.id),
            Some(report.user.id)
        );

        assert!(matches!(
            seed(&store, 1, today()),
            Err(WasteError::UserExists(_))
        ));
    }
}
