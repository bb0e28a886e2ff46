//! Persistent storage for WasteWise records using redb.
//!
//! # Table design
//!
//! History tables (waste logs, calculations, eco points, purchases, events,
//! locations, recommendations) use a 24-byte composite key:
//! ```text
//! [ timestamp_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//! ```
//! so a plain iteration walks records in insertion-time order. Catalogue
//! tables (users, products) are keyed by the 16 uuid bytes for direct
//! lookup. Bearer tokens map `token -> user uuid`.
//!
//! Values are JSON-encoded records.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::ecopoints::Balance;
use crate::error::{Result, WasteError};
use crate::types::{
    CalculationRecord, CommunityLocation, DonationEvent, EcoPointEntry, LocationKind, Product,
    Purchase, Recommendation, User, WasteLog,
};

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

type JsonTable = TableDefinition<'static, &'static [u8], &'static [u8]>;

const USERS: JsonTable = TableDefinition::new("users");
const TOKENS: TableDefinition<&str, &[u8]> = TableDefinition::new("tokens");
const WASTE_LOGS: JsonTable = TableDefinition::new("waste_logs");
const CALCULATIONS: JsonTable = TableDefinition::new("calculations");
const ECO_POINTS: JsonTable = TableDefinition::new("eco_points");
const PURCHASES: JsonTable = TableDefinition::new("purchases");
const PRODUCTS: JsonTable = TableDefinition::new("products");
const LOCATIONS: JsonTable = TableDefinition::new("locations");
const EVENTS: JsonTable = TableDefinition::new("events");
const RECOMMENDATIONS: JsonTable = TableDefinition::new("recommendations");

const JSON_TABLES: [JsonTable; 9] = [
    USERS,
    WASTE_LOGS,
    CALCULATIONS,
    ECO_POINTS,
    PURCHASES,
    PRODUCTS,
    LOCATIONS,
    EVENTS,
    RECOMMENDATIONS,
];

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn key_at(ms: u64, id: Uuid) -> [u8; 24] {
    let mut key = [0u8; 24];
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(id.as_bytes());
    key
}

fn key_ms(key: &[u8]) -> u64 {
    let mut ms = [0u8; 8];
    ms.copy_from_slice(&key[..8]);
    u64::from_be_bytes(ms)
}

fn db_err(e: impl std::fmt::Display) -> WasteError {
    WasteError::Store(e.to_string())
}

fn new_token() -> String {
    format!("ww_{}", Uuid::new_v4().simple())
}

fn read_all<T: DeserializeOwned>(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
) -> Result<Vec<T>> {
    let mut result = Vec::new();
    for entry in table.iter().map_err(db_err)? {
        let (_, v) = entry.map_err(db_err)?;
        result.push(serde_json::from_slice(v.value())?);
    }
    Ok(result)
}

fn append_in<T: Serialize>(
    table: &mut redb::Table<'_, &'static [u8], &'static [u8]>,
    ts: DateTime<Utc>,
    id: Uuid,
    value: &T,
) -> Result<()> {
    let newest = table
        .last()
        .map_err(db_err)?
        .map(|(k, _)| key_ms(k.value()));
    let mut ms = ts.timestamp_millis().max(0) as u64;
    if let Some(newest) = newest {
        ms = ms.max(newest + 1);
    }
    let bytes = serde_json::to_vec(value)?;
    table
        .insert(key_at(ms, id).as_slice(), bytes.as_slice())
        .map_err(db_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Persistent store for every WasteWise record.
pub struct Store {
    db: Database,
}

impl Store {
    /// Open or create the redb database at `path`.
    ///
    /// Creates every table up front so later read transactions never miss one.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            crate::io::ensure_dir(parent)?;
        }
        let db = Database::create(path).map_err(db_err)?;
        let wt = db.begin_write().map_err(db_err)?;
        for table in JSON_TABLES {
            wt.open_table(table).map_err(db_err)?;
        }
        wt.open_table(TOKENS).map_err(db_err)?;
        wt.commit().map_err(db_err)?;
        tracing::debug!(path = %path.display(), "opened store");
        Ok(Self { db })
    }

    /// Open the database under a project root.
    pub fn open_root(root: &Path) -> Result<Self> {
        Self::open(&crate::paths::database_path(root))
    }

    fn put<T: Serialize>(&self, table: JsonTable, key: &[u8], value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut t = wt.open_table(table).map_err(db_err)?;
            t.insert(key, bytes.as_slice()).map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    /// Insert into a time-ordered table.
    ///
    /// Keys never go backwards: a record stamped at or before the newest key
    /// lands one millisecond after it, so iteration order is insertion order.
    fn append<T: Serialize>(
        &self,
        table: JsonTable,
        ts: DateTime<Utc>,
        id: Uuid,
        value: &T,
    ) -> Result<()> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut t = wt.open_table(table).map_err(db_err)?;
            append_in(&mut t, ts, id, value)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, table: JsonTable, key: &[u8]) -> Result<Option<T>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let t = rt.open_table(table).map_err(db_err)?;
        match t.get(key).map_err(db_err)? {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, table: JsonTable) -> Result<Vec<T>> {
        let rt = self.db.begin_read().map_err(db_err)?;
        let t = rt.open_table(table).map_err(db_err)?;
        read_all(&t)
    }

    // -----------------------------------------------------------------------
    // Users and tokens
    // -----------------------------------------------------------------------

    /// Insert a user and mint their first bearer token.
    pub fn create_user(&self, user: &User) -> Result<String> {
        let email = user.email.trim().to_lowercase();
        let token = new_token();
        let bytes = serde_json::to_vec(user)?;
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut users = wt.open_table(USERS).map_err(db_err)?;
            let existing: Vec<User> = read_all(&users)?;
            if existing.iter().any(|u| u.email.trim().to_lowercase() == email) {
                return Err(WasteError::UserExists(user.email.clone()));
            }
            users
                .insert(user.id.as_bytes().as_slice(), bytes.as_slice())
                .map_err(db_err)?;
            let mut tokens = wt.open_table(TOKENS).map_err(db_err)?;
            tokens
                .insert(token.as_str(), user.id.as_bytes().as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(token)
    }

    /// Mint an additional token for an existing user.
    pub fn issue_token(&self, user_id: Uuid) -> Result<String> {
        self.get_user(user_id)?;
        let token = new_token();
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut tokens = wt.open_table(TOKENS).map_err(db_err)?;
            tokens
                .insert(token.as_str(), user_id.as_bytes().as_slice())
                .map_err(db_err)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(token)
    }

    pub fn user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user_id = {
            let rt = self.db.begin_read().map_err(db_err)?;
            let tokens = rt.open_table(TOKENS).map_err(db_err)?;
            let found = tokens.get(token).map_err(db_err)?;
            match found {
                Some(v) => Uuid::from_slice(v.value()).map_err(db_err)?,
                None => return Ok(None),
            }
        };
        self.get(USERS, user_id.as_bytes())
    }

    pub fn get_user(&self, id: Uuid) -> Result<User> {
        self.get(USERS, id.as_bytes())?
            .ok_or_else(|| WasteError::UserNotFound(id.to_string()))
    }

    pub fn user_by_email(&self, email: &str) -> Result<User> {
        let wanted = email.trim().to_lowercase();
        self.list_users()?
            .into_iter()
            .find(|u| u.email.trim().to_lowercase() == wanted)
            .ok_or_else(|| WasteError::UserNotFound(email.to_string()))
    }

    /// All users, oldest first.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.scan(USERS)?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    // -----------------------------------------------------------------------
    // Waste logs
    // -----------------------------------------------------------------------

    pub fn insert_waste_log(&self, log: &WasteLog) -> Result<()> {
        self.append(WASTE_LOGS, log.created_at, log.id, log)
    }

    pub fn insert_waste_logs(&self, logs: &[WasteLog]) -> Result<()> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut t = wt.open_table(WASTE_LOGS).map_err(db_err)?;
            for log in logs {
                append_in(&mut t, log.created_at, log.id, log)?;
            }
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    /// A user's logs, most recent date first.
    pub fn waste_logs_for(&self, user_id: Uuid) -> Result<Vec<WasteLog>> {
        let mut logs: Vec<WasteLog> = self
            .scan::<WasteLog>(WASTE_LOGS)?
            .into_iter()
            .filter(|l| l.user_id == user_id)
            .collect();
        logs.sort_by(|a, b| {
            b.record
                .date
                .cmp(&a.record.date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(logs)
    }

    /// A user's logs dated on or after `since`, most recent first.
    pub fn waste_logs_since(&self, user_id: Uuid, since: NaiveDate) -> Result<Vec<WasteLog>> {
        Ok(self
            .waste_logs_for(user_id)?
            .into_iter()
            .filter(|l| l.record.date >= since)
            .collect())
    }

    // -----------------------------------------------------------------------
    // Calculations
    // -----------------------------------------------------------------------

    /// Save a calculation together with the points it earned.
    ///
    /// Both rows are written in one write transaction: either the
    /// calculation and its ledger entry land, or neither does.
    pub fn record_calculation(&self, calc: &CalculationRecord, award: &EcoPointEntry) -> Result<()> {
        let wt = self.db.begin_write().map_err(db_err)?;
        {
            let mut calcs = wt.open_table(CALCULATIONS).map_err(db_err)?;
            let mut ledger = wt.open_table(ECO_POINTS).map_err(db_err)?;
            append_in(&mut calcs, calc.created_at, calc.id, calc)?;
            append_in(&mut ledger, award.earned_at, award.id, award)?;
        }
        wt.commit().map_err(db_err)?;
        Ok(())
    }

    /// Up to `limit` of a user's calculations, newest first.
    pub fn recent_calculations(&self, user_id: Uuid, limit: usize) -> Result<Vec<CalculationRecord>> {
        let mut calcs: Vec<CalculationRecord> = self
            .scan::<CalculationRecord>(CALCULATIONS)?
            .into_iter()
            .filter(|c| c.user_id == user_id)
            .collect();
        calcs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        calcs.truncate(limit);
        Ok(calcs)
    }

    // -----------------------------------------------------------------------
    // Eco points and the store
    // -----------------------------------------------------------------------

    pub fn insert_eco_points(&self, entry: &EcoPointEntry) -> Result<()> {
        self.append(ECO_POINTS, entry.earned_at, entry.id, entry)
    }

    /// A user's ledger entries, newest first.
    pub fn eco_points_for(&self, user_id: Uuid) -> Result<Vec<EcoPointEntry>> {
        let mut entries: Vec<EcoPointEntry> = self
            .scan::<EcoPointEntry>(ECO_POINTS)?
            .into_iter()
            .filter(|e| e.user_id == user_id)
            .collect();
        entries.sort_by(|a, b| b.earned_at.cmp(&a.earned_at));
        Ok(entries)
    }

    pub fn purchases_for(&self, user_id: Uuid) -> Result<Vec<Purchase>> {
        let mut purchases: Vec<Purchase> = self
            .scan::<Purchase>(PURCHASES)?
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect();
        purchases.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at));
        Ok(purchases)
    }

    pub fn balance(&self, user_id: Uuid) -> Result<Balance> {
        let earned = self.eco_points_for(user_id)?;
        let spent = self.purchases_for(user_id)?;
        Ok(Balance::compute(&earned, &spent))
    }

    pub fn insert_product(&self, product: &Product) -> Result<()> {
        self.put(PRODUCTS, product.id.as_bytes(), product)
    }

    pub fn get_product(&self, id: Uuid) -> Result<Product> {
        self.get(PRODUCTS, id.as_bytes())?
            .ok_or_else(|| WasteError::ProductNotFound(id.to_string()))
    }

    /// Every product, cheapest first.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.scan(PRODUCTS)?;
        products.sort_by(|a, b| a.points_cost.cmp(&b.points_cost).then(a.name.cmp(&b.name)));
        Ok(products)
    }

    pub fn list_products_in_stock(&self) -> Result<Vec<Product>> {
        Ok(self
            .list_products()?
            .into_iter()
            .filter(|p| p.stock > 0)
            .collect())
    }

    /// Buy one unit of a product with eco points.
    ///
    /// Stock, balance, the stock decrement, and the purchase row are all
    /// checked and written in a single write transaction.
    pub fn purchase(&self, user_id: Uuid, product_id: Uuid) -> Result<Purchase> {
        let wt = self.db.begin_write().map_err(db_err)?;
        let purchase = {
            let mut products = wt.open_table(PRODUCTS).map_err(db_err)?;
            let mut purchases = wt.open_table(PURCHASES).map_err(db_err)?;
            let ledger = wt.open_table(ECO_POINTS).map_err(db_err)?;

            let mut product: Product = match products
                .get(product_id.as_bytes().as_slice())
                .map_err(db_err)?
            {
                Some(v) => serde_json::from_slice(v.value())?,
                None => return Err(WasteError::ProductNotFound(product_id.to_string())),
            };
            if product.stock == 0 {
                return Err(WasteError::OutOfStock(product.name));
            }

            let earned: Vec<EcoPointEntry> = read_all::<EcoPointEntry>(&ledger)?
                .into_iter()
                .filter(|e| e.user_id == user_id)
                .collect();
            let spent: Vec<Purchase> = read_all::<Purchase>(&purchases)?
                .into_iter()
                .filter(|p| p.user_id == user_id)
                .collect();
            let balance = Balance::compute(&earned, &spent);
            if !balance.can_afford(product.points_cost) {
                return Err(WasteError::InsufficientPoints {
                    available: balance.available_points,
                    required: product.points_cost,
                });
            }

            product.stock -= 1;
            let product_bytes = serde_json::to_vec(&product)?;
            products
                .insert(product_id.as_bytes().as_slice(), product_bytes.as_slice())
                .map_err(db_err)?;

            let purchase = Purchase {
                id: Uuid::new_v4(),
                user_id,
                product_id,
                points_spent: product.points_cost,
                purchased_at: Utc::now(),
            };
            append_in(&mut purchases, purchase.purchased_at, purchase.id, &purchase)?;
            purchase
        };
        wt.commit().map_err(db_err)?;
        Ok(purchase)
    }

    // -----------------------------------------------------------------------
    // Locations, events, recommendations
    // -----------------------------------------------------------------------

    pub fn insert_location(&self, location: &CommunityLocation) -> Result<()> {
        self.append(LOCATIONS, Utc::now(), location.id, location)
    }

    /// Locations in insertion order, optionally of one kind.
    pub fn list_locations(&self, kind: Option<LocationKind>) -> Result<Vec<CommunityLocation>> {
        Ok(self
            .scan::<CommunityLocation>(LOCATIONS)?
            .into_iter()
            .filter(|l| kind.is_none_or(|k| l.kind == k))
            .collect())
    }

    pub fn insert_event(&self, event: &DonationEvent) -> Result<()> {
        self.append(EVENTS, event.created_at, event.id, event)
    }

    pub fn events_for(&self, user_id: Uuid) -> Result<Vec<DonationEvent>> {
        let mut events: Vec<DonationEvent> = self
            .scan::<DonationEvent>(EVENTS)?
            .into_iter()
            .filter(|e| e.user_id == user_id)
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    pub fn insert_recommendation(&self, rec: &Recommendation) -> Result<()> {
        self.append(RECOMMENDATIONS, rec.created_at, rec.id, rec)
    }

    pub fn recommendations_for(&self, user_id: Uuid) -> Result<Vec<Recommendation>> {
        let mut recs: Vec<Recommendation> = self
            .scan::<Recommendation>(RECOMMENDATIONS)?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        recs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
