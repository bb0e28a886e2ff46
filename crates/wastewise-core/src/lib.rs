pub mod calc;
pub mod coach;
pub mod config;
pub mod ecopoints;
pub mod error;
pub mod geo;
pub mod io;
pub mod nudge;
pub mod paths;
pub mod seed;
pub mod store;
pub mod types;
pub mod validate;

pub use error::{Result, WasteError};
