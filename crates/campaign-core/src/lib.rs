pub mod action;
pub mod config;
pub mod error;
pub mod io;
pub mod month;
pub mod paths;
pub mod progress;
pub mod report;
pub mod store;
pub mod summary;
pub mod task;
pub mod types;
pub mod validate;

pub use error::{CampaignError, Result};
