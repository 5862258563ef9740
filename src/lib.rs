pub mod api;
pub mod config;
pub mod flow;
pub mod models;
pub mod stores;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use config::Config;
pub use stores::AppStores;
