pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod ui;

pub use db::Store;
pub use error::{StoreError, ValidationError};
pub use models::{Entity, Money};
