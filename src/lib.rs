pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod ui;

pub use app::{Action, App};
pub use error::{Result, StockError};
