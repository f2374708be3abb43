pub mod config;
pub mod error;
pub mod member;
pub mod perk;
pub mod purchase;

pub use config::AppConfig;
pub use error::{VantaError, VantaResult};
