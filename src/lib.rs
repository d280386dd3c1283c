pub mod config;
pub mod db;
pub mod domain;
pub mod logging;
pub mod metrics;
pub mod repos;
pub mod services;
pub mod validation;
pub mod worker;

pub use config::Config;
pub use metrics::Metrics;
