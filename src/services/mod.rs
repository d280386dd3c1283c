pub mod dashboard_service;
pub mod ingestion_service;
pub mod mastery_service;
pub mod processor;
pub mod queue_service;
pub mod risk_service;
pub mod rollup_service;
