pub mod configuration;
pub mod domain;
pub mod purge;
pub mod purge_log;
pub mod repository;
pub mod seed;
pub mod store;
pub mod telemetry;
pub mod utils;
