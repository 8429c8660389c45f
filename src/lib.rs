// Library for tests to access modules

pub mod config;
pub mod error;
pub mod metrics_store;
pub mod models;
pub mod parser;
pub mod routes;
pub mod sampler;
pub mod stats_source;
pub mod units;
