pub mod config;
pub mod enrich;
pub mod error;
pub mod geo;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod store;
