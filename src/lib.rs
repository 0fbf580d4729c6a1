pub mod api;
pub mod backfill;
pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod fixture;
pub mod flatten;
pub mod http_client;
pub mod lookup;
pub mod writer;
