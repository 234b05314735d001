pub mod client;
pub mod enrichment;

pub use client::{ApiClient, MovieApi};
pub use enrichment::{enrich_batch, DetailPolicy};
