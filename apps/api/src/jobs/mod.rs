pub mod handlers;
pub mod memory_store;
pub mod pg_store;
pub mod query;
pub mod seed;
pub mod store;
pub mod validation;
