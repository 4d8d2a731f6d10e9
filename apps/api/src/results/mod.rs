// Completed session results: persistence and the HR dashboard queries over them.

pub mod dashboard;
pub mod handlers;
pub mod postgres;
pub mod store;

pub use postgres::PgResultStore;
pub use store::{MemoryResultStore, ResultStore, StoreError, StoredResult};
