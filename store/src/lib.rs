pub mod database;

pub use database::{DrawRecord, Store, StoreError};
