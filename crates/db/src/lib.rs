pub mod models;
pub mod store;

pub use store::{ProjectStore, StorageError, UserStore, default_data_dir};
