pub mod firestore;
pub mod models;
pub mod repository;
pub mod sample;
pub mod store;

pub use firestore::FirestoreStore;
pub use models::*;
pub use repository::MenuRepository;
pub use store::{Document, DocumentStore, StoreError};
