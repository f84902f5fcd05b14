// Jobcast Infra - SQLite document store adapter

mod connection;
mod document_store;
mod migration;

pub use connection::create_pool;
pub use document_store::SqliteDocumentStore;
pub use migration::run_migrations;
