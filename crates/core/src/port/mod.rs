// Port Layer - Interfaces for external collaborators

pub mod document_store;
pub mod push_sender;

// Re-exports
pub use document_store::{DocId, Document, DocumentStore, Filter};
pub use push_sender::{DeviceToken, MulticastOutcome, PushSender};
