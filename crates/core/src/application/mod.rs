// Application Layer - Reactive notification handlers and dispatch

pub mod constants;
pub mod customer_notifier;
pub mod dispatcher;
pub mod worker_notifier;


// Re-exports
pub use customer_notifier::CustomerNotifier;
pub use dispatcher::{ChangeEvent, ChangeHandler, ChangeKind, Dispatcher, TriggerBinding};
pub use worker_notifier::WorkerNotifier;
