// Jobcast Infra - Push delivery adapter

mod sender;

pub use sender::LoggingPushSender;
