// Adapters layer: concrete implementations for external systems (Twilio REST API, local state storage).

pub mod storage;
pub mod twilio;
