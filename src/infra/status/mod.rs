// Outbound status reporting.

pub mod webhook_client;

pub use webhook_client::{WebhookStatusReporter, DEFAULT_STATUS_WEBHOOK_URL};
