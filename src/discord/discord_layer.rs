// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

pub mod access;

use crate::core::access::AccessPolicy;
use crate::core::ledger::LedgerService;
use crate::core::presence::PresenceController;
use crate::infra::ledger::SqliteLedgerStore;
use crate::infra::status::WebhookStatusReporter;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
pub struct Data {
    pub ledger: Arc<LedgerService<SqliteLedgerStore>>,
    pub presence: Arc<PresenceController<WebhookStatusReporter>>,
    pub access: AccessPolicy,
    pub link_url: String,
}
