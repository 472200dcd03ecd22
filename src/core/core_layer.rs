// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "access/mod.rs"]
pub mod access;

#[path = "ledger/mod.rs"]
pub mod ledger;

#[path = "messaging/mod.rs"]
pub mod messaging;

#[path = "presence/mod.rs"]
pub mod presence;
