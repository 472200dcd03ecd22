// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "ledger/ledger_store.rs"]
pub mod ledger;

#[path = "status/mod.rs"]
pub mod status;
