// Core ledger module - XP bookkeeping per guild member.

pub mod ledger_service;

pub use ledger_service::*;
