// Implementations of the ledger store.
#![allow(unused_imports)]

pub mod in_memory;
pub mod sqlite_store;

pub use in_memory::InMemoryLedgerStore;
pub use sqlite_store::SqliteLedgerStore;
