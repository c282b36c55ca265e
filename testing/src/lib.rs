//! Test support for Roomledger.
//!
//! In-memory implementations of every store trait, a serialized in-memory
//! booking ledger, a pinnable clock, mock collaborators, and fixture
//! builders. Unit and HTTP tests run against these; the Postgres crate is
//! exercised separately against a live database.

pub mod clock;
pub mod dispatch;
pub mod fixtures;
pub mod ledger;
pub mod memory;
pub mod verifier;

pub use clock::FixedClock;
pub use dispatch::{RecordingDispatcher, SentMessage};
pub use ledger::MemoryLedger;
pub use memory::MemoryStore;
pub use verifier::StaticTokenVerifier;
