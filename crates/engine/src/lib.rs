pub mod candidates;
pub mod engine;
pub mod index;
pub mod summary;

pub use candidates::{CandidateRef, SourceIndexes};
pub use engine::{reconcile, ReconcileEngine, Reconciliation};
pub use index::BankIndex;
pub use summary::UnmatchedBank;
