pub mod ledger;
pub mod sweep_cache;

pub use ledger::ProcessedLedger;
pub use sweep_cache::SweepCache;
