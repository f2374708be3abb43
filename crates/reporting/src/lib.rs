//! Employer-facing aggregate analytics, computed on demand from ledger,
//! catalog, and profile snapshots.

pub mod summary;
pub mod trends;

pub use summary::{employer_summary, CategoryShare, DailyUsage, EmployerSummary};
pub use trends::{sector_trends, SectorUsage};
