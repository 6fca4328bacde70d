pub mod constants;
pub mod export;
pub mod ledger;
pub mod log_reader;
pub mod prepass;
pub mod replay;
pub mod report;
pub mod summary;
pub mod types;
pub mod world;

pub use replay::{validate, ReplayEngine, ReplayOutcome};
pub use report::{IssueReport, IssueSink};
pub use types::{IssueCategory, Record};
pub use world::HouseLayout;
