pub mod engine;
pub mod failover;
pub mod ids;

pub use engine::IterativeResolver;
pub use failover::{CandidateFailover, StageAnswer};
pub use ids::{IdSource, RandomIds, SeededIds};
