pub mod classify;
pub mod compare;
pub mod config;
pub mod index;
pub mod matcher;
pub mod statistics;

pub use classify::{classify, ClassificationTier, TierCounts};
pub use compare::{compare, compare_until, Comparison};
pub use config::{ConfigError, MaxDistance};
pub use index::{build_index, query_nearest, Neighbor, SpatialIndex};
pub use matcher::{match_all, match_all_until, Interrupted, MatchResult};
pub use statistics::{summarize, Statistics, StatisticsSummary};
