pub mod advisor;
pub mod baseline;
pub mod config;
pub mod data_fetch;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod feed;
pub mod football_data;
pub mod form;
pub mod goal_expectancy;
pub mod http_cache;
pub mod http_client;
pub mod leagues;
pub mod logging;
pub mod numeric;
pub mod outcome;
pub mod score_matrix;
pub mod secondary;
pub mod state;
pub mod strength;

pub use advisor::{MatchSuggestion, Tip, get_match_suggestion};
pub use engine::{EngineConfig, PredictionBundle, StatisticalEngine};
pub use error::EngineError;
