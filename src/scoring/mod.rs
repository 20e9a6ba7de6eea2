pub mod config;
pub mod engine;
pub mod similarity;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, clamp_score, ScoreResult, MATCH_THRESHOLD};
pub use similarity::{
    best_match_rating, email_similarity, find_best_match, name_similarity, phone_similarity,
    BestMatch, LocalSimilarity,
};
pub use validation::validate_scoring;
