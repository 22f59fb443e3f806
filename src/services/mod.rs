pub mod generators;
pub mod posters;
pub mod recommendations;
pub mod similarity;
pub mod title_match;

pub use recommendations::{rank, Recommender, RECOMMENDATION_LIMIT};
pub use title_match::{best_match, reconcile, TitleMatch};
