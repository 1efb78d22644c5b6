use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("No tracks available")]
    NoTracksAvailable,

    #[error("Could not find a playable track")]
    RetryBudgetExhausted,
}
