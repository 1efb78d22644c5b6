//! The quiz itself: scope selection, non-repeating draws, the excerpt
//! session and the thread that owns it.

mod error;
mod player;
mod pool;
mod probe;
mod random;
mod session;
mod thread;
mod types;

pub use player::QuizPlayer;
pub use types::{Phase, QuizCmd, QuizState};
