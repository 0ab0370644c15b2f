pub mod period;
pub mod player;
pub mod player_score;

pub use period::{Period, ScoreScan, Slice};
pub use player::Player;
pub use player_score::PlayerScore;
