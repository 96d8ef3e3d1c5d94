mod awards;
mod bonus_stars;
mod coins;
mod minigames;
mod placement;

pub use awards::SingleWinnerAwardCalculator;
pub use bonus_stars::BonusStarCalculator;
pub use coins::CoinCalculator;
pub use minigames::MinigameCalculator;
pub use placement::PlacementCalculator;
