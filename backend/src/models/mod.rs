pub mod contest;
pub mod party;
pub mod ranklist_row;
pub mod rated_user;
pub mod rating_change;

pub use contest::{Contest, ContestPhase};
pub use party::Party;
pub use ranklist_row::RanklistRow;
pub use rated_user::RatedUser;
pub use rating_change::RatingChange;
