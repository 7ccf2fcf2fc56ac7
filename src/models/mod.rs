pub mod favorites;
pub mod place;
pub mod users;

pub use favorites::{FavoriteRow, FavoriteToggle};
pub use place::{Place, RawPlace};
pub use users::UsersRow;
