// Models module
// Request/response shapes for the REST API

pub mod movie;
pub mod user;

pub use movie::{DeleteOutcome, InsertOutcome};
pub use user::{AddFavoriteRequest, FavoritesUpdate, ListUsersQuery};
