pub use super::content::Entity as Content;
pub use super::users::Entity as Users;
pub use super::view_history::Entity as ViewHistory;
pub use super::watchlist::Entity as Watchlist;
