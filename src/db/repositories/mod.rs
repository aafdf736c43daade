pub mod content;
pub mod user;
pub mod view_history;
pub mod watchlist;
