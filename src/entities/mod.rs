pub mod prelude;

pub mod content;
pub mod users;
pub mod view_history;
pub mod watchlist;
