pub mod search;
pub use search::{MetadataProvider, SearchHit, SearchOutcome, SearchService};

pub mod history;
pub use history::ViewRecorder;

pub mod watchlist;
pub use watchlist::{WatchlistError, WatchlistService};

pub mod content;
pub use content::ContentService;

pub mod users;
pub use users::{UserError, UserService};

pub mod stats;
pub use stats::{StatsService, SystemOverview};
