pub const API_PREFIX: &str = "/api/v1";

pub mod limits {

    pub const DEFAULT_PAGE_SIZE: u64 = 50;

    pub const MAX_PAGE_SIZE: u64 = 100;
}

pub mod history {

    /// Watch dates before this day are treated as data-entry mistakes.
    pub const EARLIEST_WATCH_DATE: &str = "2020-01-01T00:00:00+00:00";

    /// Window for the "recent views" counter in user statistics.
    pub const RECENT_WINDOW_DAYS: i64 = 30;
}
