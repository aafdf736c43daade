pub mod omdb;

pub use omdb::{ExternalCandidate, OmdbClient};
