//! Real-time vendor feed client and cache.
//!
//! The vendor's GTFS-R endpoint is rate-limited, so the whole process
//! shares one TTL-bounded snapshot of the feed. Key characteristics:
//!
//! - the payload is opaque: it is passed through to riders unmodified
//! - the cache lock spans the refresh fetch, so concurrent misses collapse
//!   into a single upstream call
//! - a failed refresh keeps the stale snapshot but never serves it

mod cache;
mod client;
mod error;

pub use cache::{FEED_TTL, FeedSnapshot, RealtimeFeedCache};
pub use client::{FeedConfig, FeedFetch, VendorFeedClient};
pub use error::FeedError;
