//! Rider-facing transit information server.
//!
//! Answers "what stops are near me, what's departing soon, and what does
//! this route's week look like?" from a normalized static-transit dataset,
//! and proxies the vendor's real-time feed behind a short TTL cache.

pub mod board;
pub mod domain;
pub mod locator;
pub mod realtime;
pub mod store;
pub mod timetable;
pub mod web;
