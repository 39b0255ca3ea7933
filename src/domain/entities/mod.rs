//! Core domain entities.
//!
//! Plain data structures with a little invariant logic attached.
//!
//! - [`Link`] - A short code mapped to an original URL
//! - [`Actor`] - The authenticated caller
//! - [`DailyClicks`] - A per-day redirect counter
//!
//! Creation and mutation inputs live next to their entity (`NewLink`, `LinkPatch`).

pub mod actor;
pub mod click;
pub mod link;

pub use actor::Actor;
pub use click::{DailyClicks, total_clicks};
pub use link::{Link, LinkPatch, NewLink};
