//! Shared value types: typed identifiers, pagination, geography.

pub mod geo;
pub mod id;
pub mod pagination;

pub use geo::GeoPoint;
pub use id::{MatchId, NotificationId, UserId};
pub use pagination::{PageRequest, PageResponse};
