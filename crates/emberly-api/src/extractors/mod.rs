//! Request extractors.

pub mod acting_user;
pub mod pagination;

pub use acting_user::ActingUser;
pub use pagination::PaginationParams;
