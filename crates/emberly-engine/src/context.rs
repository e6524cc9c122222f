//! Request context carrying the acting user.
//!
//! Authentication is handled upstream; the gateway forwards the user id
//! and middleware builds one context per request. Passing it explicitly
//! keeps services free of ambient request state.

use chrono::{DateTime, Utc};

use emberly_core::types::UserId;

/// Context for the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context stamped with the current time.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }

    /// Creates a context with an explicit request time.
    pub fn at(user_id: UserId, request_time: DateTime<Utc>) -> Self {
        Self {
            user_id,
            request_time,
        }
    }
}
