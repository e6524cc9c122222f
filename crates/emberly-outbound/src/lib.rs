//! # emberly-outbound
//!
//! Integrations with the services the engine consumes as opaque
//! collaborators: the profile/user directory and the push and email
//! providers. Each capability is a trait with an HTTP implementation for
//! production and an in-memory implementation for tests and local runs.

pub mod directory;
pub mod sender;
pub mod senders;

pub use directory::{UserDirectory, build_directory};
pub use sender::{ChannelSender, SendError};
