//! Schema types for values held in the durable store
//!
//! Records that the client shell also writes (session, network) preserve
//! unknown fields so a round trip through this crate never drops data.

mod network;
mod route;
mod session;
mod version;

pub use network::NetworkState;
pub use route::Route;
pub use session::SessionRecord;
pub use version::VersionHash;
