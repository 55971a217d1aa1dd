pub mod registry;
pub mod service;

pub use registry::{SessionRegistry, SharedSessionRegistry};
pub use service::{LoginResult, ResolvedSession, SessionService};
