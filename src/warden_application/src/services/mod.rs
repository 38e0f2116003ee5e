pub mod access_guard;
pub mod scope_negotiator;
pub mod tfa_manager;

pub use access_guard::AccessGuard;
pub use scope_negotiator::{NegotiationError, ScopeNegotiator};
pub use tfa_manager::{TfaError, TfaManager, generate_secret};
