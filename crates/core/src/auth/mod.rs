//! Actors and the pure authorization rules applied to them.
//!
//! Authentication itself happens upstream; the server receives an already
//! verified actor id and role and only decides what that actor may do.

mod error;
mod functions;
mod types;

pub use error::AccessError;
pub use functions::{can_view_application, require_owner, require_role};
pub use types::{Actor, Role};
