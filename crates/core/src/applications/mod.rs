mod operations;
mod requests;
mod types;

pub use operations::{sort_newest_first, status_by_job};
pub use requests::{ApplyRequest, UpdateStatusRequest};
pub use types::{Application, ApplicationStatus};
