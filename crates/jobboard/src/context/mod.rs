//! Request-scoped context module.
//!
//! Provides the `RequestContext` and `CurrentActor` extractors that bundle
//! request-scoped state to complement application-scoped `AppState`.

mod extractor;
mod types;

pub use extractor::{USER_ID_HEADER, USER_ROLE_HEADER};
pub use types::{CurrentActor, RequestContext};
