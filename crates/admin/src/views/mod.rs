//! Feature-view framework.
//!
//! Views fetch on every request (mount), commit the outcome through a
//! generation-guarded [`ViewState`], filter locally and re-fetch after every
//! mutation by redirecting back to their list page.

pub mod filter;
pub mod resource;
pub mod state;
pub mod validation;

pub use filter::{Searchable, filter_records};
pub use resource::{FormView, ListView, ResourceDescriptor};
pub use state::{Commit, FetchTicket, LoadState, ViewState};
pub use validation::{FormValues, ValidationError};
