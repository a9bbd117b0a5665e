pub use crate::cache::{QueryCache, QueryKey};
pub use crate::cli::{command, run::run_app};
pub use crate::config::Config;
pub use crate::domain::{Contact, Draft, DraftField, Selection};
pub use crate::errors::{AppError, StoreError};
pub use crate::store::{ContactStore, HttpContactStore};
pub use crate::view::{ContactCache, ContactTable, Dialog, ListState};
