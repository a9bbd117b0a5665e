pub mod dialog;
pub mod table;

pub use dialog::Dialog;
pub use table::{ContactCache, ContactTable, ListState};
