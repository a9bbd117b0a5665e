pub mod contact;
pub mod draft;
pub mod selection;

pub use contact::Contact;
pub use draft::{Draft, DraftField};
pub use selection::Selection;
