pub mod remote;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Contact;
use crate::errors::StoreError;

pub use remote::HttpContactStore;

/// Fixed resource name of the contact list on the remote store.
pub const RESOURCE: &str = "emails";

/// Resource used to mail a set of contacts by id.
pub const SEND_RESOURCE: &str = "send-email";

/// Operations offered by the remote contact store.
///
/// Mutations return whatever acknowledgement the store sends back; callers
/// should not rely on its shape and refetch the list instead.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Contact>, StoreError>;

    async fn create(&self, email: &str, name: &str) -> Result<Value, StoreError>;

    /// Replaces email and name of the record currently keyed by `old_email`.
    async fn update(&self, old_email: &str, new_email: &str, name: &str)
    -> Result<Value, StoreError>;

    async fn remove(&self, email: &str) -> Result<Value, StoreError>;

    async fn send_email(
        &self,
        subject: &str,
        content: &str,
        contact_ids: &[u64],
    ) -> Result<Value, StoreError>;
}
