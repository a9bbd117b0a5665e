use serde::{Deserialize, Serialize};

/// One email/name record as held by the remote store.
///
/// `email` is the only stable key: rows, selection and edit targets are all
/// identified by it. The numeric `id` is only present when the backend
/// reports it and is never sent back on the `/emails` resource.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Contact {
    #[serde(default, skip_serializing)]
    pub id: Option<u64>,

    pub email: String,
    pub name: String,
}

impl Contact {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Contact {
            id: None,
            email: email.into(),
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn same_key(&self, other: &Contact) -> bool {
        self.email == other.email
    }
}

/// Body of `POST /emails`.
#[derive(Debug, Serialize, PartialEq)]
pub struct NewContact<'a> {
    pub email: &'a str,
    pub name: &'a str,
}

/// Body of `PUT /emails`. The record is addressed by `old_email`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate<'a> {
    pub old_email: &'a str,
    pub new_email: &'a str,
    pub name: &'a str,
}

/// Body of `DELETE /emails`.
#[derive(Debug, Serialize, PartialEq)]
pub struct ContactKey<'a> {
    pub email: &'a str,
}

/// Body of `POST /send-email`.
#[derive(Debug, Serialize, PartialEq)]
pub struct EmailDispatch<'a> {
    pub subject: &'a str,
    pub content: &'a str,
    pub to_emails: &'a [u64],
}
