use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{ContactStore, RESOURCE, SEND_RESOURCE};
use crate::domain::Contact;
use crate::domain::contact::{ContactKey, ContactUpdate, EmailDispatch, NewContact};
use crate::errors::{AppError, StoreError};

/// [`ContactStore`] backed by the REST service at `base_url`.
pub struct HttpContactStore {
    client: Client,
    emails_url: Url,
    send_url: Url,
}

impl HttpContactStore {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_client(Client::new(), base_url)
    }

    /// This constructor resolves both endpoints once, so a bad base url is
    /// reported here instead of on the first request.
    ///
    /// A base url with a path (`http://host/api`) is treated as a directory:
    /// the resources resolve to `http://host/api/emails` and so on.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "'{}' cannot be used as a base url",
                base_url
            )));
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            emails_url: base_url.join(RESOURCE)?,
            send_url: base_url.join(SEND_RESOURCE)?,
        })
    }

    pub fn emails_url(&self) -> &Url {
        &self.emails_url
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await?;
        let response = check_status(response).await?;

        let body = response.bytes().await?;
        if body.is_empty() {
            // Mutations may answer with an empty body; decode that as `null`.
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turns a non-success response into the matching [`StoreError`].
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    match serde_json::from_str::<Value>(&body) {
        Ok(detail @ Value::Object(_)) => Err(StoreError::Server { status, detail }),
        _ => Err(StoreError::MalformedErrorResponse { status, body }),
    }
}

fn log_failure(action: &str) -> impl FnOnce(&StoreError) + '_ {
    move |err: &StoreError| log::error!("Error {}: {}", action, err)
}

#[async_trait]
impl ContactStore for HttpContactStore {
    async fn list(&self) -> Result<Vec<Contact>, StoreError> {
        let request = self.client.get(self.emails_url.clone());

        self.execute(request)
            .await
            .inspect_err(log_failure("fetching emails"))
    }

    async fn create(&self, email: &str, name: &str) -> Result<Value, StoreError> {
        let request = self
            .client
            .post(self.emails_url.clone())
            .json(&NewContact { email, name });

        self.execute(request)
            .await
            .inspect_err(log_failure("adding email"))
    }

    async fn update(
        &self,
        old_email: &str,
        new_email: &str,
        name: &str,
    ) -> Result<Value, StoreError> {
        let request = self.client.put(self.emails_url.clone()).json(&ContactUpdate {
            old_email,
            new_email,
            name,
        });

        self.execute(request)
            .await
            .inspect_err(log_failure("editing email"))
    }

    async fn remove(&self, email: &str) -> Result<Value, StoreError> {
        // The key travels in a JSON body on DELETE, not in the query string.
        let request = self
            .client
            .delete(self.emails_url.clone())
            .json(&ContactKey { email });

        self.execute(request)
            .await
            .inspect_err(log_failure("removing email"))
    }

    async fn send_email(
        &self,
        subject: &str,
        content: &str,
        contact_ids: &[u64],
    ) -> Result<Value, StoreError> {
        let request = self.client.post(self.send_url.clone()).json(&EmailDispatch {
            subject,
            content,
            to_emails: contact_ids,
        });

        self.execute(request)
            .await
            .inspect_err(log_failure("sending email"))
    }
}
