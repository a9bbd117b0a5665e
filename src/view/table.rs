use std::collections::HashSet;
use std::sync::Arc;

use num_format::{Locale, ToFormattedString};
use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::dialog::Dialog;
use crate::cache::{QueryCache, QueryKey};
use crate::domain::{Contact, Draft, DraftField, Selection};
use crate::errors::{AppError, StoreError};
use crate::store::ContactStore;

pub type ContactCache = QueryCache<Vec<Contact>>;

const HEADING: &str = "E-Mail Automation";
const SPINNER: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Error(String),
    Ready(Vec<Contact>),
}

/// Contact list view.
///
/// Owns the list state, the shared draft for the add and edit dialogs and the
/// checkbox selection. Every mutation goes through the cache, so the rows
/// only change after [`ContactTable::sync`] refetches them.
pub struct ContactTable {
    store: Arc<dyn ContactStore>,
    cache: Arc<ContactCache>,
    invalidations: broadcast::Receiver<QueryKey>,
    state: ListState,
    draft: Draft,
    selection: Selection,
    add_dialog: Dialog,
    edit_dialog: Dialog,
    edit_target: Option<String>,
    notice: Mutex<Option<String>>,
}

impl ContactTable {
    pub fn new(store: Arc<dyn ContactStore>, cache: Arc<ContactCache>) -> Self {
        let invalidations = cache.subscribe();

        Self {
            store,
            cache,
            invalidations,
            state: ListState::Loading,
            draft: Draft::default(),
            selection: Selection::default(),
            add_dialog: Dialog::new("Add"),
            edit_dialog: Dialog::new("Edit"),
            edit_target: None,
            notice: Mutex::new(None),
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    /// Rows of the last successful fetch; empty while loading or on error.
    pub fn rows(&self) -> &[Contact] {
        match &self.state {
            ListState::Ready(rows) => rows,
            _ => &[],
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn add_dialog(&self) -> &Dialog {
        &self.add_dialog
    }

    pub fn edit_dialog(&self) -> &Dialog {
        &self.edit_dialog
    }

    /// Message of the last failed mutation, cleared by the next success.
    pub fn notice(&self) -> Option<String> {
        self.notice.lock().clone()
    }

    /// Reads the list through the cache. Fresh cached rows are reused.
    pub async fn load(&mut self) {
        let store = Arc::clone(&self.store);
        let result = self
            .cache
            .fetch(QueryKey::Emails, || async move { store.list().await })
            .await;

        self.apply(result);
    }

    /// Refetches once if the list was invalidated since the last call,
    /// however many invalidations arrived. Returns whether it refetched.
    ///
    /// The previous rows stay in place until the refetch resolves.
    pub async fn sync(&mut self) -> bool {
        let mut invalidated = false;

        loop {
            match self.invalidations.try_recv() {
                Ok(QueryKey::Emails) => invalidated = true,
                Err(TryRecvError::Lagged(missed)) => {
                    log::debug!("Missed {} invalidation events", missed);
                    invalidated = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        if invalidated {
            self.load().await;
        }
        invalidated
    }

    /// Forces a refetch regardless of cache freshness.
    pub async fn refresh(&mut self) {
        self.cache.invalidate(QueryKey::Emails);
        self.sync().await;
    }

    fn apply(&mut self, result: Result<Vec<Contact>, StoreError>) {
        self.state = match result {
            Ok(rows) => {
                warn_on_duplicate_keys(&rows);
                self.selection.refresh(&rows);
                ListState::Ready(rows)
            }
            Err(err) => ListState::Error(err.message()),
        };
    }

    fn find(&self, email: &str) -> Option<&Contact> {
        self.rows().iter().find(|c| c.email == email)
    }

    fn row(&self, email: &str) -> Result<Contact, AppError> {
        self.find(email)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Contact '{}'", email)))
    }

    fn record(&self, action: &str, result: &Result<(), AppError>) {
        let mut notice = self.notice.lock();
        match result {
            Ok(()) => *notice = None,
            Err(err) => *notice = Some(format!("Could not {}: {}", action, err)),
        }
    }

    pub fn set_input(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Opens the add dialog on an empty draft.
    pub fn open_add(&mut self) {
        self.draft.clear();
        self.add_dialog.show();
    }

    /// Creates a contact from the draft. Unless the draft was incomplete, the
    /// draft is cleared and the dialog closed even if the store rejected it.
    pub async fn submit_add(&mut self) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);
        let cache = Arc::clone(&self.cache);

        let result = self
            .add_dialog
            .submit(&self.draft, |draft| async move {
                cache
                    .mutate(QueryKey::Emails, store.create(&draft.email, &draft.name))
                    .await?;
                Ok::<(), AppError>(())
            })
            .await;

        if matches!(result, Err(AppError::Validation(_))) {
            return result;
        }

        self.record(&format!("add {}", self.draft.email), &result);
        self.draft.clear();
        result
    }

    /// Copies the row into the draft and pins its current email as the key
    /// the update will address.
    pub fn open_edit(&mut self, email: &str) -> Result<(), AppError> {
        let contact = self.row(email)?;

        self.draft = Draft::from_contact(&contact);
        self.edit_target = Some(contact.email);
        self.edit_dialog.show();
        Ok(())
    }

    /// Sends the draft as the new email and name of the row picked in
    /// [`ContactTable::open_edit`]. The draft is left as it is.
    pub async fn submit_edit(&mut self) -> Result<(), AppError> {
        let old_email = self
            .edit_target
            .clone()
            .ok_or_else(|| AppError::NotFound("Contact to edit".to_string()))?;
        let store = Arc::clone(&self.store);
        let cache = Arc::clone(&self.cache);

        let result = self
            .edit_dialog
            .submit(&self.draft, |draft| async move {
                cache
                    .mutate(
                        QueryKey::Emails,
                        store.update(&old_email, &draft.email, &draft.name),
                    )
                    .await?;
                Ok::<(), AppError>(())
            })
            .await;

        if matches!(result, Err(AppError::Validation(_))) {
            return result;
        }

        self.record(&format!("edit {}", self.draft.email), &result);
        self.edit_target = None;
        result
    }

    pub fn close_dialogs(&mut self) {
        self.add_dialog.close();
        self.edit_dialog.close();
        self.edit_target = None;
    }

    /// Deletes the contact right away. Several removals may run at once.
    pub async fn remove(&self, email: &str) -> Result<(), AppError> {
        let result = self
            .cache
            .mutate(QueryKey::Emails, self.store.remove(email))
            .await
            .map(|_| ())
            .map_err(AppError::from);

        self.record(&format!("remove {}", email), &result);
        result
    }

    /// Ticks or unticks the row. Returns whether it is selected afterwards.
    pub fn toggle_selected(&mut self, email: &str) -> Result<bool, AppError> {
        let contact = self.row(email)?;
        Ok(self.selection.toggle(&contact))
    }

    /// Mails every selected contact through the store. The selection is
    /// cleared once the store accepts the request.
    pub async fn send_to_selected(&mut self, subject: &str, content: &str) -> Result<(), AppError> {
        if subject.is_empty() {
            return Err(AppError::Validation("Subject is required".to_string()));
        }
        if self.selection.is_empty() {
            return Err(AppError::Validation("No contact selected".to_string()));
        }

        let ids = self.selection.ids().ok_or_else(|| {
            AppError::Validation("Selected contacts have no id on the store".to_string())
        })?;

        let result = self
            .store
            .send_email(subject, content, &ids)
            .await
            .map(|_| ())
            .map_err(AppError::from);

        self.record("send email", &result);
        if result.is_ok() {
            self.selection.clear();
        }
        result
    }

    /// Text shown in the stat block: the row count, or a spinner while the
    /// first fetch is in flight.
    pub fn stat(&self) -> String {
        if self.is_loading() {
            SPINNER.to_string()
        } else {
            self.rows().len().to_formatted_string(&Locale::en)
        }
    }

    pub fn render(&self) -> String {
        let header = format!("{:<4} {:<32} {:<24}", "", "E-Mail", "Name");
        let mut lines = vec![
            HEADING.to_string(),
            format!("Collected E-Mails: {}", self.stat()),
        ];
        if let Some(at) = self.cache.fetched_at(QueryKey::Emails) {
            lines.push(format!("Last synced: {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
        }
        lines.push(String::new());
        lines.push(header.trim_end().to_string());

        match &self.state {
            ListState::Loading => lines.push(format!("{:^60}", "Loading...")),
            ListState::Error(message) => lines.push(format!("Error loading emails: {}", message)),
            ListState::Ready(rows) => {
                for contact in rows {
                    let mark = if self.selection.contains(&contact.email) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    let line = format!("{:<4} {:<32} {:<24}", mark, contact.email, contact.name);
                    lines.push(line.trim_end().to_string());
                }
            }
        }

        lines.push(header.trim_end().to_string());

        if let Some(notice) = self.notice() {
            lines.push(format!("! {}", notice));
        }
        for dialog in [&self.add_dialog, &self.edit_dialog] {
            if dialog.is_open() {
                lines.push(format!("\n{}", dialog.render(&self.draft)));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn warn_on_duplicate_keys(rows: &[Contact]) {
    let mut seen = HashSet::new();
    for contact in rows {
        if !seen.insert(contact.email.as_str()) {
            log::warn!(
                "Store returned '{}' more than once; actions target the first row",
                contact.email
            );
        }
    }
}
