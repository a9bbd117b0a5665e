use std::future::Future;

use crate::domain::Draft;
use crate::errors::AppError;

/// Modal form with the two required draft fields.
#[derive(Debug)]
pub struct Dialog {
    title: String,
    id: String,
    open: bool,
}

impl Dialog {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            id: format!("modal_{}", title),
            open: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Runs `handler` with a copy of `draft` once both fields are filled in,
    /// then closes whether the handler succeeded or not.
    ///
    /// An empty field blocks submission: the handler is not called and the
    /// dialog stays open.
    pub async fn submit<F, Fut, T>(&mut self, draft: &Draft, handler: F) -> Result<T, AppError>
    where
        F: FnOnce(Draft) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(field) = draft.missing_field() {
            return Err(AppError::Validation(format!("{} is required", field.label())));
        }

        let result = handler(draft.clone()).await;
        self.close();
        result
    }

    pub fn render(&self, draft: &Draft) -> String {
        format!(
            "[{}]\n  E-Mail: {}\n  Name:   {}",
            self.title, draft.email, draft.name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DraftField;

    fn filled_draft() -> Draft {
        Draft {
            email: "a@x.com".to_string(),
            name: "A".to_string(),
        }
    }

    #[test]
    fn id_derives_from_title() {
        assert_eq!(Dialog::new("Add").id(), "modal_Add");
        assert_eq!(Dialog::new("Edit").id(), "modal_Edit");
    }

    #[tokio::test]
    async fn submit_closes_after_handler() {
        let mut dialog = Dialog::new("Add");
        dialog.show();

        let seen = dialog
            .submit(&filled_draft(), |draft| async move { Ok::<_, AppError>(draft.email) })
            .await
            .unwrap();

        assert_eq!(seen, "a@x.com");
        assert!(!dialog.is_open());
    }

    #[tokio::test]
    async fn submit_closes_even_when_handler_fails() {
        let mut dialog = Dialog::new("Edit");
        dialog.show();

        let result: Result<(), _> = dialog
            .submit(&filled_draft(), |_| async {
                Err::<(), _>(AppError::NotFound("Contact".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(!dialog.is_open());
    }

    #[tokio::test]
    async fn empty_field_blocks_submission() {
        let mut dialog = Dialog::new("Add");
        dialog.show();
        let mut draft = filled_draft();
        draft.set(DraftField::Name, "");
        let mut called = false;

        let result = dialog
            .submit(&draft, |_| {
                called = true;
                async { Ok::<(), AppError>(()) }
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Name is required"));
        assert!(!called);
        assert!(dialog.is_open());
    }
}
