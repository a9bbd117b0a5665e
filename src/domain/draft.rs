use super::Contact;

/// Form field of a [`Draft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Email,
    Name,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Email => "E-Mail",
            DraftField::Name => "Name",
        }
    }
}

/// Transient form state shared by the add and edit dialogs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Draft {
    pub email: String,
    pub name: String,
}

impl Draft {
    pub fn from_contact(contact: &Contact) -> Self {
        Draft {
            email: contact.email.clone(),
            name: contact.name.clone(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        match field {
            DraftField::Email => self.email = value.into(),
            DraftField::Name => self.name = value.into(),
        }
    }

    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Email => &self.email,
            DraftField::Name => &self.name,
        }
    }

    pub fn clear(&mut self) {
        self.email.clear();
        self.name.clear();
    }

    /// First required field that is still empty, if any.
    pub fn missing_field(&self) -> Option<DraftField> {
        [DraftField::Email, DraftField::Name]
            .into_iter()
            .find(|field| self.get(*field).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_reports_email_first() {
        let mut draft = Draft::default();
        assert_eq!(draft.missing_field(), Some(DraftField::Email));

        draft.set(DraftField::Email, "a@x.com");
        assert_eq!(draft.missing_field(), Some(DraftField::Name));

        draft.set(DraftField::Name, "A");
        assert_eq!(draft.missing_field(), None);
    }

    #[test]
    fn whitespace_counts_as_filled() {
        // Required-field semantics only, no trimming or format checks.
        let draft = Draft {
            email: " ".to_string(),
            name: "not-an-email".to_string(),
        };

        assert_eq!(draft.missing_field(), None);
    }
}
