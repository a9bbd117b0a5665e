use super::Contact;

/// Contacts ticked in the table, identified by email.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    items: Vec<Contact>,
}

impl Selection {
    /// Adds the contact if no selected contact shares its email, removes it
    /// otherwise. Returns whether the contact is selected afterwards.
    pub fn toggle(&mut self, contact: &Contact) -> bool {
        if self.contains(&contact.email) {
            self.items.retain(|c| !c.same_key(contact));
            false
        } else {
            self.items.push(contact.clone());
            true
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.items.iter().any(|c| c.email == email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Swaps every selected contact for its row in `rows` and drops the ones
    /// no longer listed.
    pub fn refresh(&mut self, rows: &[Contact]) {
        self.items = self
            .items
            .iter()
            .filter_map(|selected| rows.iter().find(|row| row.same_key(selected)).cloned())
            .collect();
    }

    /// Server ids of the selection; `None` if any selected contact has none.
    pub fn ids(&self) -> Option<Vec<u64>> {
        self.items.iter().map(|c| c.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_membership() {
        let a = Contact::new("a@x.com", "A");
        let b = Contact::new("b@x.com", "B");
        let mut selection = Selection::default();
        selection.toggle(&a);

        assert!(selection.toggle(&b));
        assert!(!selection.toggle(&b));

        assert_eq!(selection.len(), 1);
        assert!(selection.contains("a@x.com"));
        assert!(!selection.contains("b@x.com"));
    }

    #[test]
    fn toggle_matches_on_email_only() {
        let mut selection = Selection::default();
        selection.toggle(&Contact::new("a@x.com", "A"));
        selection.toggle(&Contact::new("a@x.com", "Renamed"));

        assert!(selection.is_empty());
    }

    #[test]
    fn refresh_follows_the_latest_rows() {
        let mut selection = Selection::default();
        selection.toggle(&Contact::new("a@x.com", "A"));
        selection.toggle(&Contact::new("gone@x.com", "G"));

        selection.refresh(&[Contact::new("a@x.com", "A").with_id(5)]);

        assert_eq!(selection.len(), 1);
        assert_eq!(selection.ids(), Some(vec![5]));
    }

    #[test]
    fn ids_require_every_contact_to_have_one() {
        let mut selection = Selection::default();
        selection.toggle(&Contact::new("a@x.com", "A").with_id(1));
        assert_eq!(selection.ids(), Some(vec![1]));

        selection.toggle(&Contact::new("b@x.com", "B"));
        assert_eq!(selection.ids(), None);
    }
}
