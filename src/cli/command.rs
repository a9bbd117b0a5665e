use clap::{Parser, Subcommand};

use crate::config::{BASE_URL_ENV, DEFAULT_BASE_URL};

#[derive(Parser, Debug)]
#[command(name = "rusty-mailbook", version, about = "Manage the e-mail contact list")]
pub struct Cli {
    /// Base url of the contact store
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommand and their flags
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the contact table
    List,

    /// Add a new contact
    Add {
        /// Contact email address
        #[arg(long)]
        email: String,

        /// Contact name
        #[arg(long)]
        name: String,
    },

    /// Edit an existing contact, addressed by its current email
    /// Fields left out keep their current value
    Edit {
        /// Current email of the contact
        #[arg(long)]
        email: String,

        /// Update email address
        #[arg(long)]
        new_email: Option<String>,

        /// Update name
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a contact by email (no confirmation)
    Remove {
        /// Email of the contact to remove
        #[arg(long)]
        email: String,
    },

    /// Send an email to the given contacts
    Send {
        /// Email subject
        #[arg(long)]
        subject: String,

        /// Email content
        #[arg(long, default_value_t = String::new())]
        content: String,

        /// Recipient emails, repeat for several contacts
        #[arg(long = "to", required = true)]
        to: Vec<String>,
    },

    /// Menu driven session over the contact table
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_with_partial_fields() {
        let cli = Cli::try_parse_from([
            "rusty-mailbook",
            "--base-url",
            "http://localhost:9000",
            "edit",
            "--email",
            "a@x.com",
            "--new-email",
            "a2@x.com",
        ])
        .unwrap();

        assert_eq!(cli.base_url, "http://localhost:9000");
        match cli.command {
            Commands::Edit {
                email,
                new_email,
                name,
            } => {
                assert_eq!(email, "a@x.com");
                assert_eq!(new_email.as_deref(), Some("a2@x.com"));
                assert!(name.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn send_requires_recipients() {
        let parsed = Cli::try_parse_from(["rusty-mailbook", "send", "--subject", "Hi"]);

        assert!(parsed.is_err());
    }
}
