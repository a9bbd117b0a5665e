use crate::prelude::{
    AppError, Config, ContactCache, ContactStore, ContactTable, DraftField, HttpContactStore,
    ListState,
    command::{Cli, Commands},
};
use crate::cli::{self, MenuAction};
use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;

pub async fn run_app() -> Result<(), AppError> {
    dotenv().ok();
    let cli = Cli::parse();

    let config = Config::new(&cli.base_url)?;
    log::info!("Using contact store at {}", config.base_url);

    let store = HttpContactStore::new(config.base_url.as_str())?;
    log::debug!("Contacts resource at {}", store.emails_url());
    let store: Arc<dyn ContactStore> = Arc::new(store);
    let mut table = ContactTable::new(store, Arc::new(ContactCache::new()));
    table.load().await;

    match cli.command {
        Commands::List => {
            print!("{}", table.render());
            ensure_loaded(&table)
        }

        Commands::Add { email, name } => {
            table.open_add();
            table.set_input(DraftField::Email, email);
            table.set_input(DraftField::Name, name);
            table.submit_add().await?;

            println!("Contact added successfully");
            show_after_sync(&mut table).await;
            Ok(())
        }

        Commands::Edit {
            email,
            new_email,
            name,
        } => {
            ensure_loaded(&table)?;
            table.open_edit(&email)?;

            if let Some(new_email) = new_email {
                table.set_input(DraftField::Email, new_email);
            }
            if let Some(name) = name {
                table.set_input(DraftField::Name, name);
            }
            table.submit_edit().await?;

            println!("Contact updated successfully");
            show_after_sync(&mut table).await;
            Ok(())
        }

        Commands::Remove { email } => {
            table.remove(&email).await?;

            println!("Contact removed successfully");
            show_after_sync(&mut table).await;
            Ok(())
        }

        Commands::Send {
            subject,
            content,
            to,
        } => {
            ensure_loaded(&table)?;
            for email in &to {
                if !table.selection().contains(email) {
                    table.toggle_selected(email)?;
                }
            }
            let recipients = table.selection().len();
            table.send_to_selected(&subject, &content).await?;

            println!("Email sent to {} contact(s)", recipients);
            Ok(())
        }

        Commands::Interactive => run_interactive(&mut table).await,
    }
}

fn ensure_loaded(table: &ContactTable) -> Result<(), AppError> {
    match table.state() {
        ListState::Error(message) => Err(AppError::Load(message.clone())),
        _ => Ok(()),
    }
}

async fn show_after_sync(table: &mut ContactTable) {
    table.sync().await;
    print!("\n{}", table.render());
}

/// Menu loop over the table. Action errors are reported and the loop goes on;
/// only terminal I/O errors end the session.
async fn run_interactive(table: &mut ContactTable) -> Result<(), AppError> {
    println!("\n\n--- E-Mail Contacts ---\n");

    'outerloop: loop {
        table.sync().await;
        print!("\n{}", table.render());
        cli::show_menu()?;

        // A closed stdin at the menu ends the session.
        let choice = cli::get_input()?.unwrap_or_else(|| "q".to_string());
        let action = match cli::parse_menu_choice(&choice) {
            Ok(action) => action,
            Err(e) => {
                eprintln!("{}", e);
                continue 'outerloop;
            }
        };

        let outcome = match action {
            MenuAction::Add => {
                table.open_add();
                let Some(draft) = prompt_draft(table)? else {
                    table.close_dialogs();
                    continue 'outerloop;
                };
                table.set_input(DraftField::Email, draft.0);
                table.set_input(DraftField::Name, draft.1);
                table.submit_add().await
            }
            MenuAction::Edit => {
                let Some(email) = cli::prompt("E-Mail of the contact to edit")? else {
                    continue 'outerloop;
                };
                if let Err(e) = table.open_edit(&email) {
                    eprintln!("{}", e);
                    continue 'outerloop;
                }
                let Some(draft) = prompt_draft(table)? else {
                    table.close_dialogs();
                    continue 'outerloop;
                };
                table.set_input(DraftField::Email, draft.0);
                table.set_input(DraftField::Name, draft.1);
                table.submit_edit().await
            }
            MenuAction::Remove => {
                let Some(email) = cli::prompt("E-Mail to remove")? else {
                    continue 'outerloop;
                };
                table.remove(&email).await
            }
            MenuAction::Select => {
                let Some(email) = cli::prompt("E-Mail to select or unselect")? else {
                    continue 'outerloop;
                };
                table.toggle_selected(&email).map(|_| ())
            }
            MenuAction::Send => {
                let Some(subject) = cli::prompt("Subject")? else {
                    continue 'outerloop;
                };
                let Some(content) = cli::prompt("Content")? else {
                    continue 'outerloop;
                };
                table.send_to_selected(&subject, &content).await
            }
            MenuAction::Refresh => {
                table.refresh().await;
                Ok(())
            }
            MenuAction::Quit => {
                println!("\nBye!");
                break 'outerloop;
            }
        };

        if let Err(e) = outcome {
            if matches!(e, AppError::Validation(_)) {
                table.close_dialogs();
            }
            eprintln!("{}", e);
        }
    }
    Ok(())
}

/// Asks for both draft fields; a blank answer keeps the value already in the draft.
fn prompt_draft(table: &ContactTable) -> Result<Option<(String, String)>, AppError> {
    let current = table.draft().clone();
    let mut values = Vec::with_capacity(2);

    for (field, value) in [
        (DraftField::Email, current.email),
        (DraftField::Name, current.name),
    ] {
        let label = if value.is_empty() {
            field.label().to_string()
        } else {
            format!("{} [{}]", field.label(), value)
        };

        match cli::prompt(&label)? {
            None => return Ok(None),
            Some(input) if input.is_empty() => values.push(value),
            Some(input) => values.push(input),
        }
    }

    let name = values.pop().unwrap_or_default();
    let email = values.pop().unwrap_or_default();
    Ok(Some((email, name)))
}
