pub mod command;
pub mod run;

use crate::errors::AppError;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    Edit,
    Remove,
    Select,
    Send,
    Refresh,
    Quit,
}

// OUTPUT FUNCTIONS
pub fn show_menu() -> Result<(), AppError> {
    println!();
    println!("1. Add");
    println!("2. Edit");
    println!("3. Remove");
    println!("4. Select / unselect");
    println!("5. Send email to selected");
    println!("6. Refresh");
    println!("7. Quit");
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

pub fn parse_menu_choice(input: &str) -> Result<MenuAction, AppError> {
    match input.trim().to_lowercase().as_str() {
        "1" | "a" | "add" => Ok(MenuAction::Add),
        "2" | "e" | "edit" => Ok(MenuAction::Edit),
        "3" | "r" | "remove" => Ok(MenuAction::Remove),
        "4" | "s" | "select" => Ok(MenuAction::Select),
        "5" | "m" | "send" => Ok(MenuAction::Send),
        "6" | "f" | "refresh" => Ok(MenuAction::Refresh),
        "7" | "q" | "quit" => Ok(MenuAction::Quit),
        _ => Err(AppError::ParseCommand(input.to_string())),
    }
}

// INPUT FUNCTIONS
/// Reads one trimmed line from stdin. `None` once stdin is closed.
pub fn get_input() -> Result<Option<String>, AppError> {
    read_input(&mut io::stdin().lock())
}

fn read_input(reader: &mut impl BufRead) -> Result<Option<String>, AppError> {
    let mut input = String::new();
    if reader.read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

/// Prints `label` and reads one line. `*` or a closed stdin means "go back".
pub fn prompt(label: &str) -> Result<Option<String>, AppError> {
    println!("\n{} (* to go back):", label);
    print!("> ");
    io::stdout().flush()?;

    Ok(answer(get_input()?))
}

fn answer(input: Option<String>) -> Option<String> {
    input.filter(|value| value != "*")
}
