//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based selection. The menu itself is plain
//! data ([`Choice`]) so the wording and the command mapping can be tested
//! without a terminal.

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select};
use gdir_acl::{
    AccessState, AclError, AclSession, Command, ListKind, Step, parse_drive_list, parse_indices,
};

use crate::error::Result;

/// One entry of the access-control menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Confirm,
    Append,
    Remove,
    Replace,
    Convert,
    Disable,
    Promote(ListKind),
}

impl Choice {
    /// Menu entries offered for `state`, default first.
    pub fn menu(state: &AccessState) -> Vec<Choice> {
        if state.is_unrestricted() {
            vec![
                Choice::Confirm,
                Choice::Promote(ListKind::Allow),
                Choice::Promote(ListKind::Block),
            ]
        } else {
            vec![
                Choice::Confirm,
                Choice::Append,
                Choice::Remove,
                Choice::Replace,
                Choice::Convert,
                Choice::Disable,
            ]
        }
    }

    pub fn label(self, state: &AccessState) -> String {
        let kind = state.kind().unwrap_or(ListKind::Allow);
        match self {
            Choice::Confirm => "Confirm".to_string(),
            Choice::Append => "Append drives to the list".to_string(),
            Choice::Remove => "Remove drives from the list".to_string(),
            Choice::Replace => "Replace with a new list of drives".to_string(),
            Choice::Convert => format!("Convert to {} access control", kind.opposite()),
            Choice::Disable => "Disable access control on the user".to_string(),
            Choice::Promote(kind) => format!("Convert to {kind} access control list"),
        }
    }

    /// Prompt for the extra input this choice needs, if any.
    pub fn input_prompt(self, state: &AccessState) -> Option<String> {
        let kind = state.kind().unwrap_or(ListKind::Allow);
        match self {
            Choice::Append => Some(format!("Append drives to {kind} (comma separated)")),
            Choice::Remove => Some(format!(
                "Remove drives from {kind} (numbers from the list above, comma separated)"
            )),
            Choice::Replace => Some(format!("New {kind} of drives (comma separated)")),
            Choice::Promote(kind) => Some(format!("Enter {kind} of drives (comma separated)")),
            Choice::Confirm | Choice::Convert | Choice::Disable => None,
        }
    }

    /// Turn the choice plus whatever the operator typed into a command.
    pub fn command(self, input: &str) -> std::result::Result<Command, AclError> {
        Ok(match self {
            Choice::Confirm => Command::Confirm,
            Choice::Append => Command::Append(parse_drive_list(input)),
            Choice::Remove => Command::Remove(parse_indices(input)?),
            Choice::Replace => Command::Replace(parse_drive_list(input)),
            Choice::Convert => Command::Convert,
            Choice::Disable => Command::Disable,
            Choice::Promote(kind) => Command::Promote(kind, parse_drive_list(input)),
        })
    }
}

/// Print the state the way the menu refers to it.
pub fn describe_access(state: &AccessState) {
    match state.kind() {
        None => println!("The user currently has global access to all drives."),
        Some(kind) => {
            println!("The user currently has following drives in its {kind} access list:");
            for (i, drive) in state.drives().iter().enumerate() {
                println!("    ({}) {}", i + 1, drive.cyan());
            }
        }
    }
}

/// Run the access-control editing loop for user `name`.
///
/// Returns the confirmed state. Invalid input is reported and the menu is
/// shown again; nothing is saved here.
pub fn edit_access(name: &str, state: AccessState) -> Result<AccessState> {
    println!("{} Access control for {}", "=>".blue().bold(), name.cyan());
    let mut session = AclSession::new(state);

    loop {
        println!();
        describe_access(session.state());

        let choices = Choice::menu(session.state());
        let labels: Vec<String> = choices.iter().map(|c| c.label(session.state())).collect();
        let picked = Select::new()
            .with_prompt("Please specify what do you want to do with it")
            .items(&labels)
            .default(0)
            .interact()?;
        let choice = choices[picked];

        let input = match choice.input_prompt(session.state()) {
            Some(prompt) => Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?,
            None => String::new(),
        };

        let step = choice
            .command(&input)
            .and_then(|command| session.step(command));
        match step {
            Ok(Step::Confirmed) => break,
            Ok(Step::Pending) => {}
            Err(e) => println!("{} {}", "!!".yellow().bold(), e),
        }
    }

    if session.is_modified() {
        println!("{} New access: {}", "=>".blue().bold(), session.state());
    }
    Ok(session.into_state())
}

/// Ask for a password, twice.
pub fn prompt_password(prompt: &str) -> Result<String> {
    Ok(Password::new()
        .with_prompt(prompt)
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?)
}

/// Ask whether to keep `current` or enter a new password.
pub fn confirm_or_prompt_password(current: &str) -> Result<String> {
    let keep = !current.is_empty()
        && Confirm::new()
            .with_prompt("Keep the current password?")
            .default(true)
            .interact()?;
    if keep {
        Ok(current.to_string())
    } else {
        prompt_password("New password")
    }
}
