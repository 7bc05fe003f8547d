//! Command line parsing for the interactive shell

use std::path::PathBuf;

use shared::{EmployeeId, Role};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  login <username> <password>             log in
  register <username> <password> [role]   create an account (role: view | edit, default view)
  back                                    register -> login, detail -> list
  open <id>                               show one employee
  new                                     open an empty form (role edit)
  edit                                    edit the employee shown (role edit)
  set <field> <value>                     fill a form field; previous_experience and
                                          salary_history take a JSON array
  save | cancel                           submit or leave the form
  delete                                  delete the employee shown (role edit)
  pdf [dir]                               download the PDF of the current view
  refresh                                 reload the current view
  dismiss                                 hide the error message
  logout | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, password: String },
    Register { username: String, password: String, role: Role },
    Back,
    Open(EmployeeId),
    New,
    Edit,
    Set { field: String, value: String },
    Save,
    Cancel,
    Delete,
    Pdf(Option<PathBuf>),
    Refresh,
    Dismiss,
    Logout,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' takes no arguments")]
    UnexpectedArgs(String),

    #[error("{0}")]
    Invalid(String),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let cmd = match (name, args.as_slice()) {
        ("login", [username, password]) => Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        },
        ("login", _) => return Err(CommandError::Usage("login <username> <password>")),

        ("register", [username, password, role @ ..]) if role.len() <= 1 => Command::Register {
            username: username.to_string(),
            password: password.to_string(),
            role: match role.first() {
                Some(role) => role
                    .parse()
                    .map_err(|e: shared::ParseRoleError| CommandError::Invalid(e.to_string()))?,
                None => Role::default(),
            },
        },
        ("register", _) => {
            return Err(CommandError::Usage("register <username> <password> [view|edit]"));
        }

        ("open", [id]) => Command::Open(
            id.parse()
                .map_err(|_| CommandError::Invalid(format!("'{id}' is not an employee id")))?,
        ),
        ("open", _) => return Err(CommandError::Usage("open <id>")),

        // the value keeps its inner spaces
        ("set", [field, ..]) => {
            let value = rest[field.len()..].trim().to_string();
            Command::Set {
                field: field.to_string(),
                value,
            }
        }
        ("set", _) => return Err(CommandError::Usage("set <field> <value>")),

        ("pdf", []) => Command::Pdf(None),
        ("pdf", _) => Command::Pdf(Some(PathBuf::from(rest))),

        ("back", []) => Command::Back,
        ("new", []) => Command::New,
        ("edit", []) => Command::Edit,
        ("save", []) => Command::Save,
        ("cancel", []) => Command::Cancel,
        ("delete", []) => Command::Delete,
        ("refresh", []) => Command::Refresh,
        ("dismiss", []) => Command::Dismiss,
        ("logout", []) => Command::Logout,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,

        (
            name @ ("back" | "new" | "edit" | "save" | "cancel" | "delete" | "refresh"
            | "dismiss" | "logout" | "help" | "?" | "quit" | "exit"),
            _,
        ) => return Err(CommandError::UnexpectedArgs(name.to_string())),
        (name, _) => return Err(CommandError::Unknown(name.to_string())),
    };
    Ok(Some(cmd))
}
