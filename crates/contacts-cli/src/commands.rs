//! Parsing of the lines typed at the prompt

use contacts_core::{ContactId, Intent};

/// What a typed line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward to the controller as-is
    Intent(Intent),
    /// Delete after asking for confirmation
    Delete(ContactId),
    Help,
    Quit,
    /// Blank line
    Nothing,
    /// Unrecognized or incomplete input, with a usage hint
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  list                    show the directory again
  add <name> | <phone>    add a contact, or save the contact being edited
  edit <id>               load a contact into the form
  cancel                  leave edit mode
  delete <id>             delete a contact (asks for confirmation)
  help                    show this help
  quit                    exit";

/// Parse one input line
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Nothing;
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "list" | "ls" | "refresh" => Command::Intent(Intent::Load),
        "add" | "save" | "submit" => {
            let (name, phone) = split_form(rest);
            Command::Intent(Intent::Submit {
                name: name.to_string(),
                phone: phone.to_string(),
            })
        }
        "edit" => match single_id(rest) {
            Some(id) => Command::Intent(Intent::BeginEdit(id)),
            None => Command::Invalid("usage: edit <id>".to_string()),
        },
        "cancel" => Command::Intent(Intent::CancelEdit),
        "delete" | "rm" => match single_id(rest) {
            Some(id) => Command::Delete(id),
            None => Command::Invalid("usage: delete <id>".to_string()),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command '{}', type 'help'", other)),
    }
}

/// Whether an answer to the delete prompt means yes
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// `name | phone`, or `name words phone` when no separator is given
fn split_form(rest: &str) -> (&str, &str) {
    if let Some((name, phone)) = rest.split_once('|') {
        return (name.trim(), phone.trim());
    }
    match rest.rsplit_once(char::is_whitespace) {
        Some((name, phone)) => (name.trim(), phone.trim()),
        None => (rest, ""),
    }
}

fn single_id(rest: &str) -> Option<ContactId> {
    let mut words = rest.split_whitespace();
    match (words.next(), words.next()) {
        (Some(id), None) => Some(ContactId::new(id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(name: &str, phone: &str) -> Command {
        Command::Intent(Intent::Submit {
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }

    #[test]
    fn test_add_forms() {
        assert_eq!(parse("add Ann Lee | 555 0101"), submit("Ann Lee", "555 0101"));
        assert_eq!(parse("add Ann Lee 555-0101"), submit("Ann Lee", "555-0101"));
        assert_eq!(parse("ADD Ann"), submit("Ann", ""));
        assert_eq!(parse("add"), submit("", ""));
    }

    #[test]
    fn test_id_commands() {
        assert_eq!(
            parse("edit 1700000000000"),
            Command::Intent(Intent::BeginEdit(ContactId::new("1700000000000")))
        );
        assert_eq!(parse("rm 42"), Command::Delete(ContactId::new("42")));
        assert!(matches!(parse("edit"), Command::Invalid(_)));
        assert!(matches!(parse("delete 1 2"), Command::Invalid(_)));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("  "), Command::Nothing);
        assert_eq!(parse("list"), Command::Intent(Intent::Load));
        assert_eq!(parse("cancel"), Command::Intent(Intent::CancelEdit));
        assert_eq!(parse("help"), Command::Help);
        assert_eq!(parse("quit"), Command::Quit);
        assert!(matches!(parse("frobnicate"), Command::Invalid(_)));
    }

    #[test]
    fn test_confirmation() {
        assert!(is_confirmation("y"));
        assert!(is_confirmation(" YES "));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("no"));
    }
}
