//! Text rendering of the controller's render model

use contacts_core::{Contact, EditSession, RenderModel};
use std::fmt::Write;

pub const EMPTY_DIRECTORY: &str = "No contacts yet. Add your first contact.";

/// Full screen for a render model: table, edit banner, error line
pub fn render(model: &RenderModel) -> String {
    let mut out = table(&model.contacts);

    if let EditSession::Editing(id) = &model.editing {
        let _ = writeln!(
            out,
            "Editing {}: {} / {}",
            id, model.form.name, model.form.phone
        );
    }

    if let Some(message) = &model.error_message {
        let _ = writeln!(out, "! {}", message);
    }

    out
}

/// Prompt showing what submitting the form will do
pub fn prompt(model: &RenderModel) -> String {
    format!("[{}] > ", model.submit_label())
}

fn table(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return format!("{}\n", EMPTY_DIRECTORY);
    }

    let name_width = column_width("Name", contacts.iter().map(|c| c.name.as_str()));
    let phone_width = column_width("Phone", contacts.iter().map(|c| c.phone.as_str()));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "   {:<nw$}  {:<pw$}  ID",
        "Name",
        "Phone",
        nw = name_width,
        pw = phone_width
    );
    for contact in contacts {
        let _ = writeln!(
            out,
            "{}  {:<nw$}  {:<pw$}  {}",
            contact.initial(),
            contact.name,
            contact.phone,
            contact.id,
            nw = name_width,
            pw = phone_width
        );
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}
