//! `notes`: text notes persisted across sessions.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use mirage_types::error::{CommandError, CommandResult, ErrorKind};
use serde::{Deserialize, Serialize};

use super::split_flag;
use crate::registry::Command;
use crate::session::{CommandContext, SessionHandle};

/// Storage key of the notebook.
pub const NOTES_KEY: &str = "notes";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Notebook {
    list: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Note {
    name: String,
    note: String,
}

impl Notebook {
    fn find(&self, name: &str) -> Option<&Note> {
        self.list.iter().find(|n| n.name == name)
    }

    fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

fn n01() -> CommandError {
    CommandError::new(
        ErrorKind::InvalidUsage,
        "Invalid use of command, run \"help notes\" to find out more...",
    )
}

fn n02() -> CommandError {
    CommandError::new(ErrorKind::NotFound, "Note was not found, try checking the name...")
}

fn n03() -> CommandError {
    CommandError::new(
        ErrorKind::NotFound,
        "You don't have any saved notes, try creating one...",
    )
}

fn n04() -> CommandError {
    CommandError::new(
        ErrorKind::DuplicateEntity,
        "The note already exists, try another name",
    )
}

/// Load the notebook, creating an empty one on first use.
fn load(session: &SessionHandle) -> Result<Notebook, CommandError> {
    match session.retrieve::<Notebook>(NOTES_KEY)? {
        Some(book) => Ok(book),
        None => {
            let book = Notebook::default();
            session.store(NOTES_KEY, &book)?;
            Ok(book)
        },
    }
}

fn save(session: &SessionHandle, book: &Notebook) -> CommandResult {
    session.store(NOTES_KEY, book)?;
    Ok(())
}

pub(super) struct NotesCmd;
impl Command for NotesCmd {
    fn name(&self) -> &str {
        "notes"
    }
    fn aliases(&self) -> &[&str] {
        &["nts", "note"]
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command help\
             ~~Command: notes\
             ~Aliases: note, nts\
             ~Details: create and store notes in the terminal. Notes are saved through sessions.\
             ~Usage:   notes [command] note name\
             ~Commands:\
             ~~    -c   create a new note\
             ~    -e   edit a note\
             ~    -r   read a note\
             ~    -d   delete a note\
             ~    -l   list all notes\
             ~~Create a note named 'to-do-list'.\
             ~~    notes -c to-do-list\
             ~    notes -c my to-do list\
             ~~Edit a note (to save the current note press 'SHIFT + ENTER').\
             ~~    notes -e to-do-list\
             ~~You can also use it without a flag. If the note name already exists it will read its \
              content, if not, it will create a new note.\
             ~~    notes new note    (will create a new note named 'new note')\
             ~    notes recent-note (if note exists, it will display its content)~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        async move { notes(&ctx.session, &ctx.args).await }.boxed_local()
    }
}

async fn notes(session: &SessionHandle, args: &[String]) -> CommandResult {
    let (flag, rest) = split_flag(args, |a| matches!(a, "-c" | "-e" | "-r" | "-d" | "-l"))
        .ok_or_else(n01)?;
    let name = rest.join(" ");
    let book = load(session)?;
    match flag {
        Some("-c") => create(session, &book, &name).await,
        Some("-e") => edit(session, &book, &name).await,
        Some("-r") => read(session, &book, &name),
        Some("-d") => delete(session, book, &name),
        Some(_) => list(session, &book),
        None if book.contains(&name) => read(session, &book, &name),
        None if !name.is_empty() => create(session, &book, &name).await,
        None => session.invoke("help notes").await,
    }
}

async fn create(session: &SessionHandle, book: &Notebook, name: &str) -> CommandResult {
    if name.is_empty() {
        return Err(n01());
    }
    if book.contains(name) {
        return Err(n04());
    }
    let title = format!("Title: {name}");
    let text = session.read_multiline(Some(title.as_str())).await?;
    let mut book = load(session)?;
    if book.contains(name) {
        return Err(n04());
    }
    book.list.push(Note {
        name: name.to_string(),
        note: text,
    });
    save(session, &book)
}

async fn edit(session: &SessionHandle, book: &Notebook, name: &str) -> CommandResult {
    let current = book.find(name).ok_or_else(n02)?.note.trim().to_string();
    session.new_line();
    let text = session.read_multiline(Some(current.as_str())).await?;
    let mut book = load(session)?;
    let Some(entry) = book.list.iter_mut().find(|n| n.name == name) else {
        return Err(n02());
    };
    entry.note = strip_blank_lines(&text);
    save(session, &book)?;
    session.new_line();
    session.print("[NOTES INFO]: Note edit was successfully saved...");
    session.new_line();
    Ok(())
}

fn read(session: &SessionHandle, book: &Notebook, name: &str) -> CommandResult {
    let note = book.find(name).ok_or_else(n02)?;
    session.new_line();
    for line in note.note.split('\n') {
        session.print(line);
    }
    session.new_line();
    Ok(())
}

fn delete(session: &SessionHandle, mut book: Notebook, name: &str) -> CommandResult {
    if !book.contains(name) {
        return Err(n02());
    }
    book.list.retain(|n| n.name != name);
    save(session, &book)?;
    session.new_line();
    session.print("[NOTES INFO]: Note deleted successfully...");
    session.new_line();
    Ok(())
}

fn list(session: &SessionHandle, book: &Notebook) -> CommandResult {
    if book.list.is_empty() {
        return Err(n03());
    }
    session.new_line();
    session.print("Notes saved:");
    for note in &book.list {
        session.print(&format!(" * {}", note.name));
    }
    session.new_line();
    Ok(())
}

/// Drop whitespace-only lines and trim the result.
fn strip_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
