use std::fmt::Write as _;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::{EditorSession, HttpNotesApi, Notifier};
use crate::state::note::Note;

/// Prints notices: infos to stdout, errors to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("! {message}");
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Show,
    Write(String),
    Append(String),
    Save,
    Edit(i64),
    Delete(i64),
    Mail { id: i64, recipient: String },
    DeleteAll,
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list              show stored notes
  show              show the editor content
  write <html>      replace the editor content
  append <html>     add to the editor content
  save              create a note, or update the one being edited
  edit <id>         load a note into the editor
  delete <id>       delete one note
  mail <id> <addr>  print a mailto: link sending the note to <addr>
  delete-all        delete every note
  reload            fetch the list again
  help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let id = |rest: &str| {
        rest.parse::<i64>()
            .map_err(|_| format!("{word} needs a numeric note id"))
    };

    match word {
        "list" | "ls" => Ok(Command::List),
        "show" => Ok(Command::Show),
        "write" => Ok(Command::Write(rest.to_string())),
        "append" => Ok(Command::Append(rest.to_string())),
        "save" => Ok(Command::Save),
        "edit" => id(rest).map(Command::Edit),
        "delete" | "rm" => id(rest).map(Command::Delete),
        "mail" => {
            let (note, recipient) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            id(note).map(|id| Command::Mail {
                id,
                recipient: recipient.trim().to_string(),
            })
        }
        "delete-all" => Ok(Command::DeleteAll),
        "reload" => Ok(Command::Reload),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command {other:?}, try `help`")),
    }
}

/// `mailto:` link that opens a mail to `recipient` with the note as body.
///
/// `None` when the recipient is blank.
pub fn mailto_link(note: &Note, recipient: &str) -> Option<String> {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return None;
    }

    let body = format!("Hier ist die Notiz:\n\n{}", note.content);
    Some(format!(
        "mailto:{recipient}?subject={}&body={}",
        urlencoding::encode("Ihre Notiz"),
        urlencoding::encode(&body)
    ))
}

/// Numbered listing, marking the note currently being edited.
pub fn render_notes(notes: &[Note], editing_id: Option<i64>) -> String {
    if notes.is_empty() {
        return "(no notes)".to_string();
    }

    let mut out = String::new();
    for (i, note) in notes.iter().enumerate() {
        let marker = if Some(note.id) == editing_id { '*' } else { ' ' };
        let _ = writeln!(out, "{marker}{:>3}. [{}] {}", i + 1, note.id, note.content);
    }
    out.trim_end().to_string()
}

/// Interactive editor session against the server at `base_url`.
pub async fn run(base_url: &str) -> std::io::Result<()> {
    let mut session = EditorSession::new(HttpNotesApi::new(base_url), TerminalNotifier);
    tracing::info!("Editor client connected to {}", base_url);

    if session.load().await.is_ok() {
        println!("{}", render_notes(session.notes(), session.editing_id()));
    }
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(msg) => {
                if !line.trim().is_empty() {
                    eprintln!("! {msg}");
                }
                continue;
            }
        };

        // Failures were already reported through the notifier.
        let changed = match command {
            Command::List => true,
            Command::Show => {
                println!("{}", session.editor_content());
                false
            }
            Command::Write(html) => {
                session.set_editor_content(html);
                false
            }
            Command::Append(html) => {
                session.append_editor_content(&html);
                false
            }
            Command::Save => session.save().await.is_ok(),
            Command::Edit(id) => session.edit(id).is_ok(),
            Command::Delete(id) => session.delete(id).await.is_ok(),
            Command::Mail { id, recipient } => {
                match session.notes().iter().find(|n| n.id == id) {
                    None => TerminalNotifier.error("That note is not in the list."),
                    Some(note) => match mailto_link(note, &recipient) {
                        Some(link) => println!("{link}"),
                        None => TerminalNotifier
                            .error("An e-mail address is required to send the note."),
                    },
                }
                false
            }
            Command::DeleteAll => session.delete_all().await.is_ok(),
            Command::Reload => session.reload().await.is_ok(),
            Command::Help => {
                println!("{HELP}");
                false
            }
            Command::Quit => break,
        };

        if changed {
            println!("{}", render_notes(session.notes(), session.editing_id()));
        }
    }

    Ok(())
}
