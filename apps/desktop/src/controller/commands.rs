//! UI commands accepted in interactive mode.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Select { path: PathBuf },
    Submit,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "commands: select <path> | submit | show | help | quit";

impl UiCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "select" | "open" => {
                if rest.is_empty() {
                    return Err("select needs a file path".to_string());
                }
                UiCommand::Select {
                    path: PathBuf::from(rest),
                }
            }
            "submit" | "analyze" | "retry" => UiCommand::Submit,
            "show" | "status" => UiCommand::Show,
            "help" | "?" => UiCommand::Help,
            "quit" | "exit" | "q" => UiCommand::Quit,
            other => return Err(format!("unknown command '{other}'; {HELP}")),
        };
        Ok(Some(cmd))
    }

    pub fn name(&self) -> &'static str {
        match self {
            UiCommand::Select { .. } => "select",
            UiCommand::Submit => "submit",
            UiCommand::Show => "show",
            UiCommand::Help => "help",
            UiCommand::Quit => "quit",
        }
    }
}
