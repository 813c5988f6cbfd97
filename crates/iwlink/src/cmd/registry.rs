//! Command descriptors and the table they are registered in.

use std::fmt::Write as _;

use super::request::Request;
use super::target::TargetKind;
use crate::netlink::{AttrTable, Error, Result};
use crate::nl80211::Nl80211Cmd;
use crate::output::Printer;

/// Builds a request body from the command's arguments.
pub type Handler = fn(&mut Request, &[String]) -> std::result::Result<(), HandlerError>;

/// Renders one decoded reply.
pub type ReplyHandler = fn(&AttrTable<'_>, &mut Printer<'_>) -> Result<()>;

/// Why a handler refused to build its request.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Wrong number or shape of arguments; the command's usage is shown.
    #[error("invalid command line")]
    Usage,

    /// An argument has a value the command does not accept.
    #[error("{0}")]
    Invalid(String),

    /// Like [`Usage`](Self::Usage), with a line saying what was wrong.
    #[error("{0}")]
    InvalidUsage(String),

    /// An attribute could not be encoded.
    #[error(transparent)]
    Netlink(#[from] Error),
}

/// A registered command.
#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    /// First word for two-word commands, `None` for toplevel ones.
    pub section: Option<&'static str>,
    pub name: &'static str,
    /// Argument grammar, without the command words and target.
    pub usage: &'static str,
    /// One line for the command listing.
    pub help: &'static str,
    pub cmd: Nl80211Cmd,
    /// Netlink flags OR-ed into the request.
    pub flags: u16,
    pub target: TargetKind,
    pub handler: Handler,
    /// Called once per reply; `None` for commands that only expect an ACK.
    pub reply: Option<ReplyHandler>,
}

impl CommandDescriptor {
    /// Full usage line, e.g. `set monitor <dev> <flag> [...]`.
    pub fn usage_line(&self) -> String {
        let mut line = String::new();
        for word in [
            self.section.unwrap_or(""),
            self.name,
            self.target.placeholder(),
            self.usage,
        ] {
            if word.is_empty() {
                continue;
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        line
    }
}

/// All commands known to the binary.
///
/// Populated once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<CommandDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command.
    ///
    /// # Panics
    ///
    /// Panics if a command with the same section, name and target kind is
    /// already registered.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> &mut Self {
        if self
            .lookup(descriptor.section, descriptor.name, descriptor.target)
            .is_some()
        {
            panic!(
                "command `{}` registered twice for target {:?}",
                descriptor.usage_line(),
                descriptor.target
            );
        }

        self.commands.push(descriptor);
        self
    }

    /// The command registered for this path and target kind.
    pub fn lookup(
        &self,
        section: Option<&str>,
        name: &str,
        target: TargetKind,
    ) -> Option<&CommandDescriptor> {
        self.candidates(section, name)
            .find(|descriptor| descriptor.target == target)
    }

    /// Every command registered under this path, one per target kind.
    pub fn candidates<'r>(
        &'r self,
        section: Option<&str>,
        name: &str,
    ) -> impl Iterator<Item = &'r CommandDescriptor> {
        self.commands
            .iter()
            .filter(move |descriptor| descriptor.section == section && descriptor.name == name)
    }

    /// Check if `word` opens a two-word command.
    pub fn has_section(&self, word: &str) -> bool {
        self.commands
            .iter()
            .any(|descriptor| descriptor.section == Some(word))
    }

    /// All commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Listing of every command, one usage line each.
    pub fn usage(&self) -> String {
        let mut out = String::from("iw [options] command\n\nCommands:\n");
        for descriptor in &self.commands {
            let _ = writeln!(out, "\t{}", descriptor.usage_line());
            if !descriptor.help.is_empty() {
                let _ = writeln!(out, "\t\t{}", descriptor.help);
            }
        }
        out
    }
}
