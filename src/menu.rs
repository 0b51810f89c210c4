// Command registry: the fixed, numbered menu. Selectors are positions in
// `Command::ALL` plus one, so numbering never changes at runtime.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Ping,
    Version,
    CreateUser,
    DeleteUser,
    StorageInfo,
    CreateRepository,
    UpdateRepository,
    ListRepositories,
    ChangeGroup,
    CreateGroup,
    PrintToken,
    Exit,
}

impl Command {
    /// Menu order. `Exit` is last and therefore has the highest selector.
    pub const ALL: [Command; 12] = [
        Command::Ping,
        Command::Version,
        Command::CreateUser,
        Command::DeleteUser,
        Command::StorageInfo,
        Command::CreateRepository,
        Command::UpdateRepository,
        Command::ListRepositories,
        Command::ChangeGroup,
        Command::CreateGroup,
        Command::PrintToken,
        Command::Exit,
    ];

    pub fn selector(self) -> u32 {
        Command::ALL
            .iter()
            .position(|c| *c == self)
            .map(|i| i as u32 + 1)
            .unwrap_or(0)
    }

    pub fn from_selector(selector: i64) -> Option<Command> {
        if selector < 1 {
            return None;
        }
        Command::ALL.get((selector - 1) as usize).copied()
    }

    pub fn is_exit(self) -> bool {
        self == Command::Exit
    }

    /// Menu label. Only "Change Group" depends on session state.
    pub fn label(self, group: &str) -> String {
        match self {
            Command::Ping => "Ping".into(),
            Command::Version => "Artifactory Version".into(),
            Command::CreateUser => "Create User".into(),
            Command::DeleteUser => "Delete User".into(),
            Command::StorageInfo => "Get Storage Info".into(),
            Command::CreateRepository => "Create Repository".into(),
            Command::UpdateRepository => "Update Repository".into(),
            Command::ListRepositories => "List Repositories".into(),
            Command::ChangeGroup => format!("Change Group (current group: '{}')", group),
            Command::CreateGroup => "Create Group".into(),
            Command::PrintToken => "Print Token".into(),
            Command::Exit => "Exit".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub selector: u32,
    pub label: String,
    pub command: Command,
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2} -- {}", self.selector, self.label)
    }
}

/// Build the menu for the current group, in selector order.
pub fn entries(group: &str) -> Vec<MenuEntry> {
    Command::ALL
        .iter()
        .map(|&command| MenuEntry {
            selector: command.selector(),
            label: command.label(group),
            command,
        })
        .collect()
}
