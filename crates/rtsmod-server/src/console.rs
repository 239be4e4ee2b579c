//! Console handling: one `rts` command per stdin line.
//!
//! A player is considered online once a console command has named them.
//! Online players get periodic sync snapshots.

use std::collections::BTreeSet;

use rtsmod_core::command::{Command, CommandError};
use rtsmod_core::registry::GameRegistry;
use rtsmod_types::PlayerId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Players seen on the console this session.
#[derive(Debug, Default)]
pub struct Presence {
    online: BTreeSet<PlayerId>,
}

impl Presence {
    /// Mark `player` as online.
    pub fn join(&mut self, player: PlayerId) {
        if self.online.insert(player) {
            info!(%player, "player online");
        }
    }

    /// Every online player, in id order.
    pub fn online(&self) -> Vec<PlayerId> {
        self.online.iter().copied().collect()
    }
}

/// The player a command acts on, if any.
const fn subject(command: &Command) -> Option<PlayerId> {
    match *command {
        Command::Create { player, .. }
        | Command::AddResource { player, .. }
        | Command::GetResources { player }
        | Command::Status { player }
        | Command::Build { player, .. }
        | Command::Train { player, .. }
        | Command::Rename { player, .. }
        | Command::Upgrade { player } => Some(player),
        Command::Info(_) | Command::Save => None,
    }
}

/// Parse and run one console line, returning the text to show.
///
/// Blank lines yield `None`.
pub fn handle_line(
    line: &str,
    registry: &GameRegistry,
    presence: &mut Presence,
) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(CommandError::NotRts) => {
            return Some("unknown command; try `rts create <player> <x> <y> <z>`".to_owned());
        }
        Err(e) => return Some(e.to_string()),
    };
    if let Some(player) = subject(&command) {
        presence.join(player);
    }
    match command.execute(registry) {
        Ok(outcome) => Some(outcome.to_string()),
        Err(e) => {
            warn!(error = %e, line, "command failed");
            Some(e.to_string())
        }
    }
}

/// Forward stdin lines into `tx` until stdin closes or the receiver drops.
pub async fn read_stdin(tx: mpsc::Sender<String>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if tx.send(line).await.is_err() {
            break;
        }
    }
    Ok(())
}
