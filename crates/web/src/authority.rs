//! The single writer of the meet.
//!
//! One task owns the snapshot. Connections and HTTP handlers talk to it
//! through an [`AuthorityHandle`], so every action is applied exactly once
//! and in arrival order. After each applied action the new snapshot is
//! published to every subscriber, the issuer included.

use std::sync::Arc;

use meet::{Action, GlobalState, MeetError, SnapshotRepository};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{WebError, WebResult};

const COMMAND_QUEUE: usize = 256;

pub type Snapshot = Arc<GlobalState>;

enum Command {
    Apply {
        action: Action,
        reply: oneshot::Sender<Result<Snapshot, MeetError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
}

#[derive(Clone)]
pub struct AuthorityHandle {
    commands: mpsc::Sender<Command>,
    updates: broadcast::Sender<Snapshot>,
}

impl AuthorityHandle {
    /// Validates and applies an action, returning the resulting snapshot.
    pub async fn apply(&self, action: Action) -> WebResult<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Apply { action, reply })
            .await
            .map_err(|_| WebError::Unavailable)?;
        Ok(response.await.map_err(|_| WebError::Unavailable)??)
    }

    pub async fn snapshot(&self) -> WebResult<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| WebError::Unavailable)?;
        response.await.map_err(|_| WebError::Unavailable)
    }

    /// Snapshots published after each applied action.
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.updates.subscribe()
    }
}

pub struct Authority {
    state: Snapshot,
    commands: mpsc::Receiver<Command>,
    updates: broadcast::Sender<Snapshot>,
    repository: Option<SnapshotRepository>,
}

impl Authority {
    /// Starts the authority task. It stops once every handle is dropped.
    pub fn spawn(
        initial: GlobalState,
        repository: Option<SnapshotRepository>,
        broadcast_capacity: usize,
    ) -> (AuthorityHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
        let (updates, _) = broadcast::channel(broadcast_capacity.max(1));

        let authority = Authority {
            state: Arc::new(initial),
            commands: command_rx,
            updates: updates.clone(),
            repository,
        };
        let task = tokio::spawn(authority.run());

        (
            AuthorityHandle {
                commands: command_tx,
                updates,
            },
            task,
        )
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Apply { action, reply } => {
                    let result = self.apply(action).await;
                    let _ = reply.send(result);
                }
                Command::Snapshot { reply } => {
                    let _ = reply.send(self.state.clone());
                }
            }
        }
        info!("Meet authority stopped");
    }

    async fn apply(&mut self, action: Action) -> Result<Snapshot, MeetError> {
        let method = action.method();
        if let Err(e) = action.validate() {
            warn!("Rejected {}: {}", method, e);
            return Err(e);
        }
        let next = match self.state.apply(&action) {
            Ok(next) => next,
            Err(e) => {
                warn!("Rejected {}: {}", method, e);
                return Err(e);
            }
        };

        self.state = Arc::new(next);
        info!("Applied {}", method);

        if let Some(repository) = &self.repository
            && let Err(e) = repository.save(&self.state).await
        {
            error!(
                "Failed to save snapshot to {}: {}",
                repository.path().display(),
                e
            );
        }

        let receivers = self.updates.send(self.state.clone()).unwrap_or(0);
        debug!("Pushed {} to {} subscriber(s)", method, receivers);
        Ok(self.state.clone())
    }
}
