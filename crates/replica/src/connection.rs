//! Client side of replication.
//!
//! A [`ConnectionManager`] owns the one connection to the authority and the
//! replica's local snapshot. It cycles Disconnected -> Connecting ->
//! Connected, waits a fixed delay after every failure and tries again. A
//! connection only counts as Connected once the GET_STATE resynchronization
//! has replaced the local snapshot, so observers never see a stale state
//! labelled as live.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use meet::protocol::{
    self, Message, RequestId, STATE_UPDATE, StateEnvelope, StateUpdateParams,
};
use meet::{Action, GlobalState};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::{Channel, Connector};
use crate::error::{ReplicaError, Result};

const COMMAND_QUEUE: usize = 64;
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Resynchronized with the authority.
    Connected,
    Disconnected,
    /// A pushed snapshot replaced the local one.
    Updated,
}

#[derive(Debug, Clone)]
pub struct ReplicaConfig {
    pub url: String,
    pub reconnect_delay: Duration,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080/socket".to_string(),
            reconnect_delay: Duration::from_secs(2),
        }
    }
}

enum Command {
    Dispatch {
        action: Action,
        reply: oneshot::Sender<Result<()>>,
    },
    FetchState {
        reply: oneshot::Sender<Result<GlobalState>>,
    },
    Shutdown,
}

enum Pending {
    Resync,
    Dispatch(oneshot::Sender<Result<()>>),
    FetchState(oneshot::Sender<Result<GlobalState>>),
}

impl Pending {
    fn fail(self, error: ReplicaError) {
        match self {
            Self::Resync => {}
            Self::Dispatch(reply) => {
                let _ = reply.send(Err(error));
            }
            Self::FetchState(reply) => {
                let _ = reply.send(Err(error));
            }
        }
    }
}

enum Exit {
    Shutdown,
    Lost(ReplicaError),
}

/// Cheap to clone; every clone talks to the same connection.
#[derive(Clone)]
pub struct ReplicaHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<ConnectionState>,
    snapshot: watch::Receiver<Arc<GlobalState>>,
    events: broadcast::Sender<ConnectionEvent>,
}

impl ReplicaHandle {
    /// Sends an action to the authority. Resolves once the authority has
    /// accepted or rejected it; the local snapshot changes only when the
    /// resulting push arrives.
    pub async fn dispatch(&self, action: Action) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { action, reply })
            .await
            .map_err(|_| ReplicaError::Stopped)?;
        response.await.map_err(|_| ReplicaError::Stopped)?
    }

    /// Asks the authority for its current snapshot without touching the
    /// local one.
    pub async fn fetch_state(&self) -> Result<GlobalState> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::FetchState { reply })
            .await
            .map_err(|_| ReplicaError::Stopped)?;
        response.await.map_err(|_| ReplicaError::Stopped)?
    }

    /// The last known-consistent local snapshot.
    pub fn snapshot(&self) -> Arc<GlobalState> {
        self.snapshot.borrow().clone()
    }

    pub fn watch_snapshot(&self) -> watch::Receiver<Arc<GlobalState>> {
        self.snapshot.clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.events.subscribe()
    }

    /// Waits until the connection reaches `wanted`.
    pub async fn wait_for(&self, wanted: ConnectionState) -> Result<()> {
        let mut state = self.state.clone();
        state
            .wait_for(|s| *s == wanted)
            .await
            .map_err(|_| ReplicaError::Stopped)?;
        Ok(())
    }

    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }
}

pub struct ConnectionManager<C: Connector> {
    connector: C,
    config: ReplicaConfig,
    commands: mpsc::Receiver<Command>,
    state: watch::Sender<ConnectionState>,
    snapshot: watch::Sender<Arc<GlobalState>>,
    events: broadcast::Sender<ConnectionEvent>,
    pending: HashMap<RequestId, Pending>,
    next_request_id: RequestId,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, config: ReplicaConfig) -> (Self, ReplicaHandle) {
        let (command_tx, commands) = mpsc::channel(COMMAND_QUEUE);
        let (state, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (snapshot, snapshot_rx) = watch::channel(Arc::new(GlobalState::default()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let handle = ReplicaHandle {
            commands: command_tx,
            state: state_rx,
            snapshot: snapshot_rx,
            events: events.clone(),
        };
        let manager = Self {
            connector,
            config,
            commands,
            state,
            snapshot,
            events,
            pending: HashMap::new(),
            next_request_id: 1,
        };
        (manager, handle)
    }

    /// Starts the manager on its own task.
    pub fn spawn(connector: C, config: ReplicaConfig) -> (ReplicaHandle, JoinHandle<()>) {
        let (manager, handle) = Self::new(connector, config);
        (handle, tokio::spawn(manager.run()))
    }

    /// Connects, serves, and reconnects until shut down or every handle is
    /// dropped.
    pub async fn run(mut self) {
        let target = self.connector.describe();
        loop {
            self.set_state(ConnectionState::Connecting);
            debug!("Connecting to {}", target);

            match self.connector.connect().await {
                Ok(channel) => {
                    info!("Connected to {}, resynchronizing", target);
                    let exit = self.serve(channel).await;
                    self.fail_pending();
                    self.set_state(ConnectionState::Disconnected);
                    let _ = self.events.send(ConnectionEvent::Disconnected);
                    match exit {
                        Exit::Shutdown => break,
                        Exit::Lost(e) => warn!("Lost connection to {}: {}", target, e),
                    }
                }
                Err(e) => {
                    self.set_state(ConnectionState::Disconnected);
                    warn!("Failed to connect to {}: {}", target, e);
                }
            }

            if self.wait_before_retry().await {
                break;
            }
            info!(
                "Reconnecting to {} after {:?}",
                target, self.config.reconnect_delay
            );
        }
        info!("Replica stopped");
    }

    /// Sits out the reconnect delay, failing commands fast. Returns true
    /// when the manager should stop.
    async fn wait_before_retry(&mut self) -> bool {
        let delay = tokio::time::sleep(self.config.reconnect_delay);
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = &mut delay => return false,
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => return true,
                    Some(Command::Dispatch { reply, .. }) => {
                        let _ = reply.send(Err(ReplicaError::NotConnected));
                    }
                    Some(Command::FetchState { reply }) => {
                        let _ = reply.send(Err(ReplicaError::NotConnected));
                    }
                },
            }
        }
    }

    async fn serve(&mut self, mut channel: C::Channel) -> Exit {
        let id = self.take_request_id();
        if let Err(e) = self
            .send(&mut channel, &protocol::get_state_request(id))
            .await
        {
            return Exit::Lost(e);
        }
        self.pending.insert(id, Pending::Resync);

        loop {
            tokio::select! {
                incoming = channel.recv() => match incoming {
                    Ok(Some(text)) => {
                        if let Err(e) = self.handle_incoming(&text) {
                            return Exit::Lost(e);
                        }
                    }
                    Ok(None) => return Exit::Lost(ReplicaError::ChannelClosed),
                    Err(e) => return Exit::Lost(e),
                },
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => return Exit::Shutdown,
                    Some(command) => {
                        if let Err(e) = self.handle_command(&mut channel, command).await {
                            return Exit::Lost(e);
                        }
                    }
                },
            }
        }
    }

    async fn handle_command(&mut self, channel: &mut C::Channel, command: Command) -> Result<()> {
        let connected = *self.state.borrow() == ConnectionState::Connected;
        match command {
            Command::Dispatch { action, reply } => {
                if !connected {
                    let _ = reply.send(Err(ReplicaError::NotConnected));
                    return Ok(());
                }
                let id = self.take_request_id();
                let message = match protocol::action_request(id, &action) {
                    Ok(message) => message,
                    Err(e) => {
                        let _ = reply.send(Err(e.into()));
                        return Ok(());
                    }
                };
                debug!("Dispatching {} as request {}", action.method(), id);
                self.pending.insert(id, Pending::Dispatch(reply));
                self.send(channel, &message).await
            }
            Command::FetchState { reply } => {
                if !connected {
                    let _ = reply.send(Err(ReplicaError::NotConnected));
                    return Ok(());
                }
                let id = self.take_request_id();
                self.pending.insert(id, Pending::FetchState(reply));
                self.send(channel, &protocol::get_state_request(id)).await
            }
            Command::Shutdown => Ok(()),
        }
    }

    fn handle_incoming(&mut self, text: &str) -> Result<()> {
        match Message::decode(text)? {
            Message::Response {
                id: Some(id),
                result,
            } => match self.pending.remove(&id) {
                Some(Pending::Resync) => {
                    let state = decode_state(result?)?;
                    self.snapshot.send_replace(Arc::new(state));
                    self.set_state(ConnectionState::Connected);
                    let _ = self.events.send(ConnectionEvent::Connected);
                    info!("Resynchronized with the authority");
                }
                Some(Pending::Dispatch(reply)) => {
                    let _ = reply.send(result.map(|_| ()).map_err(ReplicaError::from));
                }
                Some(Pending::FetchState(reply)) => {
                    let state = result.map_err(ReplicaError::from).and_then(decode_state);
                    let _ = reply.send(state);
                }
                None => warn!("Response to unknown request {}", id),
            },
            Message::Response { id: None, result } => {
                if let Err(e) = result {
                    warn!("Authority could not read a request: {}", e.message);
                }
            }
            Message::Notification { method, params } if method == STATE_UPDATE => {
                self.apply_update(params)?;
            }
            Message::Notification { method, .. } => {
                debug!("Ignoring notification {}", method);
            }
            Message::Request { method, .. } => {
                warn!("Ignoring request {} from the authority", method);
            }
        }
        Ok(())
    }

    fn apply_update(&mut self, params: Value) -> Result<()> {
        let params: StateUpdateParams = serde_json::from_value(params)?;
        let mut next = GlobalState::clone(&self.snapshot.borrow());
        if next.merge_update(params.state) {
            self.snapshot.send_replace(Arc::new(next));
            let _ = self.events.send(ConnectionEvent::Updated);
            debug!("Applied pushed snapshot");
        } else {
            warn!("Ignoring partial state update");
        }
        Ok(())
    }

    async fn send(&mut self, channel: &mut C::Channel, message: &Message) -> Result<()> {
        channel.send(message.encode()?).await
    }

    fn fail_pending(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.fail(ReplicaError::ChannelClosed);
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.send_replace(state);
    }

    fn take_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }
}

fn decode_state(result: Value) -> Result<GlobalState> {
    let envelope: StateEnvelope = serde_json::from_value(result)?;
    Ok(envelope.state)
}
