// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP session management for `WattBox` devices.
//!
//! A [`Connection`] owns at most one socket. Opening it connects, performs
//! the dialect handshake and spawns the listener task that owns the read
//! half. The write half stays behind a mutex so lines from concurrent
//! callers never interleave.
//!
//! # Session lifecycle
//!
//! ```text
//! Disconnected --open()--> Handshaking --handshake ok--> Online
//!       ^                       |                          |
//!       +------ failure --------+---- EOF / error / close -+
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::error::ProtocolError;
use crate::protocol::{ConnectionConfig, listener, millis};
use crate::state::StateChange;

/// Connection state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No socket is open.
    #[default]
    Disconnected,
    /// The socket is open and the login exchange is in progress.
    Handshaking,
    /// Logged in; the listener is running.
    Online,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Handshaking => "handshaking",
            Self::Online => "online",
        };
        f.write_str(name)
    }
}

/// Receiver of the events a [`Connection`] produces.
///
/// All methods are called synchronously from the connection; `on_change`
/// runs on the listener task.
pub trait ConnectionHandler: Send + Sync {
    /// A value line was parsed.
    fn on_change(&self, change: &StateChange);

    /// A session was established.
    fn on_connected(&self) {}

    /// An established session ended.
    fn on_connection_lost(&self) {}
}

struct Session {
    writer: OwnedWriteHalf,
    listener: JoinHandle<()>,
    generation: u64,
}

/// A single TCP session to a device, reopened on demand.
pub struct Connection {
    config: ConnectionConfig,
    handler: Arc<dyn ConnectionHandler>,
    state: RwLock<ConnectionState>,
    session: Mutex<Option<Session>>,
    generation: AtomicU64,
}

impl Connection {
    /// Creates a disconnected connection.
    #[must_use]
    pub fn new(config: ConnectionConfig, handler: Arc<dyn ConnectionHandler>) -> Self {
        Self {
            config,
            handler,
            state: RwLock::new(ConnectionState::Disconnected),
            session: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Returns `true` if a session is established.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.state() == ConnectionState::Online
    }

    pub(crate) fn handler(&self) -> &dyn ConnectionHandler {
        self.handler.as_ref()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    /// Opens the session unless it is already online.
    ///
    /// # Errors
    ///
    /// Returns a connection failure if connecting or the handshake fails.
    pub async fn open(self: &Arc<Self>) -> Result<(), ProtocolError> {
        let mut slot = self.session.lock().await;
        self.open_locked(&mut slot).await.map(|_| ())
    }

    /// Writes one framed line, opening the session first if needed.
    ///
    /// # Errors
    ///
    /// Returns a connection failure if the session cannot be opened, or
    /// `ProtocolError::Io` if the write fails. A failed write ends the
    /// session.
    pub async fn send(self: &Arc<Self>, line: &str) -> Result<(), ProtocolError> {
        let mut slot = self.session.lock().await;
        let session = self.open_locked(&mut slot).await?;

        tracing::debug!(line = line.trim_end(), "Sending line");
        let written = async {
            session.writer.write_all(line.as_bytes()).await?;
            session.writer.flush().await
        }
        .await;

        if let Err(e) = written {
            tracing::warn!(error = %e, "Write to device failed, closing session");
            if let Some(dead) = slot.take() {
                dead.listener.abort();
            }
            self.set_state(ConnectionState::Disconnected);
            drop(slot);
            self.handler.on_connection_lost();
            return Err(e.into());
        }
        Ok(())
    }

    /// Closes the session. Does nothing if already closed.
    pub async fn close(&self) {
        let mut slot = self.session.lock().await;
        let Some(mut session) = slot.take() else {
            self.set_state(ConnectionState::Disconnected);
            return;
        };

        session.listener.abort();
        let _ = session.writer.shutdown().await;
        self.set_state(ConnectionState::Disconnected);
        drop(slot);

        tracing::info!(host = %self.config.host(), "Connection closed");
        self.handler.on_connection_lost();
    }

    /// Checks that the device accepts a connection and the credentials.
    ///
    /// Uses a separate socket that is closed again right away; the
    /// connection state is not changed.
    ///
    /// # Errors
    ///
    /// Returns a connection failure if connecting or the handshake fails.
    pub async fn probe(&self) -> Result<(), ProtocolError> {
        if self.is_online() {
            return Ok(());
        }
        let (_reader, mut writer) = self.establish().await?;
        let _ = writer.shutdown().await;
        tracing::debug!(host = %self.config.host(), "Connection test succeeded");
        Ok(())
    }

    /// Tears the session down without waiting; used on drop.
    ///
    /// If the session lock is held, the abort is handed to a task on the
    /// current runtime, when there is one.
    pub(crate) fn shutdown_now(self: &Arc<Self>) {
        match self.session.try_lock() {
            Ok(mut slot) => {
                if let Some(session) = slot.take() {
                    session.listener.abort();
                }
            }
            Err(_) => {
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    let connection = Arc::clone(self);
                    runtime.spawn(async move {
                        if let Some(session) = connection.session.lock().await.take() {
                            session.listener.abort();
                        }
                    });
                }
            }
        }
        self.set_state(ConnectionState::Disconnected);
    }

    /// Called by the listener task of `generation` when it stops reading.
    pub(crate) async fn listener_finished(&self, generation: u64) {
        let mut slot = self.session.lock().await;
        if !slot.as_ref().is_some_and(|s| s.generation == generation) {
            return;
        }
        if let Some(mut session) = slot.take() {
            let _ = session.writer.shutdown().await;
        }
        self.set_state(ConnectionState::Disconnected);
        drop(slot);

        tracing::info!(host = %self.config.host(), "Device went offline");
        self.handler.on_connection_lost();
    }

    async fn open_locked<'a>(
        self: &Arc<Self>,
        slot: &'a mut Option<Session>,
    ) -> Result<&'a mut Session, ProtocolError> {
        let alive = slot.as_ref().is_some_and(|s| !s.listener.is_finished());
        if !alive {
            if let Some(stale) = slot.take() {
                stale.listener.abort();
                self.set_state(ConnectionState::Disconnected);
                self.handler.on_connection_lost();
            }
            *slot = Some(self.connect().await?);
            self.handler.on_connected();
        }
        slot.as_mut()
            .ok_or_else(|| ProtocolError::ConnectionFailed("session closed".to_string()))
    }

    async fn connect(self: &Arc<Self>) -> Result<Session, ProtocolError> {
        self.set_state(ConnectionState::Handshaking);

        let (reader, writer) = match self.establish().await {
            Ok(halves) => halves,
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                tracing::warn!(
                    host = %self.config.host(),
                    port = self.config.port(),
                    error = %e,
                    "Failed to connect to device"
                );
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_state(ConnectionState::Online);
        let listener = tokio::spawn(listener::run(reader, Arc::clone(self), generation));

        tracing::info!(
            host = %self.config.host(),
            port = self.config.port(),
            dialect = %self.config.dialect(),
            generation,
            "Connected to device"
        );

        Ok(Session {
            writer,
            listener,
            generation,
        })
    }

    async fn establish(&self) -> Result<(BufReader<OwnedReadHalf>, OwnedWriteHalf), ProtocolError> {
        let host = self.config.host();
        let port = self.config.port();
        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress("empty host".to_string()));
        }

        let connect_timeout = self.config.connect_timeout();
        let stream = timeout(connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| ProtocolError::Timeout(millis(connect_timeout)))?
            .map_err(|e| ProtocolError::ConnectionFailed(format!("{host}:{port}: {e}")))?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        let (read_half, mut writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);
        let (username, password) = self.config.credentials().unwrap_or(("", ""));

        let handshake_timeout = self.config.handshake_timeout();
        timeout(
            handshake_timeout,
            self.config
                .dialect()
                .handshake(&mut reader, &mut writer, username, password),
        )
        .await
        .map_err(|_| ProtocolError::Timeout(millis(handshake_timeout)))??;

        Ok((reader, writer))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
