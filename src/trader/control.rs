//! Message-passing control plane for the trading worker

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, watch};

use crate::errors::{BotError, BotResult};
use crate::positions::Position;

const COMMAND_BUFFER: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraderCommand {
    Pause,
    Resume,
    /// Stop after the current cycle and flush the store
    Shutdown,
}

/// Read-only view published by the worker after every cycle and command
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraderStatus {
    pub running: bool,
    pub paused: bool,
    pub cycles: u64,
    pub open_positions: Vec<Position>,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Cloneable handle held by the admin API, signal handler and tests
#[derive(Clone)]
pub struct ControlHandle {
    cmd_tx: mpsc::Sender<TraderCommand>,
    status_rx: watch::Receiver<TraderStatus>,
}

/// Worker side of the control channel
pub struct ControlReceiver {
    pub(crate) commands: mpsc::Receiver<TraderCommand>,
    pub(crate) status: watch::Sender<TraderStatus>,
}

pub fn control_channel(initial: TraderStatus) -> (ControlHandle, ControlReceiver) {
    let (cmd_tx, commands) = mpsc::channel(COMMAND_BUFFER);
    let (status, status_rx) = watch::channel(initial);
    (
        ControlHandle { cmd_tx, status_rx },
        ControlReceiver { commands, status },
    )
}

impl ControlHandle {
    pub async fn send(&self, command: TraderCommand) -> BotResult<()> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| BotError::Execution("trader worker has stopped".to_string()))
    }

    pub async fn pause(&self) -> BotResult<()> {
        self.send(TraderCommand::Pause).await
    }

    pub async fn resume(&self) -> BotResult<()> {
        self.send(TraderCommand::Resume).await
    }

    /// Non-blocking shutdown request for signal handlers
    pub fn request_shutdown(&self) -> bool {
        self.cmd_tx.try_send(TraderCommand::Shutdown).is_ok()
    }

    pub fn status(&self) -> TraderStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TraderStatus> {
        self.status_rx.clone()
    }
}
