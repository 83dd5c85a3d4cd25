//! Worker loop: scan then manage, publish status, sleep, repeat

use chrono::Utc;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::{sleep_until, Instant};

use super::control::{ControlReceiver, TraderCommand, TraderStatus};
use super::{acquisition, manager, TraderContext};
use crate::logger::{self, LogTag};
use crate::notifications::{dispatch, Notification, NotificationType};
use crate::positions::PositionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

pub struct Scheduler {
    ctx: TraderContext,
    store: PositionStore,
    control: ControlReceiver,
    paused: bool,
    cycles: u64,
    last_cycle_at: Option<chrono::DateTime<Utc>>,
    last_error: Option<String>,
    commands_closed: bool,
}

impl Scheduler {
    pub fn new(ctx: TraderContext, store: PositionStore, control: ControlReceiver, paused: bool) -> Self {
        Self {
            ctx,
            store,
            control,
            paused,
            cycles: 0,
            last_cycle_at: None,
            last_error: None,
            commands_closed: false,
        }
    }

    /// Run until a Shutdown command arrives; returns the flushed store
    pub async fn run(mut self) -> PositionStore {
        let interval = Duration::from_secs(self.ctx.settings.cycle_interval_secs.max(1));
        logger::info(
            LogTag::Trader,
            &format!(
                "Trader started ({} open positions, {}s interval{})",
                self.store.len(),
                interval.as_secs(),
                if self.paused { ", paused" } else { "" }
            ),
        );
        self.publish(true);

        'outer: loop {
            if self.drain_commands() == Flow::Stop {
                break;
            }

            if self.paused {
                logger::debug(LogTag::Trader, "Trader paused, skipping cycle");
            } else {
                self.run_cycle().await;
            }
            self.publish(true);

            let deadline = Instant::now() + interval;
            loop {
                if self.commands_closed {
                    sleep_until(deadline).await;
                    break;
                }
                tokio::select! {
                    _ = sleep_until(deadline) => break,
                    command = self.control.commands.recv() => match command {
                        Some(command) => {
                            if self.apply(command) == Flow::Stop {
                                break 'outer;
                            }
                            self.publish(true);
                        }
                        None => self.commands_closed = true,
                    }
                }
            }
        }

        self.shutdown().await;
        self.store
    }

    async fn run_cycle(&mut self) {
        let today = Utc::now().date_naive();
        let mut errors = Vec::new();

        match acquisition::scan_cycle(&self.ctx, &mut self.store).await {
            Ok(summary) => {
                if !summary.opened.is_empty() {
                    logger::info(
                        LogTag::Trader,
                        &format!("Opened {} new positions", summary.opened.len()),
                    );
                }
            }
            Err(e) => {
                if e.is_recoverable() {
                    logger::warning(LogTag::Trader, &format!("Scan cycle failed, retrying next cycle: {}", e));
                } else {
                    logger::error(LogTag::Trader, &format!("Scan cycle failed: {}", e));
                }
                errors.push(format!("scan: {}", e));
            }
        }

        match manager::manage_cycle(&self.ctx, &mut self.store, today).await {
            Ok(summary) => logger::debug(
                LogTag::Trader,
                &format!(
                    "Management cycle: {} evaluated, {} skipped, {} sells, {} closed",
                    summary.evaluated, summary.skipped, summary.sells, summary.closed
                ),
            ),
            Err(e) => {
                logger::error(LogTag::Trader, &format!("Management cycle failed: {}", e));
                errors.push(format!("manage: {}", e));
            }
        }

        self.cycles += 1;
        self.last_cycle_at = Some(Utc::now());
        self.last_error = errors.pop();
    }

    fn drain_commands(&mut self) -> Flow {
        loop {
            match self.control.commands.try_recv() {
                Ok(command) => {
                    if self.apply(command) == Flow::Stop {
                        return Flow::Stop;
                    }
                }
                Err(TryRecvError::Empty) => return Flow::Continue,
                Err(TryRecvError::Disconnected) => {
                    self.commands_closed = true;
                    return Flow::Continue;
                }
            }
        }
    }

    fn apply(&mut self, command: TraderCommand) -> Flow {
        match command {
            TraderCommand::Pause => {
                if !self.paused {
                    logger::info(LogTag::Trader, "Trader paused");
                }
                self.paused = true;
                Flow::Continue
            }
            TraderCommand::Resume => {
                if self.paused {
                    logger::info(LogTag::Trader, "Trader resumed");
                }
                self.paused = false;
                Flow::Continue
            }
            TraderCommand::Shutdown => {
                logger::info(LogTag::Trader, "Shutdown requested");
                Flow::Stop
            }
        }
    }

    fn publish(&self, running: bool) {
        self.control.status.send_replace(TraderStatus {
            running,
            paused: self.paused,
            cycles: self.cycles,
            open_positions: self.store.snapshot(),
            last_cycle_at: self.last_cycle_at,
            last_error: self.last_error.clone(),
        });
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.store.save().await {
            logger::error(
                LogTag::Positions,
                &format!("Failed to save positions on shutdown: {}", e),
            );
        }
        self.publish(false);
        dispatch(
            &self.ctx.services.notifier,
            Notification::new(NotificationType::BotStopped {
                reason: format!("shutdown after {} cycles", self.cycles),
            }),
        );
        logger::info(LogTag::Trader, "Trader stopped");
    }
}
