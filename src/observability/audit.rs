//! Audit recorder
//!
//! Catalog actions are handed to a background thread as one-way messages.
//! The worker stamps each entry and appends it to the record store. The
//! caller never sees the outcome: send failures and store failures are
//! logged as `AUDIT_DROPPED` and go no further.
//!
//! `flush` exists so tests and shutdown can wait for everything sent so far
//! to land.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::events::Event;
use super::log_event_with_fields;
use crate::model::{AuditAction, AuditLog, EntityKind};
use crate::storage::RecordStore;

enum AuditMessage {
    Record {
        actor_id: String,
        action: AuditAction,
        entity: EntityKind,
        entity_id: String,
        details: String,
    },
    Flush(Sender<()>),
}

/// Counters reported when the worker stops
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditStats {
    pub recorded: usize,
    pub dropped: usize,
}

/// Fire-and-forget writer of audit log entries
pub struct AuditRecorder {
    sender: Mutex<Option<Sender<AuditMessage>>>,
    handle: Mutex<Option<JoinHandle<AuditStats>>>,
}

impl AuditRecorder {
    /// Starts the worker thread writing into `store`
    pub fn spawn(store: Arc<RecordStore>) -> Self {
        let (tx, rx) = channel();

        let handle = thread::Builder::new()
            .name("catalogdb-audit".to_string())
            .spawn(move || run_worker(store, rx));

        let handle = match handle {
            Ok(handle) => {
                log_event_with_fields(Event::AuditWorkerStarted, &[]);
                Some(handle)
            }
            Err(err) => {
                log_event_with_fields(
                    Event::AuditDropped,
                    &[("reason", format!("worker spawn failed: {}", err).as_str())],
                );
                None
            }
        };

        Self {
            sender: Mutex::new(handle.as_ref().map(|_| tx)),
            handle: Mutex::new(handle),
        }
    }

    /// A recorder that discards everything
    pub fn disabled() -> Self {
        Self {
            sender: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    /// Whether entries are actually being written
    pub fn is_enabled(&self) -> bool {
        self.sender
            .lock()
            .map(|sender| sender.is_some())
            .unwrap_or(false)
    }

    /// Queues one audit entry. Never blocks on the store, never fails.
    pub fn record(
        &self,
        actor_id: &str,
        action: AuditAction,
        entity: EntityKind,
        entity_id: &str,
        details: &str,
    ) {
        let sender = match self.sender.lock() {
            Ok(sender) => sender,
            Err(_) => return,
        };
        let Some(sender) = sender.as_ref() else {
            return;
        };

        let message = AuditMessage::Record {
            actor_id: actor_id.to_string(),
            action,
            entity,
            entity_id: entity_id.to_string(),
            details: details.to_string(),
        };

        if sender.send(message).is_err() {
            log_event_with_fields(
                Event::AuditDropped,
                &[
                    ("action", action.as_str()),
                    ("entity_id", entity_id),
                    ("reason", "audit worker stopped"),
                ],
            );
        }
    }

    /// Blocks until every entry queued before this call has been processed
    pub fn flush(&self) {
        let (ack_tx, ack_rx) = channel();
        let sent = match self.sender.lock() {
            Ok(sender) => sender
                .as_ref()
                .map(|sender| sender.send(AuditMessage::Flush(ack_tx)).is_ok())
                .unwrap_or(false),
            Err(_) => false,
        };

        if sent {
            let _ = ack_rx.recv();
        }
    }

    /// Drains outstanding entries and stops the worker.
    ///
    /// Later `record` calls are silently discarded.
    pub fn shutdown(&self) -> AuditStats {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }

        let handle = match self.handle.lock() {
            Ok(mut handle) => handle.take(),
            Err(_) => None,
        };

        let stats = handle
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        log_event_with_fields(
            Event::AuditWorkerStopped,
            &[
                ("dropped", stats.dropped.to_string().as_str()),
                ("recorded", stats.recorded.to_string().as_str()),
            ],
        );
        stats
    }
}

impl Drop for AuditRecorder {
    fn drop(&mut self) {
        let running = self
            .handle
            .get_mut()
            .map(|handle| handle.is_some())
            .unwrap_or(false);
        if running {
            self.shutdown();
        }
    }
}

fn run_worker(store: Arc<RecordStore>, rx: Receiver<AuditMessage>) -> AuditStats {
    let mut stats = AuditStats::default();

    // Ends once every sender is gone.
    for message in rx {
        match message {
            AuditMessage::Record {
                actor_id,
                action,
                entity,
                entity_id,
                details,
            } => {
                let entry = AuditLog::new(action, entity, entity_id, actor_id, details);
                match store.create(entry) {
                    Ok(()) => stats.recorded += 1,
                    Err(err) => {
                        stats.dropped += 1;
                        log_event_with_fields(
                            Event::AuditDropped,
                            &[
                                ("action", action.as_str()),
                                ("reason", err.to_string().as_str()),
                            ],
                        );
                    }
                }
            }
            AuditMessage::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    stats
}
