//! Off-thread execution of backend work.
//!
//! The UI loop never blocks on the network: it dispatches a `BackgroundTask`
//! and later receives the matching `TaskOutcome` as an `AppEvent`.

use std::{
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use crate::domain::events::{AppEvent, TaskOutcome};

use super::{
    contracts::TaskDispatcher,
    list_rooms::RoomsSource,
    load_home::{load_home, CommunitySource},
    load_messages::{load_messages, LoadMessagesQuery, MessagesSource},
    send_message::{send_message, MessageSender, SendMessageCommand},
};

const BACKGROUND_WORKER_SHUTDOWN_FAILED: &str = "BACKGROUND_WORKER_SHUTDOWN_FAILED";
const BACKGROUND_TASK_DISPATCH_FAILED: &str = "BACKGROUND_TASK_DISPATCH_FAILED";
const BACKGROUND_RESULT_UNDELIVERED: &str = "BACKGROUND_RESULT_UNDELIVERED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundTask {
    LoadHome {
        user_id: Option<String>,
    },
    LoadMessages {
        room_id: String,
        generation: u64,
        limit: usize,
    },
    SendMessage {
        send_id: u64,
        command: SendMessageCommand,
    },
}

/// Everything the worker needs from the data service.
pub trait BackendPort:
    MessagesSource + MessageSender + RoomsSource + CommunitySource + Send + Sync
{
}

impl<T> BackendPort for T where
    T: MessagesSource + MessageSender + RoomsSource + CommunitySource + Send + Sync
{
}

pub fn execute<B: BackendPort>(backend: &B, task: BackgroundTask) -> TaskOutcome {
    match task {
        BackgroundTask::LoadHome { user_id } => {
            match load_home(backend, backend, user_id.as_deref()) {
                Ok(snapshot) => TaskOutcome::HomeLoaded(snapshot),
                Err(error) => {
                    tracing::warn!(code = error.code(), "home load failed");
                    TaskOutcome::HomeFailed { code: error.code() }
                }
            }
        }
        BackgroundTask::LoadMessages {
            room_id,
            generation,
            limit,
        } => {
            let query = LoadMessagesQuery::new(room_id.clone()).with_limit(limit);
            match load_messages(backend, query) {
                Ok(output) => TaskOutcome::MessagesLoaded {
                    room_id,
                    generation,
                    messages: output.messages,
                },
                Err(error) => {
                    tracing::warn!(code = error.code(), room_id = %room_id, "message load failed");
                    TaskOutcome::MessagesFailed {
                        room_id,
                        generation,
                        code: error.code(),
                    }
                }
            }
        }
        BackgroundTask::SendMessage { send_id, command } => {
            let room_id = command.room_id.clone();
            match send_message(backend, command) {
                Ok(()) => TaskOutcome::MessageSent { room_id, send_id },
                Err(error) => {
                    tracing::warn!(
                        code = "SEND_MESSAGE_FAILED",
                        reason = error.code(),
                        room_id = %room_id,
                        "message send failed"
                    );
                    TaskOutcome::MessageSendFailed {
                        room_id,
                        send_id,
                        code: error.code(),
                    }
                }
            }
        }
    }
}

/// A single worker thread draining a task queue in order.
#[derive(Debug)]
pub struct BackgroundWorker {
    task_tx: Option<Sender<BackgroundTask>>,
    worker: Option<JoinHandle<()>>,
}

impl BackgroundWorker {
    pub fn spawn<B>(backend: Arc<B>, event_tx: Sender<AppEvent>) -> std::io::Result<Self>
    where
        B: BackendPort + 'static,
    {
        let (task_tx, task_rx) = mpsc::channel::<BackgroundTask>();
        let worker = thread::Builder::new()
            .name("codebluer-backend".to_owned())
            .spawn(move || run_worker(backend.as_ref(), task_rx, event_tx))?;

        Ok(Self {
            task_tx: Some(task_tx),
            worker: Some(worker),
        })
    }
}

impl TaskDispatcher for BackgroundWorker {
    fn dispatch(&self, task: BackgroundTask) {
        let Some(task_tx) = self.task_tx.as_ref() else {
            return;
        };
        if let Err(error) = task_tx.send(task) {
            tracing::warn!(
                code = BACKGROUND_TASK_DISPATCH_FAILED,
                task = ?error.0,
                "background worker is gone; task dropped"
            );
        }
    }
}

impl Drop for BackgroundWorker {
    fn drop(&mut self) {
        // Closing the queue lets the worker finish its current task and exit.
        self.task_tx.take();

        if let Some(worker) = self.worker.take() {
            if let Err(error) = worker.join() {
                tracing::warn!(
                    code = BACKGROUND_WORKER_SHUTDOWN_FAILED,
                    error = ?error,
                    "background worker panicked on shutdown"
                );
            }
        }
    }
}

fn run_worker<B: BackendPort>(
    backend: &B,
    task_rx: Receiver<BackgroundTask>,
    event_tx: Sender<AppEvent>,
) {
    while let Ok(task) = task_rx.recv() {
        let outcome = execute(backend, task);
        if event_tx.send(AppEvent::TaskCompleted(outcome)).is_err() {
            tracing::debug!(
                code = BACKGROUND_RESULT_UNDELIVERED,
                "UI loop is gone; stopping background worker"
            );
            return;
        }
    }
}
