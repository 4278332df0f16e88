use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use super::{ControllerCommand, ControllerSnapshot};

/// Handle to communicate with the controller service
#[derive(Clone)]
pub struct ControllerHandle {
    cmd_tx: mpsc::Sender<ControllerCommand>,
}

impl ControllerHandle {
    pub(super) fn new(cmd_tx: mpsc::Sender<ControllerCommand>) -> Self {
        Self { cmd_tx }
    }

    async fn send(&self, cmd: ControllerCommand) -> Result<(), String> {
        self.cmd_tx.send(cmd).await.map_err(|e| e.to_string())
    }

    pub async fn start(&self) -> Result<(), String> {
        self.send(ControllerCommand::Start).await
    }

    pub async fn pause(&self) -> Result<(), String> {
        self.send(ControllerCommand::Pause).await
    }

    pub async fn toggle(&self) -> Result<(), String> {
        self.send(ControllerCommand::Toggle).await
    }

    pub async fn reset(&self) -> Result<(), String> {
        self.send(ControllerCommand::Reset).await
    }

    /// Enter edit mode (refused while running)
    pub async fn begin_edit(&self) -> Result<(), String> {
        self.send(ControllerCommand::BeginEdit).await
    }

    /// Leave edit mode, applying `input` if it is a valid `HH:MM:SS`
    pub async fn commit_edit(&self, input: impl Into<String>) -> Result<(), String> {
        self.send(ControllerCommand::CommitEdit(input.into())).await
    }

    /// Re-fetch the sound list from the asset store
    pub async fn refresh(&self) -> Result<(), String> {
        self.send(ControllerCommand::Refresh).await
    }

    pub async fn upload(&self, paths: Vec<PathBuf>) -> Result<(), String> {
        self.send(ControllerCommand::Upload(paths)).await
    }

    pub async fn delete(&self, name: impl Into<String>) -> Result<(), String> {
        self.send(ControllerCommand::Delete(name.into())).await
    }

    pub async fn snapshot(&self) -> Result<ControllerSnapshot, String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ControllerCommand::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|e| e.to_string())
    }

    pub async fn shutdown(&self) -> Result<(), String> {
        self.send(ControllerCommand::Shutdown).await
    }
}
