//! Duel actor: serializes every action through one task.

use tokio::sync::{mpsc, oneshot};

use super::errors::{DuelError, DuelResult};
use super::manager::DuelManager;
use super::messages::{DuelAction, DuelMessage, DuelResponse};

/// Cloneable handle for submitting actions to the duel actor
#[derive(Clone)]
pub struct DuelHandle {
    sender: mpsc::Sender<DuelMessage>,
}

impl DuelHandle {
    pub fn new(sender: mpsc::Sender<DuelMessage>) -> Self {
        Self { sender }
    }

    /// Submit `action` and wait for its result
    ///
    /// # Errors
    ///
    /// Returns `DuelError::ServiceUnavailable` if the actor has stopped, or
    /// the rejection produced by the state machine.
    pub async fn submit(&self, action: DuelAction) -> DuelResult<DuelResponse> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(DuelMessage::Action { action, response })
            .await
            .map_err(|_| DuelError::ServiceUnavailable)?;
        receiver.await.map_err(|_| DuelError::ServiceUnavailable)?
    }

    /// Ask the actor to stop
    pub async fn close(&self) -> DuelResult<()> {
        self.sender
            .send(DuelMessage::Close)
            .await
            .map_err(|_| DuelError::ServiceUnavailable)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Owns the [`DuelManager`] and applies one message at a time
pub struct DuelActor {
    manager: DuelManager,
    inbox: mpsc::Receiver<DuelMessage>,
}

impl DuelActor {
    /// Create a new duel actor
    ///
    /// # Returns
    ///
    /// * `(DuelActor, DuelHandle)` - Actor and handle for sending messages
    pub fn new(manager: DuelManager, capacity: usize) -> (Self, DuelHandle) {
        let (sender, inbox) = mpsc::channel(capacity.max(1));
        (Self { manager, inbox }, DuelHandle::new(sender))
    }

    /// Run the actor event loop until closed or every handle is dropped
    pub async fn run(mut self) {
        log::info!("Duel actor starting");

        while let Some(message) = self.inbox.recv().await {
            match message {
                DuelMessage::Action { action, response } => {
                    let result = self.manager.handle(action.clone()).await;
                    if let Err(e) = &result {
                        log::warn!("Rejected {:?}: {}", action, e);
                    }
                    if response.send(result).is_err() {
                        log::debug!("Caller dropped before {:?} completed", action);
                    }
                }
                DuelMessage::Close => break,
            }
        }

        log::info!(
            "Duel actor stopped with {} duel(s) in flight",
            self.manager.registry().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::StaticDealerRoster;
    use crate::payout::CommissionRate;
    use crate::records::{InMemoryMatchRecordRepository, MatchRecordManager};
    use std::sync::Arc;

    fn spawn() -> DuelHandle {
        let records = MatchRecordManager::new(
            Arc::new(InMemoryMatchRecordRepository::new()),
            CommissionRate::default(),
        );
        let manager = DuelManager::new(records, Arc::new(StaticDealerRoster::new([3])));
        let (actor, handle) = DuelActor::new(manager, 8);
        tokio::spawn(actor.run());
        handle
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let handle = spawn();
        let response = handle
            .submit(DuelAction::Challenge { user_id: 1, stake: 50 })
            .await
            .unwrap();
        assert!(matches!(response, DuelResponse::Challenged { .. }));

        let err = handle
            .submit(DuelAction::Challenge { user_id: 1, stake: 50 })
            .await
            .unwrap_err();
        assert!(matches!(err, DuelError::AlreadyInDuel(1)));
    }

    #[tokio::test]
    async fn test_closed_actor_is_unavailable() {
        let handle = spawn();
        handle.close().await.unwrap();

        // Messages queued behind Close are dropped with the inbox.
        let result = handle.submit(DuelAction::RequestGlobalStats).await;
        assert!(matches!(result, Err(DuelError::ServiceUnavailable)));
    }
}
