//! Level change requests forwarded to the game loop.

use emberfall_domain::SceneName;
use tokio::sync::mpsc;

use crate::infrastructure::ports::{GameStateMachine, StateMachineError};

/// Receiving end owned by whatever sequences levels.
pub type LevelRequests = mpsc::UnboundedReceiver<SceneName>;

pub struct ChannelStateMachine {
    requests: mpsc::UnboundedSender<SceneName>,
}

impl ChannelStateMachine {
    pub fn channel() -> (Self, LevelRequests) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Self { requests }, receiver)
    }
}

impl GameStateMachine for ChannelStateMachine {
    fn enter_level(&self, scene: &SceneName) -> Result<(), StateMachineError> {
        self.requests
            .send(scene.clone())
            .map_err(|_| StateMachineError::Closed)?;
        tracing::info!(scene = %scene, "Requested level change");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forwards_requests_in_order() {
        let (machine, mut requests) = ChannelStateMachine::channel();
        machine.enter_level(&SceneName::new("Dungeon").unwrap()).unwrap();
        machine.enter_level(&SceneName::new("Main").unwrap()).unwrap();

        assert_eq!(requests.recv().await.unwrap().as_str(), "Dungeon");
        assert_eq!(requests.recv().await.unwrap().as_str(), "Main");
    }

    #[test]
    fn closed_receiver_is_an_error() {
        let (machine, requests) = ChannelStateMachine::channel();
        drop(requests);
        assert!(matches!(
            machine.enter_level(&SceneName::new("Main").unwrap()),
            Err(StateMachineError::Closed)
        ));
    }
}
