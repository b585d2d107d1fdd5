use super::pipeline::{RefreshOutcome, RefreshPipeline};
use crate::error::CountrydexError;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::info;

#[derive(Debug)]
pub enum RefreshMessage {
    /// Run one refresh and reply with its outcome.
    Run(RpcReplyPort<Result<RefreshOutcome, CountrydexError>>),
}

/// Cloneable entry point for refreshes. Requests are processed one at a time, so
/// overlapping callers never interleave writes.
#[derive(Clone)]
pub struct RefreshHandle {
    actor: ActorRef<RefreshMessage>,
}

impl RefreshHandle {
    pub async fn refresh(&self) -> Result<RefreshOutcome, CountrydexError> {
        ractor::call!(self.actor, RefreshMessage::Run)
            .map_err(|e| CountrydexError::Ractor(format!("Refresh RPC failed: {e}")))?
    }
}

struct RefreshActor;

#[ractor::async_trait]
impl Actor for RefreshActor {
    type Msg = RefreshMessage;
    type State = RefreshPipeline;
    type Arguments = RefreshPipeline;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        pipeline: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("RefreshActor initialized");
        Ok(pipeline)
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            RefreshMessage::Run(reply) => {
                let res = state.run().await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

/// Spawn the refresh actor and return a cloneable handle.
pub async fn spawn(pipeline: RefreshPipeline) -> Result<RefreshHandle, CountrydexError> {
    let (actor, _jh) = Actor::spawn(None, RefreshActor, pipeline)
        .await
        .map_err(|e| CountrydexError::Ractor(format!("failed to spawn RefreshActor: {e}")))?;

    Ok(RefreshHandle { actor })
}
