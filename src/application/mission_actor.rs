use super::mission_orchestrator::MissionOrchestrator;
use crate::common::{ApplicationError, ApplicationResult};
use crate::domains::mission::{CommandSource, RoverStatus, SequenceReport};
use crate::domains::rover::Command;
use tokio::sync::{mpsc, oneshot, watch};

pub enum MissionRequest {
    Execute {
        commands: Vec<Command>,
        respond_to: Option<oneshot::Sender<SequenceReport>>,
    },
}

/// Single consumer of the inbound queue. Sequences run strictly one after the
/// other; anything arriving meanwhile (during a charge, say) waits in the queue.
pub struct MissionActor {
    orchestrator: MissionOrchestrator,
    receiver: mpsc::Receiver<MissionRequest>,
}

impl MissionActor {
    pub fn new(orchestrator: MissionOrchestrator, capacity: usize) -> (Self, MissionHandle) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let handle = MissionHandle {
            sender,
            status: orchestrator.subscribe(),
        };
        (
            Self {
                orchestrator,
                receiver,
            },
            handle,
        )
    }

    /// Runs until every handle is dropped, then hands the orchestrator back.
    pub async fn run(mut self) -> MissionOrchestrator {
        while let Some(request) = self.receiver.recv().await {
            match request {
                MissionRequest::Execute {
                    commands,
                    respond_to,
                } => {
                    let report = self.orchestrator.submit(commands).await;
                    tracing::info!(
                        completed = report.completed,
                        total = report.total,
                        halt = ?report.halt_reason,
                        "Sequence finished"
                    );
                    if let Some(respond_to) = respond_to {
                        if respond_to.send(report).is_err() {
                            tracing::warn!("Submitter went away before the report was ready");
                        }
                    }
                }
            }
        }
        self.orchestrator
    }
}

#[derive(Clone)]
pub struct MissionHandle {
    sender: mpsc::Sender<MissionRequest>,
    status: watch::Receiver<RoverStatus>,
}

impl MissionHandle {
    /// Queues a sequence and waits for its report.
    pub async fn submit(&self, commands: Vec<Command>) -> ApplicationResult<SequenceReport> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(MissionRequest::Execute {
                commands,
                respond_to: Some(respond_to),
            })
            .await
            .map_err(|_| ApplicationError::QueueClosed)?;

        response.await.map_err(|_| ApplicationError::QueueClosed)
    }

    /// Queues a sequence without waiting for it to run.
    pub async fn enqueue(&self, commands: Vec<Command>) -> ApplicationResult<()> {
        self.sender
            .send(MissionRequest::Execute {
                commands,
                respond_to: None,
            })
            .await
            .map_err(|_| ApplicationError::QueueClosed)
    }

    /// Latest published snapshot; safe to call while a sequence is running.
    pub fn status(&self) -> RoverStatus {
        self.status.borrow().clone()
    }
}

/// Feeds every sequence a transport delivers into the mission queue, in arrival
/// order. Returns how many sequences were forwarded once the source closes.
pub async fn pump_commands<S: CommandSource>(
    mut source: S,
    handle: MissionHandle,
) -> ApplicationResult<usize> {
    let mut forwarded = 0;
    while let Some(commands) = source.receive_commands().await {
        handle.enqueue(commands).await?;
        forwarded += 1;
    }
    tracing::info!(forwarded, "Command source closed");
    Ok(forwarded)
}
