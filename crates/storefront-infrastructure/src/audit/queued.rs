use async_trait::async_trait;
use flume::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use storefront_core::{AuditEntry, AuditError, AuditLogger};
use storefront_shared::config::AuditSettings;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Destination for flushed batches.
#[async_trait]
pub trait BatchWriter: Send + Sync + 'static {
    async fn write_batch(&self, entries: &[AuditEntry]) -> Result<usize, AuditError>;
}

/// Queue configuration
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Max entries held in memory before new ones are rejected
    pub queue_capacity: usize,

    /// Entries per INSERT
    pub batch_size: usize,

    /// Max wait before flushing a partial batch (milliseconds)
    pub batch_timeout_ms: u64,

    pub worker_count: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10_000,
            batch_size: 100,
            batch_timeout_ms: 1000,
            worker_count: 2,
        }
    }
}

impl From<&AuditSettings> for QueueConfig {
    fn from(settings: &AuditSettings) -> Self {
        Self {
            queue_capacity: settings.queue_capacity,
            batch_size: settings.batch_size,
            batch_timeout_ms: settings.batch_timeout_ms,
            worker_count: settings.worker_count,
        }
    }
}

/// Fire-and-forget audit logger backed by a bounded queue and batch workers.
///
/// `log_user_activity` only enqueues; write failures surface in the worker
/// logs, never to the caller.
#[derive(Clone)]
pub struct QueuedAuditLogger {
    sender: Sender<AuditEntry>,
}

/// Handles to the batch workers, used to let them drain at shutdown.
pub struct AuditWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl AuditWorkers {
    /// Waits up to `grace` for the workers to flush and exit.
    ///
    /// Workers only exit once every `QueuedAuditLogger` clone is dropped.
    pub async fn drain(self, grace: Duration) {
        let pending = self.handles.len();
        let wait = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    error!("Audit worker panicked: {}", e);
                }
            }
        };

        match tokio::time::timeout(grace, wait).await {
            Ok(()) => info!("Audit queue drained ({} workers)", pending),
            Err(_) => warn!("Audit workers did not drain within {:?}; pending entries dropped", grace),
        }
    }
}

impl QueuedAuditLogger {
    /// Spawns the workers; must be called inside a tokio runtime.
    pub fn new(writer: Arc<dyn BatchWriter>, config: QueueConfig) -> (Self, AuditWorkers) {
        let (sender, receiver) = bounded(config.queue_capacity);

        info!(
            "Initializing QueuedAuditLogger: queue={}, batch={}, timeout={}ms, workers={}",
            config.queue_capacity, config.batch_size, config.batch_timeout_ms, config.worker_count
        );

        let handles = (0..config.worker_count)
            .map(|worker_id| {
                let writer = writer.clone();
                let receiver = receiver.clone();
                let config = config.clone();

                tokio::spawn(async move {
                    Self::worker_loop(worker_id, writer, receiver, config).await;
                })
            })
            .collect();

        (Self { sender }, AuditWorkers { handles })
    }

    async fn worker_loop(
        worker_id: usize,
        writer: Arc<dyn BatchWriter>,
        receiver: Receiver<AuditEntry>,
        config: QueueConfig,
    ) {
        info!("Audit worker {} started", worker_id);

        let mut batch: Vec<AuditEntry> = Vec::with_capacity(config.batch_size);
        let batch_timeout = Duration::from_millis(config.batch_timeout_ms);

        loop {
            let deadline = tokio::time::Instant::now() + batch_timeout;

            while batch.len() < config.batch_size {
                match tokio::time::timeout_at(deadline, receiver.recv_async()).await {
                    Ok(Ok(entry)) => batch.push(entry),
                    Ok(Err(_)) => {
                        // Channel closed, flush and exit
                        if !batch.is_empty() {
                            Self::flush_batch(writer.as_ref(), &batch, worker_id).await;
                        }
                        info!("Audit worker {} shutting down (channel closed)", worker_id);
                        return;
                    }
                    Err(_) => break,
                }
            }

            if !batch.is_empty() {
                Self::flush_batch(writer.as_ref(), &batch, worker_id).await;
                batch.clear();
            } else {
                sleep(Duration::from_millis(100)).await;
            }
        }
    }

    async fn flush_batch(writer: &dyn BatchWriter, batch: &[AuditEntry], worker_id: usize) {
        let start = std::time::Instant::now();
        debug!("Audit worker {} flushing {} entries", worker_id, batch.len());

        match writer.write_batch(batch).await {
            Ok(inserted) => {
                debug!(
                    "Audit worker {} wrote {} entries in {:?}",
                    worker_id,
                    inserted,
                    start.elapsed()
                );
            }
            Err(e) => {
                // Entries in a failed batch are dropped
                error!("Audit worker {} failed to write batch of {}: {}", worker_id, batch.len(), e);
            }
        }
    }

    pub fn queue_len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_queue_full(&self) -> bool {
        self.sender.is_full()
    }
}

#[async_trait]
impl AuditLogger for QueuedAuditLogger {
    async fn log_user_activity(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.sender.try_send(entry).map_err(|e| {
            warn!("Failed to enqueue audit entry: {}", e);
            AuditError::QueueFull(e.to_string())
        })
    }
}
