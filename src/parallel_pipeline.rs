use crate::core_modules::intensity_grid::IntensityGrid;
use crate::error::{Result, TriageError};
use crate::pipeline::{evaluate_grid, BatchReport, ImageVerdict, TriageConfig};
use futures::future::join_all;
use log::{error, info};
use tokio::sync::{mpsc, oneshot};

pub struct ImageTask {
    pub grid: IntensityGrid,
    pub result_sender: oneshot::Sender<Result<ImageVerdict>>,
}

pub struct WorkerPool {
    task_sender: mpsc::UnboundedSender<ImageTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_count` analysis workers; 0 selects one per CPU.
    pub fn new(config: TriageConfig, worker_count: usize) -> Self {
        let worker_count = if worker_count == 0 {
            num_cpus::get()
        } else {
            worker_count
        };

        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<ImageTask>();
        let mut workers = Vec::new();

        // Create a single dispatcher that distributes tasks to workers
        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<ImageTask>())
            .unzip();

        // Spawn dispatcher
        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_idx].send(task);
                worker_idx = (worker_idx + 1) % worker_count;
            }
        });

        // Spawn workers
        for mut worker_receiver in worker_receivers {
            let worker_config = config.clone();

            let worker = tokio::spawn(async move {
                while let Some(task) = worker_receiver.recv().await {
                    let verdict = evaluate_grid(&task.grid, &worker_config);
                    let _ = task.result_sender.send(verdict);
                }
            });

            workers.push(worker);
        }

        Self {
            task_sender,
            workers,
        }
    }

    /// Queues one grid for analysis. The receiver resolves once a worker has
    /// produced the verdict; the grid is dropped inside the pool right after.
    pub fn submit(
        &self,
        name: &str,
        grid: IntensityGrid,
    ) -> Result<oneshot::Receiver<Result<ImageVerdict>>> {
        let (result_sender, result_receiver) = oneshot::channel();

        self.task_sender
            .send(ImageTask {
                grid,
                result_sender,
            })
            .map_err(|_| TriageError::AnalysisFailure {
                name: name.to_string(),
                reason: "worker pool stopped accepting tasks".to_string(),
            })?;

        Ok(result_receiver)
    }
}

/// Checks a whole batch across a pool of workers, consuming the grids as it
/// goes. Verdicts are merged in submission order, so the report matches what
/// the sequential pipeline would produce for the same batch.
pub async fn check_parallel(
    images: Vec<(String, IntensityGrid)>,
    config: TriageConfig,
    worker_count: usize,
) -> BatchReport {
    let pool = WorkerPool::new(config, worker_count);

    let mut names = Vec::with_capacity(images.len());
    let mut receivers = Vec::with_capacity(images.len());
    let mut report = BatchReport::default();

    for (name, grid) in images {
        match pool.submit(&name, grid) {
            Ok(receiver) => {
                names.push(name);
                receivers.push(receiver);
            }
            Err(err) => {
                error!("{}", err);
                report.failures.push(name);
            }
        }
    }

    // Every task is in flight; closing the channel lets the dispatcher and
    // the workers drain their queues and exit.
    let WorkerPool {
        task_sender,
        workers,
    } = pool;
    drop(task_sender);

    for (name, received) in names.into_iter().zip(join_all(receivers).await) {
        match received {
            Ok(Ok(ImageVerdict::EnclosedAnomaly(found))) => {
                info!(
                    "'{}': region {} is fully surrounded by region {}",
                    name, found.region, found.surrounded_by
                );
                report.processed.push(name.clone());
                report.flagged.push(name);
            }
            Ok(Ok(ImageVerdict::Clear)) => report.processed.push(name),
            Ok(Err(err)) => {
                let failure = TriageError::AnalysisFailure {
                    name: name.clone(),
                    reason: err.to_string(),
                };
                error!("{}", failure);
                report.failures.push(name);
            }
            Err(_) => {
                error!("worker dropped the result for '{}'", name);
                report.failures.push(name);
            }
        }
    }

    join_all(workers).await;

    info!(
        "checked {} images in parallel, flagged {}, {} analysis failures",
        report.processed.len(),
        report.flagged.len(),
        report.failures.len()
    );
    report
}
