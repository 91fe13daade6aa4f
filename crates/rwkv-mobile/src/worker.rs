use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkerError {
    #[error("worker {0} dropped the job (panicked or shut down)")]
    Disconnected(String),

    #[error("worker {0} did not answer within {1:?}")]
    Timeout(String, Duration),
}

/// One OS thread that runs submitted calls in FIFO order.
///
/// Give each `RuntimeHandle` its own worker: that serializes every call against
/// the handle while the submitting thread stays free.
pub struct CallWorker {
    name: String,
    tx: Option<mpsc::Sender<Job>>,
    thread: Option<JoinHandle<()>>,
}

impl CallWorker {
    pub fn spawn(name: impl Into<String>) -> std::io::Result<Self> {
        let name = name.into();
        let (tx, rx) = mpsc::channel::<Job>();
        let thread = thread::Builder::new().name(name.clone()).spawn(move || {
            while let Ok(job) = rx.recv() {
                job();
            }
        })?;
        tracing::debug!(worker = %name, "call worker started");
        Ok(Self {
            name,
            tx: Some(tx),
            thread: Some(thread),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue `f`; the result is delivered through the returned [`Pending`].
    pub fn submit<T, F>(&self, f: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<T>(1);
        let worker = self.name.clone();
        let job: Job = Box::new(move || match catch_unwind(AssertUnwindSafe(f)) {
            Ok(out) => {
                let _ = tx.send(out);
            }
            Err(_) => tracing::error!(worker = %worker, "job panicked"),
        });
        if let Some(queue) = &self.tx {
            if queue.send(job).is_err() {
                tracing::warn!(worker = %self.name, "worker thread gone; job dropped");
            }
        }
        Pending {
            worker: self.name.clone(),
            rx,
        }
    }

    /// Submit and block for the answer.
    pub fn run<T, F>(&self, f: F) -> Result<T, WorkerError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        self.submit(f).wait()
    }
}

impl Drop for CallWorker {
    /// Closes the queue; jobs already queued still run before the join.
    fn drop(&mut self) {
        self.tx.take();
        if let Some(t) = self.thread.take() {
            let _ = t.join();
        }
    }
}

/// Result of a submitted call, not yet observed.
pub struct Pending<T> {
    worker: String,
    rx: mpsc::Receiver<T>,
}

impl<T> Pending<T> {
    pub fn wait(self) -> Result<T, WorkerError> {
        self.rx
            .recv()
            .map_err(|_| WorkerError::Disconnected(self.worker.clone()))
    }

    pub fn wait_timeout(&self, dur: Duration) -> Result<T, WorkerError> {
        match self.rx.recv_timeout(dur) {
            Ok(v) => Ok(v),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Err(WorkerError::Timeout(self.worker.clone(), dur))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(WorkerError::Disconnected(self.worker.clone()))
            }
        }
    }

    /// Non-blocking poll.
    pub fn try_take(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}
