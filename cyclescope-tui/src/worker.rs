//! Background worker thread — all network calls run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Every
//! recompute command carries the scheduler sequence number; the worker
//! echoes it back so the main thread can discard stale responses. The
//! worker never cancels an in-flight call — supersession happens on the
//! response side.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use cyclescope_core::domain::{IndicatorDescriptor, ScorePoint};
use cyclescope_core::service::{ComputeRequest, ComputeService};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    FetchDescriptors,
    Recompute { seq: u64, request: ComputeRequest },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Descriptors(Vec<IndicatorDescriptor>),
    DescriptorsFailed {
        error: String,
    },
    RecomputeDone {
        seq: u64,
        data: Vec<ScorePoint>,
        roc: HashMap<String, f64>,
    },
    RecomputeFailed {
        seq: u64,
        error: String,
    },
}

/// Spawn the background worker thread around a compute service.
pub fn spawn_worker(
    service: Box<dyn ComputeService>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("cyclescope-worker".into())
        .spawn(move || {
            worker_loop(service.as_ref(), rx, tx);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(service: &dyn ComputeService, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::FetchDescriptors) => {
                let response = match service.descriptors() {
                    Ok(descriptors) => WorkerResponse::Descriptors(descriptors),
                    Err(e) => WorkerResponse::DescriptorsFailed {
                        error: e.to_string(),
                    },
                };
                let _ = tx.send(response);
            }
            Ok(WorkerCommand::Recompute { seq, request }) => {
                let response = match service.compute(&request) {
                    Ok(result) => WorkerResponse::RecomputeDone {
                        seq,
                        data: result.data,
                        roc: result.roc,
                    },
                    Err(e) => WorkerResponse::RecomputeFailed {
                        seq,
                        error: e.to_string(),
                    },
                };
                let _ = tx.send(response);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data::SyntheticComputeService;
    use std::sync::mpsc;

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(SyntheticComputeService::new()), cmd_rx, resp_tx);
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn recompute_echoes_sequence_number() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(SyntheticComputeService::new()), cmd_rx, resp_tx);

        let request = ComputeRequest {
            indicators: vec!["mvrv_z".into()],
            indicator_params: Default::default(),
            start_date: None,
            end_date: None,
            roc_days: 30,
            sdca_in: Some(-1.5),
            sdca_out: Some(1.5),
            force_refresh: false,
        };
        cmd_tx
            .send(WorkerCommand::Recompute { seq: 7, request })
            .unwrap();

        match resp_rx.recv().unwrap() {
            WorkerResponse::RecomputeDone { seq, data, .. } => {
                assert_eq!(seq, 7);
                assert!(!data.is_empty());
            }
            other => panic!("expected RecomputeDone, got {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
