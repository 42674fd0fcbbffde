use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::matrix_fetch::MatrixSource;
use crate::state::{Delta, ProviderCommand};

/// Serves fetch commands on a worker thread until either channel closes.
pub fn spawn_matrix_provider(
    source: Box<dyn MatrixSource + Send>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::FetchMatrix(ticket) => {
                    let outcome = source.fetch(&ticket.scope);
                    if let Err(err) = &outcome {
                        let _ = tx.send(Delta::Log(format!(
                            "[WARN] Matrix fetch error ({:?}): {err}",
                            ticket.scope
                        )));
                    }
                    if tx.send(Delta::MatrixFetched { ticket, outcome }).is_err() {
                        break;
                    }
                }
            }
        }
    })
}
