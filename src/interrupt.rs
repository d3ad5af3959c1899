//! One cancellation source per run. Every stage of the binary (config, enumeration, parsing,
//! export) races against it, so an interrupt at any point aborts without output.

use tokio::{signal, sync::watch, task};
use tracing::warn;

use crate::{Error, Result};

/// Cheap to clone handle that flips once the run is interrupted.
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

impl Interrupt {
    /// Listens for Ctrl-C on a background task. The first signal aborts the run, a second one
    /// exits the process right away. Must be called inside a tokio runtime.
    pub fn on_ctrl_c() -> Self {
        let (tx, interrupt) = Self::manual();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {e}");
                return;
            }
            warn!("Interrupted, aborting the run");
            let _ = tx.send(true);

            if signal::ctrl_c().await.is_ok() {
                warn!("Interrupted twice, exiting");
                std::process::exit(130);
            }
        });
        interrupt
    }

    /// An interrupt triggered by sending `true`. Dropping the sender never triggers it.
    pub fn manual() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Completes once the interrupt fires, never if its source is gone.
    pub async fn triggered(mut self) {
        let fired = self.rx.wait_for(|interrupted| *interrupted).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }

    /// `Err(Interrupted)` if the run was interrupted already.
    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            return Err(Error::Interrupted);
        }
        Ok(())
    }
}

/// Runs blocking `work` off the runtime, racing it against `interrupt`. An interrupt wins even
/// when both are ready; the blocking work is then left to finish in the background.
pub async fn run_blocking<T, F>(interrupt: &Interrupt, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    interrupt.check()?;
    tokio::select! {
        biased;
        _ = interrupt.clone().triggered() => Err(Error::Interrupted),
        result = task::spawn_blocking(work) => result?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn blocking_work_completes() {
        let (_tx, interrupt) = Interrupt::manual();
        let value = run_blocking(&interrupt, || Ok(21 * 2)).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn blocking_errors_propagate() {
        let (_tx, interrupt) = Interrupt::manual();
        let result: Result<()> = run_blocking(&interrupt, || Err(Error::RuntimeSendError)).await;
        assert!(matches!(result, Err(Error::RuntimeSendError)));
    }

    #[tokio::test]
    async fn triggered_interrupt_skips_work() {
        let (tx, interrupt) = Interrupt::manual();
        tx.send(true).unwrap();
        assert!(interrupt.is_triggered());

        let result = run_blocking(&interrupt, || -> Result<()> {
            panic!("must not run after an interrupt")
        })
        .await;
        assert!(matches!(result, Err(Error::Interrupted)));
    }

    #[tokio::test]
    async fn interrupt_during_work_wins() {
        let (tx, interrupt) = Interrupt::manual();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let pending = tokio::spawn({
            let interrupt = interrupt.clone();
            async move {
                run_blocking(&interrupt, move || {
                    let _ = release_rx.recv();
                    Ok(())
                })
                .await
            }
        });
        tx.send(true).unwrap();

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(Error::Interrupted)));
        let _ = release_tx.send(());
    }

    #[tokio::test]
    async fn dropped_source_never_fires() {
        let (tx, interrupt) = Interrupt::manual();
        drop(tx);
        assert!(!interrupt.is_triggered());
        let waited = tokio::time::timeout(Duration::from_millis(50), interrupt.triggered()).await;
        assert!(waited.is_err());
    }
}
