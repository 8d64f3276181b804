//! Listening countdown
//!
//! Cosmetic counter for the UI. On `Began` it shows the full count and ticks
//! down once per second; `Ended` stops the ticker and clears it to 0. It has
//! no influence on listen outcomes.

use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::ListeningSignal;

/// Countdown Presenter
pub struct CountdownPresenter {
    value: watch::Receiver<u32>,
    task: JoinHandle<()>,
}

impl CountdownPresenter {
    /// Start presenting for a stream of listening signals
    pub fn spawn(signals: broadcast::Receiver<ListeningSignal>, seconds: u32) -> Self {
        let (tx, rx) = watch::channel(0);
        let task = tokio::spawn(run(signals, tx, seconds));
        Self { value: rx, task }
    }

    /// Current counter value; 0 when idle
    pub fn value(&self) -> u32 {
        *self.value.borrow()
    }

    /// Watch the counter
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.value.clone()
    }
}

impl Drop for CountdownPresenter {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut signals: broadcast::Receiver<ListeningSignal>,
    counter: watch::Sender<u32>,
    seconds: u32,
) {
    use broadcast::error::RecvError;

    'idle: loop {
        match signals.recv().await {
            Ok(ListeningSignal::Began) => {}
            Ok(ListeningSignal::Ended) | Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }

        counter.send_replace(seconds);
        let second = Duration::from_secs(1);
        let mut ticker = interval_at(Instant::now() + second, second);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let remaining = *counter.borrow();
            tokio::select! {
                _ = ticker.tick(), if remaining > 0 => {
                    counter.send_replace(remaining - 1);
                }
                signal = signals.recv() => match signal {
                    Ok(ListeningSignal::Ended) => {
                        counter.send_replace(0);
                        continue 'idle;
                    }
                    Ok(ListeningSignal::Began) => {
                        counter.send_replace(seconds);
                        ticker.reset();
                    }
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => {
                        counter.send_replace(0);
                        break 'idle;
                    }
                }
            }
        }
    }
}
