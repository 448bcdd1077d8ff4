use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

/// Paces the simulation: one `StepTick` per interval. Whether a tick actually
/// resolves a game is up to the app (paused, idle or finished runs ignore it).
pub struct StepTicker {
    ui_events: mpsc::Sender<UiEvent>,
    period: Duration,
}

impl StepTicker {
    pub fn new(ui_events: mpsc::Sender<UiEvent>, period: Duration) -> Self {
        Self { ui_events, period }
    }

    pub async fn run(self) {
        let mut steps = interval(self.period);
        steps.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the immediate first tick.
        steps.tick().await;

        loop {
            steps.tick().await;
            if self.ui_events.send(UiEvent::StepTick).await.is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_step_ticks_until_receiver_drops() {
        let (tx, mut rx) = mpsc::channel(4);
        let task = tokio::spawn(StepTicker::new(tx, Duration::from_millis(250)).run());

        for _ in 0..3 {
            assert!(matches!(rx.recv().await, Some(UiEvent::StepTick)));
        }
        drop(rx);
        tokio::time::advance(Duration::from_secs(1)).await;
        task.await.unwrap();
    }
}
