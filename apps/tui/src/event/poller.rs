use crate::app::AppActions;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Owns the recurring `/clima/atual` poll. The first tick fires at once, so
/// arming the guard also issues the initial fetch. Dropping the guard stops
/// the timer; requests already in flight are left to finish.
#[derive(Debug)]
pub struct PollGuard {
    handle: JoinHandle<()>,
}

impl PollGuard {
    pub fn spawn(actions: AppActions, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tracing::debug!("poll tick");
                actions.refresh_snapshots();
            }
        });

        Self { handle }
    }
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_period_until_dropped() {
        let source = Arc::new(FakeSource::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let actions = AppActions::new(source.clone(), tx);

        let guard = PollGuard::spawn(actions, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(source.current_calls(), 3);

        drop(guard);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(source.current_calls(), 3);

        let mut delivered = 0;
        while rx.try_recv().is_ok() {
            delivered += 1;
        }
        assert_eq!(delivered, 3);
    }
}
