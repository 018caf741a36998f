use crate::api::WeatherSource;
use crate::event::AppEvent;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Issues fetches on behalf of the event loop. Every request runs on its own
/// task and reports back through the event channel; nothing here waits.
#[derive(Clone)]
pub struct AppActions {
    source: Arc<dyn WeatherSource>,
    events: UnboundedSender<AppEvent>,
}

impl AppActions {
    pub fn new(source: Arc<dyn WeatherSource>, events: UnboundedSender<AppEvent>) -> Self {
        Self { source, events }
    }

    pub fn source(&self) -> Arc<dyn WeatherSource> {
        Arc::clone(&self.source)
    }

    pub fn events(&self) -> UnboundedSender<AppEvent> {
        self.events.clone()
    }

    pub fn refresh_snapshots(&self) {
        let source = self.source();
        let events = self.events();
        tokio::spawn(async move {
            let result = source.current().await;
            // A closed channel means the dashboard is gone; drop the response.
            let _ = events.send(AppEvent::Snapshots(result));
        });
    }

    pub fn fetch_history(&self, neighborhood: &str) {
        let source = self.source();
        let events = self.events();
        let neighborhood = neighborhood.to_string();
        tokio::spawn(async move {
            tracing::debug!(%neighborhood, "fetching history");
            let result = source.history(&neighborhood).await;
            let _ = events.send(AppEvent::History {
                neighborhood,
                result,
            });
        });
    }
}

impl std::fmt::Debug for AppActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppActions").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeSource;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn history_result_comes_back_through_the_channel() {
        let source = Arc::new(FakeSource::default());
        *source.history.lock().unwrap() = vec![json!({"horario": "10:00", "chuva": 2.5})];
        let (tx, mut rx) = mpsc::unbounded_channel();
        let actions = AppActions::new(source.clone(), tx);

        actions.fetch_history("Botafogo");

        match rx.recv().await {
            Some(AppEvent::History {
                neighborhood,
                result,
            }) => {
                assert_eq!(neighborhood, "Botafogo");
                assert_eq!(result.unwrap().len(), 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(source.history_calls(), vec!["Botafogo".to_string()]);
    }

    #[tokio::test]
    async fn responses_after_shutdown_are_dropped() {
        let source = Arc::new(FakeSource::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let actions = AppActions::new(source.clone(), tx);
        drop(rx);

        actions.refresh_snapshots();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(source.current_calls(), 1);
    }
}
