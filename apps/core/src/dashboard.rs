//! Dashboard view state and the transitions the runtime drives.
//!
//! The state never performs I/O. Runtimes feed it fetch results and user
//! toggles, and it tells them when a history request is needed.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use crate::history::{normalize, HistorySample};
use crate::map::{MarkerView, PopupView};
use crate::registry::Registry;
use crate::risk::{MarkerStyle, RiskDisplay};
use crate::snapshot::{Snapshot, SnapshotMap};
use crate::trend::TrendSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first `/clima/atual` response.
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Collapsed,
    Expanded { fetch_history: bool },
}

#[derive(Debug)]
pub struct DashboardState {
    registry: Registry,
    phase: Phase,
    snapshots: SnapshotMap,
    history: HashMap<String, Vec<HistorySample>>,
    history_in_flight: HashSet<String>,
    expanded: Option<String>,
}

impl DashboardState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            phase: Phase::Loading,
            snapshots: SnapshotMap::new(),
            history: HashMap::new(),
            history_in_flight: HashSet::new(),
            expanded: None,
        }
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub const fn snapshots(&self) -> &SnapshotMap {
        &self.snapshots
    }

    pub fn snapshot(&self, name: &str) -> Option<&Snapshot> {
        self.snapshots.get(name)
    }

    /// Whether `name` renders as a metrics card. Only those have a trend
    /// toggle.
    pub fn has_reading(&self, name: &str) -> bool {
        self.snapshots.get(name).is_some_and(Snapshot::is_available)
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn history(&self, name: &str) -> Option<&[HistorySample]> {
        self.history.get(name).map(Vec::as_slice)
    }

    pub fn is_history_in_flight(&self, name: &str) -> bool {
        self.history_in_flight.contains(name)
    }

    /// Stores a `/clima/atual` completion. The map is replaced wholesale; a
    /// failure clears it so every card falls back to its skeleton.
    ///
    /// Returns `true` for the completion that ended the loading phase.
    pub fn apply_snapshots<E: Display>(&mut self, result: Result<SnapshotMap, E>) -> bool {
        self.snapshots = match result {
            Ok(snapshots) => {
                tracing::debug!(count = snapshots.len(), "snapshots refreshed");
                snapshots
            }
            Err(error) => {
                tracing::warn!(%error, "snapshot fetch failed; clearing current conditions");
                SnapshotMap::new()
            }
        };

        let first = self.is_loading();
        self.phase = Phase::Ready;
        first
    }

    /// Opens `name`'s trend panel, or closes it if it is already open.
    ///
    /// Only one panel is open at a time. Cached history of a panel that
    /// closes is kept. History is requested on the first expand, and again
    /// only after a failed or invalidated fetch.
    pub fn toggle(&mut self, name: &str) -> ToggleOutcome {
        if self.expanded.as_deref() == Some(name) {
            self.expanded = None;
            return ToggleOutcome::Collapsed;
        }

        self.expanded = Some(name.to_string());

        let fetch_history =
            !self.history.contains_key(name) && self.history_in_flight.insert(name.to_string());
        ToggleOutcome::Expanded { fetch_history }
    }

    /// Stores a `/clima/historico/{name}` completion.
    pub fn apply_history<E: Display>(&mut self, name: &str, result: Result<Vec<Value>, E>) {
        self.history_in_flight.remove(name);

        match result {
            Ok(records) => {
                let samples = normalize(&records);
                tracing::debug!(
                    neighborhood = name,
                    received = records.len(),
                    kept = samples.len(),
                    "history cached"
                );
                self.history.insert(name.to_string(), samples);
            }
            Err(error) => {
                tracing::warn!(neighborhood = name, %error, "history fetch failed");
            }
        }
    }

    /// Drops cached history so the next expand fetches it again.
    pub fn invalidate_history(&mut self, name: &str) -> bool {
        self.history.remove(name).is_some()
    }

    /// One card per registered neighborhood, in registry order.
    pub fn cards(&self) -> Vec<CardView> {
        self.registry
            .names()
            .map(|name| match self.snapshots.get(name) {
                Some(snapshot) if snapshot.is_available() => {
                    CardView::Metrics(Box::new(self.metrics_card(name, snapshot)))
                }
                _ => CardView::Skeleton { name },
            })
            .collect()
    }

    fn metrics_card(&self, name: &'static str, snapshot: &Snapshot) -> MetricsCard {
        let expanded = self.expanded.as_deref() == Some(name);
        let trend = if !expanded {
            TrendPanel::Hidden
        } else if let Some(series) = self.history(name).and_then(TrendSeries::from_samples) {
            TrendPanel::Chart(series)
        } else if self.is_history_in_flight(name) {
            TrendPanel::Loading
        } else {
            TrendPanel::Empty
        };

        MetricsCard {
            name,
            risk: snapshot.risk(),
            updated_at: snapshot.recorded_at(),
            metrics: Metric::all_for(snapshot),
            expanded,
            trend,
        }
    }

    /// One marker per registered neighborhood. `selected` highlights the
    /// marker of that neighborhood.
    pub fn markers(&self, selected: Option<&str>) -> Vec<MarkerView> {
        self.registry
            .entries()
            .iter()
            .map(|entry| {
                let snapshot = self.snapshots.get(entry.name);
                let style = match snapshot {
                    Some(snapshot) if snapshot.is_available() && snapshot.nivel_risco.is_some() => {
                        snapshot.risk().tier.marker_style()
                    }
                    _ => MarkerStyle::no_data(),
                };
                MarkerView {
                    name: entry.name,
                    position: snapshot
                        .and_then(Snapshot::position)
                        .unwrap_or(entry.coordinate),
                    style,
                    selected: selected == Some(entry.name),
                }
            })
            .collect()
    }

    pub fn popup(&self, name: &str) -> PopupView {
        match self.snapshots.get(name) {
            Some(snapshot) if snapshot.is_available() => PopupView {
                name: name.to_string(),
                risk: Some(snapshot.risk()),
                rainfall: Some(format!("{:.1} mm", snapshot.chuva_mm.unwrap_or(0.0))),
            },
            _ => PopupView {
                name: name.to_string(),
                risk: None,
                rainfall: None,
            },
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardView {
    /// No reading, or the service flagged the entry.
    Skeleton { name: &'static str },
    Metrics(Box<MetricsCard>),
}

impl CardView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Skeleton { name } => *name,
            Self::Metrics(card) => card.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsCard {
    pub name: &'static str,
    pub risk: RiskDisplay,
    pub updated_at: Option<String>,
    pub metrics: [Metric; 5],
    pub expanded: bool,
    pub trend: TrendPanel,
}

impl MetricsCard {
    pub const fn toggle_label(&self) -> &'static str {
        if self.expanded {
            "Ocultar Gráfico"
        } else {
            "Ver Tendência"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendPanel {
    Hidden,
    Loading,
    Empty,
    Chart(TrendSeries),
}

impl TrendPanel {
    pub const fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some("Carregando histórico..."),
            Self::Empty => Some("Aguardando dados..."),
            Self::Hidden | Self::Chart(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub unit: &'static str,
}

impl Metric {
    fn all_for(snapshot: &Snapshot) -> [Self; 5] {
        [
            Self::required("Chuva (1h)", snapshot.chuva_mm, 1, "mm"),
            Self::required("Intensidade", snapshot.precipitacao, 1, "mm/h"),
            Self::required("Vento", snapshot.vento_velocidade, 0, "km/h"),
            Self::accumulated("Acum. 6h", snapshot.chuva_acum_6h_ant),
            Self::accumulated("Prev. 3h", snapshot.chuva_acum_3h_prox),
        ]
    }

    fn required(label: &'static str, value: Option<f64>, decimals: usize, unit: &'static str) -> Self {
        Self {
            label,
            value: value.map_or_else(|| "--".to_string(), |value| format!("{value:.decimals$}")),
            unit,
        }
    }

    fn accumulated(label: &'static str, value: Option<f64>) -> Self {
        Self {
            label,
            value: format!("{:.1}", value.unwrap_or(0.0)),
            unit: "mm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{RiskTier, SLATE};
    use crate::snapshot::parse_snapshots;
    use serde_json::json;

    fn sample_snapshots() -> SnapshotMap {
        parse_snapshots(json!({
            "Acari": {"nivel_risco": "alto", "chuva_mm": 18.44, "precipitacao": 18.4,
                      "vento_velocidade": 21.6, "horario_registro": "2024-02-10T15:40:00"},
            "Botafogo": {"erro": "Sem dados climáticos", "lat": -22.95, "lon": -43.18},
            "Bonsucesso": {"nivel_risco": "medio", "chuva_mm": 6.0, "lat": -22.86, "lon": -43.25}
        }))
        .unwrap()
        .snapshots
    }

    fn history_payload() -> Vec<Value> {
        vec![
            json!({"horario": "15:00", "chuva": 2.0}),
            json!({"horario": "15:15", "chuva": 6.5}),
        ]
    }

    #[test]
    fn loading_ends_exactly_once_even_on_failure() {
        let mut state = DashboardState::default();
        assert!(state.is_loading());

        assert!(state.apply_snapshots::<&str>(Err("connection refused")));
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.snapshots().is_empty());

        assert!(!state.apply_snapshots::<&str>(Ok(sample_snapshots())));
        assert!(!state.apply_snapshots::<&str>(Err("timeout")));
        assert!(!state.is_loading());
    }

    #[test]
    fn failed_refresh_clears_stale_conditions() {
        let mut state = DashboardState::default();
        state.apply_snapshots::<&str>(Ok(sample_snapshots()));
        assert_eq!(state.snapshots().len(), 3);

        state.apply_snapshots::<&str>(Err("502"));
        assert!(state.cards().iter().all(|card| matches!(card, CardView::Skeleton { .. })));
    }

    #[test]
    fn toggling_twice_collapses_without_refetch() {
        let mut state = DashboardState::default();
        assert_eq!(
            state.toggle("Acari"),
            ToggleOutcome::Expanded { fetch_history: true }
        );
        state.apply_history::<&str>("Acari", Ok(history_payload()));

        assert_eq!(state.toggle("Acari"), ToggleOutcome::Collapsed);
        assert_eq!(state.expanded(), None);

        assert_eq!(
            state.toggle("Acari"),
            ToggleOutcome::Expanded { fetch_history: false }
        );
    }

    #[test]
    fn collapse_before_response_does_not_double_fetch() {
        let mut state = DashboardState::default();
        assert_eq!(
            state.toggle("Acari"),
            ToggleOutcome::Expanded { fetch_history: true }
        );
        assert_eq!(state.toggle("Acari"), ToggleOutcome::Collapsed);
        assert_eq!(
            state.toggle("Acari"),
            ToggleOutcome::Expanded { fetch_history: false }
        );
        assert!(state.is_history_in_flight("Acari"));
    }

    #[test]
    fn expanding_another_keeps_previous_history() {
        let mut state = DashboardState::default();
        state.toggle("Acari");
        state.apply_history::<&str>("Acari", Ok(history_payload()));

        assert_eq!(
            state.toggle("Botafogo"),
            ToggleOutcome::Expanded { fetch_history: true }
        );
        assert_eq!(state.expanded(), Some("Botafogo"));
        assert_eq!(state.history("Acari").map(<[_]>::len), Some(2));
    }

    #[test]
    fn failed_history_is_retried_on_next_expand() {
        let mut state = DashboardState::default();
        state.toggle("Guadalupe");
        state.apply_history::<&str>("Guadalupe", Err("503"));
        assert!(state.history("Guadalupe").is_none());

        state.toggle("Guadalupe");
        assert_eq!(
            state.toggle("Guadalupe"),
            ToggleOutcome::Expanded { fetch_history: true }
        );
    }

    #[test]
    fn invalidation_forces_a_new_fetch() {
        let mut state = DashboardState::default();
        state.toggle("Acari");
        state.apply_history::<&str>("Acari", Ok(history_payload()));
        state.toggle("Acari");

        assert!(state.invalidate_history("Acari"));
        assert_eq!(
            state.toggle("Acari"),
            ToggleOutcome::Expanded { fetch_history: true }
        );
    }

    #[test]
    fn every_registry_neighborhood_gets_a_card_and_marker() {
        let mut state = DashboardState::default();
        state.apply_snapshots::<&str>(Ok(sample_snapshots()));

        let cards = state.cards();
        let names: Vec<_> = cards.iter().map(CardView::name).collect();
        assert_eq!(
            names,
            ["Acari", "Campo Grande", "Bonsucesso", "Botafogo", "Guadalupe"]
        );
        assert!(matches!(cards[1], CardView::Skeleton { name: "Campo Grande" }));
        assert!(matches!(cards[3], CardView::Skeleton { name: "Botafogo" }));

        let markers = state.markers(None);
        assert_eq!(markers.len(), 5);
        let campo_grande = &markers[1];
        assert_eq!(campo_grande.style, MarkerStyle::no_data());
        assert_eq!(campo_grande.style.color, SLATE);
        assert_eq!(campo_grande.position, state.registry().entries()[1].coordinate);
        assert!(markers[0].style.pulse);
        assert!((markers[2].position.lat - -22.86).abs() < 1e-9);

        let botafogo = &markers[3];
        assert_eq!(botafogo.style, MarkerStyle::no_data());
        assert!((botafogo.position.lat - -22.95).abs() < 1e-9);

        state.apply_snapshots::<&str>(Ok(parse_snapshots(json!({
            "Guadalupe": {"chuva_mm": 0.4}
        }))
        .unwrap()
        .snapshots));
        let guadalupe = &state.markers(None)[4];
        assert_eq!(guadalupe.style.color, SLATE);
        assert!(matches!(state.cards()[4], CardView::Metrics(_)));
    }

    #[test]
    fn metrics_are_formatted_with_fixed_decimals() {
        let mut state = DashboardState::default();
        state.apply_snapshots::<&str>(Ok(sample_snapshots()));

        let CardView::Metrics(card) = &state.cards()[0] else {
            panic!("Acari should have metrics");
        };
        assert_eq!(card.risk.tier, RiskTier::High);
        assert_eq!(card.updated_at.as_deref(), Some("15:40"));
        let values: Vec<_> = card.metrics.iter().map(|metric| metric.value.as_str()).collect();
        assert_eq!(values, ["18.4", "18.4", "22", "0.0", "0.0"]);
        assert_eq!(card.toggle_label(), "Ver Tendência");

        let CardView::Metrics(bonsucesso) = &state.cards()[2] else {
            panic!("Bonsucesso should have metrics");
        };
        assert_eq!(bonsucesso.metrics[1].value, "--");
    }

    #[test]
    fn trend_panel_follows_fetch_progress() {
        let mut state = DashboardState::default();
        state.apply_snapshots::<&str>(Ok(sample_snapshots()));
        state.toggle("Acari");

        let trend_of = |state: &DashboardState| match &state.cards()[0] {
            CardView::Metrics(card) => card.trend.clone(),
            CardView::Skeleton { .. } => panic!("expected metrics"),
        };

        assert_eq!(trend_of(&state), TrendPanel::Loading);
        state.apply_history::<&str>("Acari", Ok(Vec::new()));
        assert_eq!(trend_of(&state), TrendPanel::Empty);

        state.invalidate_history("Acari");
        state.toggle("Acari");
        state.toggle("Acari");
        state.apply_history::<&str>("Acari", Ok(history_payload()));
        assert!(matches!(trend_of(&state), TrendPanel::Chart(series) if series.len() == 2));
    }

    #[test]
    fn popup_reports_no_signal_for_flagged_or_missing() {
        let mut state = DashboardState::default();
        state.apply_snapshots::<&str>(Ok(sample_snapshots()));

        let acari = state.popup("Acari");
        assert_eq!(acari.rainfall.as_deref(), Some("18.4 mm"));
        assert_eq!(acari.risk.map(|risk| risk.label), Some("RISCO ALTO"));

        assert_eq!(state.popup("Botafogo").rainfall, None);
        assert_eq!(state.popup("Campo Grande").risk, None);
    }
}
