use chuva_alerta_core::risk::PULSE_PERIOD_SECS;

// Frames further apart than this (background tab, debugger) do not jump the pulse
const MAX_FRAME_DELTA: f64 = 0.25;

/// Advances the pulse clock to `now_seconds`.
///
/// Returns the new clock and the tick to pass back on the next frame. The
/// clock wraps every `PULSE_PERIOD_SECS` so it never loses precision.
pub fn advance_clock(clock: f64, last_tick: Option<f64>, now_seconds: f64) -> (f64, Option<f64>) {
    let delta = last_tick
        .map(|last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA))
        .unwrap_or(0.0);

    ((clock + delta).rem_euclid(PULSE_PERIOD_SECS), Some(now_seconds))
}
