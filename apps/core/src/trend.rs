//! Chart-ready form of a neighborhood's rainfall history.

use crate::history::HistorySample;

/// Number of shading bands under the curve, from the base up.
pub const FILL_BANDS: usize = 3;

/// Y axis never collapses below this, so an all-dry series still has room.
const MIN_Y_MAX: f64 = 1.0;
const HEADROOM: f64 = 1.1;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    labels: Vec<String>,
    points: Vec<(f64, f64)>,
    y_max: f64,
}

impl TrendSeries {
    /// `None` for an empty history: that case renders a placeholder, not a
    /// degenerate chart.
    pub fn from_samples(samples: &[HistorySample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let points = samples
            .iter()
            .enumerate()
            .map(|(index, sample)| (index_f64(index), sample.rainfall_mm.max(0.0)))
            .collect::<Vec<_>>();

        let peak = points.iter().map(|(_, y)| *y).fold(0.0, f64::max);

        Some(Self {
            labels: samples.iter().map(|sample| sample.time.clone()).collect(),
            points,
            y_max: (peak * HEADROOM).max(MIN_Y_MAX),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, index_f64(self.len().saturating_sub(1)).max(1.0)]
    }

    pub const fn y_bounds(&self) -> [f64; 2] {
        [0.0, self.y_max]
    }

    /// First, middle and last time labels; the rest would not fit.
    pub fn axis_labels(&self) -> Vec<&str> {
        let last = self.labels.len() - 1;
        let mut picks = vec![0, last / 2, last];
        picks.dedup();
        picks.into_iter().map(|index| self.labels[index].as_str()).collect()
    }

    /// Tooltip text for the sample under the cursor, clamped to the series.
    pub fn tooltip(&self, cursor: usize) -> String {
        let index = self.clamp_cursor(cursor);
        let (_, value) = self.points[index];
        format!("{} • {value} mm", self.labels[index])
    }

    pub fn clamp_cursor(&self, cursor: usize) -> usize {
        cursor.min(self.len() - 1)
    }

    /// Rainfall at fractional position `x`, linearly interpolated.
    pub fn value_at(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, index_f64(self.len() - 1));
        let left = x.floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let left_index = left as usize;
        let (_, left_value) = self.points[left_index];
        self.points
            .get(left_index + 1)
            .map_or(left_value, |(_, right_value)| {
                (right_value - left_value).mul_add(x - left, left_value)
            })
    }

    /// Points filling the area under the curve, grouped by height band so
    /// the renderer can shade the top band brightest.
    ///
    /// `columns` is the horizontal resolution across the whole series and
    /// `rows` the vertical resolution of the full y range.
    pub fn area_fill(&self, columns: usize, rows: usize) -> [Vec<(f64, f64)>; FILL_BANDS] {
        let mut bands: [Vec<(f64, f64)>; FILL_BANDS] = Default::default();
        if columns == 0 || rows == 0 {
            return bands;
        }

        let [x_min, x_max] = self.x_bounds();
        let step_y = self.y_max / index_f64(rows);
        for column in 0..=columns {
            let x = (x_max - x_min).mul_add(index_f64(column) / index_f64(columns), x_min);
            let top = self.value_at(x);
            if top <= 0.0 {
                continue;
            }
            let mut row = 0;
            loop {
                let y = step_y * index_f64(row);
                if y > top {
                    break;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let band = (((y / top) * index_f64(FILL_BANDS)) as usize).min(FILL_BANDS - 1);
                bands[band].push((x, y));
                row += 1;
            }
        }
        bands
    }
}

#[allow(clippy::cast_precision_loss)]
fn index_f64(index: usize) -> f64 {
    index as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: &str, rainfall_mm: f64) -> HistorySample {
        HistorySample {
            time: time.to_string(),
            rainfall_mm,
            risk: None,
        }
    }

    #[test]
    fn empty_history_has_no_series() {
        assert!(TrendSeries::from_samples(&[]).is_none());
    }

    #[test]
    fn y_axis_scales_to_peak_with_floor() {
        let wet = TrendSeries::from_samples(&[sample("10:00", 2.0), sample("10:15", 10.0)]).unwrap();
        assert!((wet.y_bounds()[1] - 11.0).abs() < 1e-9);

        let dry = TrendSeries::from_samples(&[sample("10:00", 0.0), sample("10:15", 0.0)]).unwrap();
        assert!((dry.y_bounds()[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_sample_has_a_usable_x_range() {
        let series = TrendSeries::from_samples(&[sample("07:00", 4.0)]).unwrap();
        assert_eq!(series.x_bounds(), [0.0, 1.0]);
        assert_eq!(series.axis_labels(), ["07:00"]);
        assert_eq!(series.tooltip(9), "07:00 • 4 mm");
    }

    #[test]
    fn labels_keep_start_and_end() {
        let samples: Vec<_> = (0..7).map(|i| sample(&format!("1{i}:00"), 1.0)).collect();
        let series = TrendSeries::from_samples(&samples).unwrap();
        assert_eq!(series.axis_labels(), ["10:00", "13:00", "16:00"]);
    }

    #[test]
    fn tooltip_shows_exact_value_in_mm() {
        let series = TrendSeries::from_samples(&[sample("10:00", 0.25), sample("10:15", 3.5)]).unwrap();
        assert_eq!(series.tooltip(1), "10:15 • 3.5 mm");
    }

    #[test]
    fn interpolation_follows_segments() {
        let series = TrendSeries::from_samples(&[sample("a", 0.0), sample("b", 4.0)]).unwrap();
        assert!((series.value_at(0.5) - 2.0).abs() < 1e-9);
        assert!((series.value_at(7.0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn fill_stays_under_the_curve() {
        let series = TrendSeries::from_samples(&[sample("a", 1.0), sample("b", 5.0), sample("c", 0.0)]).unwrap();
        let bands = series.area_fill(20, 10);
        assert!(bands.iter().all(|band| !band.is_empty()));
        for (x, y) in bands.iter().flatten() {
            assert!(*y <= series.value_at(*x) + 1e-9);
        }
        assert!(series.area_fill(0, 10).iter().all(Vec::is_empty));
    }
}
