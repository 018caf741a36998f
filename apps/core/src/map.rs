//! Map projection and marker derivation.

use crate::registry::{Coordinate, MAP_CENTER, MAP_ZOOM};
use crate::risk::{MarkerStyle, RiskDisplay};

const TILE_SIZE_PX: f64 = 256.0;

/// Geographic rectangle shown by the map panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub lat: [f64; 2],
    pub lon: [f64; 2],
}

impl Viewport {
    /// Span covered by a `width_px`×`height_px` slippy map centered on
    /// `center` at `zoom`.
    pub fn around(center: Coordinate, zoom: u8, width_px: f64, height_px: f64) -> Self {
        let degrees_per_px = 360.0 / (TILE_SIZE_PX * 2_f64.powi(i32::from(zoom)));
        let lon_span = degrees_per_px * width_px;
        let lat_span = degrees_per_px * height_px * center.lat.to_radians().cos();

        Self {
            lat: [center.lat - lat_span / 2.0, center.lat + lat_span / 2.0],
            lon: [center.lon - lon_span / 2.0, center.lon + lon_span / 2.0],
        }
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.lat[0]..=self.lat[1]).contains(&point.lat)
            && (self.lon[0]..=self.lon[1]).contains(&point.lon)
    }

    /// Shorter side in degrees, used to size markers.
    pub fn short_side(&self) -> f64 {
        (self.lat[1] - self.lat[0]).min(self.lon[1] - self.lon[0])
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::around(MAP_CENTER, MAP_ZOOM, 1024.0, 400.0)
    }
}

/// Maps coordinates into a character grid: one unit per column and two per
/// row, so circles stay round on typical terminal fonts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    viewport: Viewport,
    width: f64,
    height: f64,
}

impl Projection {
    pub fn new(viewport: Viewport, columns: u16, rows: u16) -> Self {
        Self {
            viewport,
            width: f64::from(columns),
            height: f64::from(rows) * 2.0,
        }
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub const fn width(&self) -> f64 {
        self.width
    }

    pub const fn height(&self) -> f64 {
        self.height
    }

    pub fn x(&self, lon: f64) -> f64 {
        let [west, east] = self.viewport.lon;
        (lon - west) / (east - west) * self.width
    }

    pub fn y(&self, lat: f64) -> f64 {
        let [south, north] = self.viewport.lat;
        (lat - south) / (north - south) * self.height
    }

    pub fn point(&self, coordinate: Coordinate) -> (f64, f64) {
        (self.x(coordinate.lon), self.y(coordinate.lat))
    }

    /// Marker radius for a scale factor relative to the shorter side.
    pub fn radius(&self, scale: f64) -> f64 {
        (scale * self.width.min(self.height) * 2.0).max(0.6)
    }
}

/// One marker on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub name: &'static str,
    pub position: Coordinate,
    pub style: MarkerStyle,
    pub selected: bool,
}

/// Contents of the popup opened from a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub name: String,
    pub risk: Option<RiskDisplay>,
    /// `Some("3.2 mm")` for a live reading, `None` for "no signal".
    pub rainfall: Option<String>,
}

pub const NO_SIGNAL: &str = "Sem sinal";
