//! Neighborhoods the dashboard knows about, in display order, with their
//! fixed map coordinates.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

pub const NEIGHBORHOODS: [Neighborhood; 5] = [
    Neighborhood {
        name: "Acari",
        coordinate: Coordinate::new(-22.8225, -43.3417),
    },
    Neighborhood {
        name: "Campo Grande",
        coordinate: Coordinate::new(-22.9035, -43.5617),
    },
    Neighborhood {
        name: "Bonsucesso",
        coordinate: Coordinate::new(-22.8671, -43.2555),
    },
    Neighborhood {
        name: "Botafogo",
        coordinate: Coordinate::new(-22.9511, -43.1844),
    },
    Neighborhood {
        name: "Guadalupe",
        coordinate: Coordinate::new(-22.8411, -43.3729),
    },
];

/// Rough middle of the registered neighborhoods.
pub const MAP_CENTER: Coordinate = Coordinate::new(-22.88, -43.30);
pub const MAP_ZOOM: u8 = 11;

pub const TILE_URL_TEMPLATE: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// The neighborhood list a dashboard renders. Defaults to the compiled-in
/// table; tests and alternative deployments hand in their own.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    entries: &'static [Neighborhood],
}

impl Registry {
    pub const fn new(entries: &'static [Neighborhood]) -> Self {
        Self { entries }
    }

    pub const fn entries(&self) -> &'static [Neighborhood] {
        self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|entry| entry.name)
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static Neighborhood> {
        self.entries.get(index)
    }

    /// Fixed coordinate of a registered neighborhood. Exact name match only.
    pub fn coordinate_of(&self, name: &str) -> Option<Coordinate> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.coordinate)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(&NEIGHBORHOODS)
    }
}
