//! The fixed station catalog.
//!
//! Each [`Station`] binds a display name, a playback URL, a metadata URL and
//! the wire format its metadata endpoint speaks. The [`Catalog`] is the ordered
//! list the player cycles through.

mod station;

pub use station::Station;

/// Ordered, read-only list of stations, indexed by position.
#[derive(Debug, Clone)]
pub struct Catalog {
    stations: Vec<Station>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            stations: Station::ALL.to_vec(),
        }
    }
}

impl Catalog {
    /// Build a catalog from an explicit list; `None` when the list is empty.
    pub fn new(stations: Vec<Station>) -> Option<Self> {
        if stations.is_empty() {
            None
        } else {
            Some(Self { stations })
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station at `index`, wrapping around the end of the list.
    pub fn station(&self, index: usize) -> Station {
        self.stations[index % self.len()]
    }

    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    pub fn previous(&self, index: usize) -> usize {
        let len = self.len();
        (index % len + len - 1) % len
    }

    pub fn position(&self, station: Station) -> Option<usize> {
        self.stations.iter().position(|s| *s == station)
    }

    pub fn iter(&self) -> impl Iterator<Item = Station> + '_ {
        self.stations.iter().copied()
    }
}
