/*
    coord-ops, a spatiotemporal coordinate-operation engine
    Copyright (C) 2023 Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::fmt;

pub use hifitime::{Duration, Epoch, Unit};

/// A temporal coordinate reference system: an origin epoch and a day-based scale.
///
/// Coordinate operations in this crate measure the fourth (temporal) axis as fractional
/// days elapsed since the origin of a `TemporalCrs`. The reference system is threaded
/// explicitly into whatever loads timestamped data, so there is no process-wide default
/// time scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemporalCrs {
    origin: Epoch,
}

impl TemporalCrs {
    /// Builds a temporal CRS counting fractional days since the provided origin.
    pub fn new(origin: Epoch) -> Self {
        Self { origin }
    }

    /// The Truncated Julian time scale (origin 1968-05-24T00:00:00 UTC), used by the
    /// OGC moving-feature datasets this crate was designed around.
    pub fn truncated_julian() -> Self {
        Self::new(Epoch::from_gregorian_utc_at_midnight(1968, 5, 24))
    }

    pub fn origin(&self) -> Epoch {
        self.origin
    }

    /// Converts an epoch into a coordinate value on this time scale.
    pub fn to_value(&self, epoch: Epoch) -> f64 {
        (epoch - self.origin).to_unit(Unit::Day)
    }

    /// Converts a coordinate value on this time scale back into an epoch.
    pub fn to_epoch(&self, value: f64) -> Epoch {
        self.origin + value * Unit::Day
    }
}

impl fmt::Display for TemporalCrs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "days since {}", self.origin)
    }
}
