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

/*! # coord-ops

A pluggable coordinate-operation engine for four dimensional spatiotemporal coordinates
(x, y, z, time). Coordinate operations are declared through a formally describable
operation method (identity, formula, typed parameter schema) and executed through the
[`CoordinateTransform`] capability trait: single tuple transformation with an optional
Jacobian, and bulk transformation over coordinate arrays, in place or into a distinct
buffer.

The flagship operation method is [`TrajectoryToEcef`](ops::method::TrajectoryToEcef):
it loads a precomputed, time ordered trajectory from a moving-feature record and
combines each input tuple with the trajectory sample located at the tuple's time
coordinate. Authority registries, standard map projections and file format parsing are
the business of a larger referencing service, which consumes this crate through the
capability trait only.
*/

/// The boundary with external data stores: the typed feature model, the
/// [`FeatureSource`](io::FeatureSource) resolution trait, and the trajectory record loader.
pub mod io;

/// Coordinate transforms and their operation methods.
pub mod ops;

/// Temporal coordinate reference systems, plus a re-export of the `hifitime` types this crate consumes.
pub mod time;

#[macro_use]
extern crate log;
extern crate nalgebra as na;

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

pub use crate::io::{DataError, Feature, FeatureSource, MemoryStore, TrajectoryRecord};
pub use crate::ops::method::{FactoryError, MethodRegistry, OperationMethod};
pub use crate::ops::{CoordinateTransform, TransformError};
pub use crate::time::TemporalCrs;
