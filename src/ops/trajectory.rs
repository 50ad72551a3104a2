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

use super::{
    check_buffer, CoordinateTransform, DerivativeUnavailableSnafu, TimeOutOfRangeSnafu,
    TransformError,
};
use crate::io::TrajectoryRecord;
use crate::linalg::{DMatrix, Vector3};
use snafu::prelude::*;
use std::fmt;

/// Number of spatial dimensions of a trajectory sample.
const TRAJECTORY_DIMENSION: usize = 3;

/// Number of values per coordinate tuple: three spatial axes plus time. The trajectory
/// operation is defined for this dimensionality only.
pub const TUPLE_DIMENSION: usize = 4;

/// An immutable, time ordered set of trajectory samples with their yaw, pitch and roll
/// attributes.
///
/// The table is built exactly once, from an already validated [`TrajectoryRecord`], and
/// lives as long as the transform bound to it. Sample times are assumed sorted in
/// ascending order (the record loader documents the same assumption).
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryTable {
    times: Vec<f64>,
    positions: Vec<f64>,
    yaw: Vec<f64>,
    pitch: Vec<f64>,
    roll: Vec<f64>,
}

impl TrajectoryTable {
    pub fn from_record(record: TrajectoryRecord) -> Self {
        Self {
            times: record.times,
            positions: record.positions,
            yaw: record.yaw,
            pitch: record.pitch,
            roll: record.roll,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.times.len()
    }

    /// Start time of each sample, in days on the time scale of the loading record.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The sample position at the provided index.
    pub fn position(&self, index: usize) -> Vector3<f64> {
        let i = index * TRAJECTORY_DIMENSION;
        Vector3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    /// First and last sample times, i.e. the time span this table can answer for.
    pub fn span(&self) -> (f64, f64) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    pub fn yaw(&self) -> &[f64] {
        &self.yaw
    }

    pub fn pitch(&self) -> &[f64] {
        &self.pitch
    }

    pub fn roll(&self) -> &[f64] {
        &self.roll
    }

    /// Locates the reference sample for the query time `t`.
    ///
    /// An exact match selects that sample directly. Otherwise the insertion point of
    /// the binary search is used, provided it falls strictly inside the table: the
    /// sample immediately *following* `t` is selected as-is, without interpolating
    /// between the two bracketing samples. A production-grade operation would
    /// interpolate here; this simplified core pins the non-interpolated behavior.
    pub fn locate(&self, t: f64) -> Result<usize, TransformError> {
        match self.times.binary_search_by(|probe| probe.total_cmp(&t)) {
            Ok(index) => Ok(index),
            Err(insertion) => {
                ensure!(
                    insertion > 0 && insertion < self.times.len(),
                    TimeOutOfRangeSnafu {
                        t,
                        start: self.times[0],
                        end: self.times[self.times.len() - 1],
                    }
                );
                Ok(insertion)
            }
        }
    }
}

/// The "Trajectory to ECEF" point transform core.
///
/// Each (x, y, z, t) tuple is normalized to unit length, then offset by the trajectory
/// sample located at time `t`; the time coordinate passes through unchanged. The
/// normalization plus offset is a stand-in correction for demonstration purposes, but
/// the table lookup, edge handling and bulk semantics are the real thing.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryTransform {
    table: TrajectoryTable,
}

impl TrajectoryTransform {
    pub fn new(table: TrajectoryTable) -> Self {
        Self { table }
    }

    pub fn from_record(record: TrajectoryRecord) -> Self {
        Self::new(TrajectoryTable::from_record(record))
    }

    pub fn table(&self) -> &TrajectoryTable {
        &self.table
    }
}

impl CoordinateTransform for TrajectoryTransform {
    fn source_dimensions(&self) -> usize {
        TUPLE_DIMENSION
    }

    fn target_dimensions(&self) -> usize {
        TUPLE_DIMENSION
    }

    /// Transforms one (x, y, z, t) tuple. Time is measured in days on the time scale of
    /// the table for both input and output coordinates.
    fn transform_tuple(
        &self,
        src: &[f64],
        dst: Option<&mut [f64]>,
        derivate: bool,
    ) -> Result<Option<DMatrix<f64>>, TransformError> {
        // Fail before any write: callers needing a Jacobian must be told that this
        // operation cannot provide one.
        ensure!(
            !derivate,
            DerivativeUnavailableSnafu {
                method: "Trajectory to ECEF".to_string(),
            }
        );
        check_buffer("source", src.len(), 0, 1, TUPLE_DIMENSION)?;

        if let Some(dst) = dst {
            check_buffer("destination", dst.len(), 0, 1, TUPLE_DIMENSION)?;
            let mut x = src[0];
            let mut y = src[1];
            let mut z = src[2];
            let t = src[3];
            // No guard against a null position vector: r == 0 propagates IEEE
            // infinities/NaN, matching the reference behavior of this operation.
            let r = (x * x + y * y + z * z).sqrt();
            x /= r;
            y /= r;
            z /= r;
            let sample = self.table.position(self.table.locate(t)?);
            dst[0] = x + sample.x;
            dst[1] = y + sample.y;
            dst[2] = z + sample.z;
            dst[3] = t;
        }
        Ok(None)
    }
}

impl fmt::Display for TrajectoryTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (start, end) = self.table.span();
        write!(
            f,
            "Trajectory to ECEF ({} sample(s) over [{start}, {end}] days)",
            self.table.sample_count()
        )
    }
}
