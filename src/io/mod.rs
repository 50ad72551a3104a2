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

use crate::linalg::Vector3;
use crate::time::{Epoch, TemporalCrs};
use snafu::prelude::*;
use std::collections::BTreeMap;

/// Errors raised while resolving or decoding trajectory source data.
///
/// All of these are constructor-time failures: they prevent the transform instance from
/// being built but do not corrupt any other instance, and they are never retried
/// automatically.
#[derive(Clone, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DataError {
    #[snafu(display("trajectory source `{path}` not found"))]
    SourceNotFound { path: String },
    #[snafu(display("feature `{feature}` has no property `{property}`"))]
    MissingProperty { feature: String, property: String },
    #[snafu(display("property `{property}` is not {expected}"))]
    PropertyKind {
        property: String,
        expected: &'static str,
    },
    #[snafu(display("trajectory has {points} point(s) but {datetimes} datetime(s)"))]
    LengthMismatch { points: usize, datetimes: usize },
    #[snafu(display("trajectory geometry is empty"))]
    EmptyTrajectory,
    #[snafu(display(
        "attribute `{property}` has {actual} value(s) but the trajectory only has {expected} sample(s)"
    ))]
    TooManyValues {
        property: String,
        actual: usize,
        expected: usize,
    },
    #[snafu(display("attribute `{property}` supplies no values"))]
    EmptyAttribute { property: String },
}

/// A timestamped poly-line: an ordered sequence of 3D points whose vertices carry a
/// parallel "datetimes" characteristic, one epoch per vertex.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryGeometry {
    pub points: Vec<Vector3<f64>>,
    pub datetimes: Vec<Epoch>,
}

/// The value of a named feature property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// A trajectory geometry with its timestamp characteristic.
    Trajectory(TrajectoryGeometry),
    /// A scalar attribute series, e.g. yaw angles in degrees.
    Scalars(Vec<f64>),
    /// Free-form text, e.g. a mission description.
    Text(String),
}

/// A single record from a moving-feature dataset: a name and a set of typed, named
/// properties.
///
/// This is the structured object an external data-store reader must produce. How bytes
/// on disk (or on the wire) become a `Feature` is the reader's business; by the time a
/// `Feature` reaches this crate, property access is fully typed.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    name: String,
    properties: BTreeMap<String, PropertyValue>,
}

impl Feature {
    pub fn new<S: ToString>(name: S) -> Self {
        Self {
            name: name.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert(&mut self, property: &str, value: PropertyValue) {
        self.properties.insert(property.to_string(), value);
    }

    /// Builder-style variant of [`Feature::insert`].
    pub fn with(mut self, property: &str, value: PropertyValue) -> Self {
        self.insert(property, value);
        self
    }

    pub fn property(&self, property: &str) -> Option<&PropertyValue> {
        self.properties.get(property)
    }

    /// Returns the requested property as a trajectory geometry.
    pub fn trajectory(&self, property: &str) -> Result<&TrajectoryGeometry, DataError> {
        match self.property(property) {
            Some(PropertyValue::Trajectory(geometry)) => Ok(geometry),
            Some(_) => PropertyKindSnafu {
                property,
                expected: "a trajectory geometry",
            }
            .fail(),
            None => MissingPropertySnafu {
                feature: self.name.clone(),
                property,
            }
            .fail(),
        }
    }

    /// Returns the requested property as a scalar series.
    pub fn scalars(&self, property: &str) -> Result<&[f64], DataError> {
        match self.property(property) {
            Some(PropertyValue::Scalars(values)) => Ok(values),
            Some(_) => PropertyKindSnafu {
                property,
                expected: "a scalar series",
            }
            .fail(),
            None => MissingPropertySnafu {
                feature: self.name.clone(),
                property,
            }
            .fail(),
        }
    }
}

/// Resolves a source path (or URI) into a [`Feature`].
///
/// Implementations that parse actual file formats live outside this crate; the engine
/// only requires that resolution failures surface as [`DataError::SourceNotFound`].
pub trait FeatureSource: Send + Sync {
    fn open(&self, path: &str) -> Result<Feature, DataError>;
}

/// An in-memory feature source, keyed by path. Used by the demos and the test suite,
/// and handy as a cache layer in front of a real reader.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    features: BTreeMap<String, Feature>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, feature: Feature) {
        self.features.insert(path.to_string(), feature);
    }

    pub fn with(mut self, path: &str, feature: Feature) -> Self {
        self.insert(path, feature);
        self
    }
}

impl FeatureSource for MemoryStore {
    fn open(&self, path: &str) -> Result<Feature, DataError> {
        self.features
            .get(path)
            .cloned()
            .context(SourceNotFoundSnafu { path })
    }
}

/// Name of the property holding the timestamped geometry of a moving feature.
pub const TRAJECTORY_PROPERTY: &str = "trajectory";

/// The fully validated trajectory data extracted from a moving feature, in the layout
/// the transform core consumes.
///
/// `times` is expressed on the [`TemporalCrs`] supplied at load time and is assumed to
/// be pre-sorted in ascending order, as the moving-feature conventions require. No
/// re-sort is performed here.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryRecord {
    /// Start time of each trajectory sample, in days on the loading time scale.
    pub times: Vec<f64>,
    /// Flat (x, y, z) sequence, three values per sample.
    pub positions: Vec<f64>,
    pub yaw: Vec<f64>,
    pub pitch: Vec<f64>,
    pub roll: Vec<f64>,
}

impl TrajectoryRecord {
    /// Extracts and validates the trajectory data of the provided feature.
    ///
    /// The feature must carry a [`TRAJECTORY_PROPERTY`] geometry whose point count
    /// matches its datetime characteristic, and the three scalar attributes `yaw`,
    /// `pitch` and `roll`. Attributes shorter than the sample count are padded by
    /// replicating their last value (padding, not interpolation).
    pub fn from_feature(feature: &Feature, time_crs: &TemporalCrs) -> Result<Self, DataError> {
        let geometry = feature.trajectory(TRAJECTORY_PROPERTY)?;
        let sample_count = geometry.datetimes.len();
        ensure!(sample_count > 0, EmptyTrajectorySnafu);
        ensure!(
            geometry.points.len() == sample_count,
            LengthMismatchSnafu {
                points: geometry.points.len(),
                datetimes: sample_count,
            }
        );

        let times: Vec<f64> = geometry
            .datetimes
            .iter()
            .map(|epoch| time_crs.to_value(*epoch))
            .collect();

        let mut positions = Vec::with_capacity(3 * sample_count);
        for point in &geometry.points {
            positions.push(point.x);
            positions.push(point.y);
            positions.push(point.z);
        }

        let yaw = Self::padded_attribute(feature, "yaw", sample_count)?;
        let pitch = Self::padded_attribute(feature, "pitch", sample_count)?;
        let roll = Self::padded_attribute(feature, "roll", sample_count)?;

        debug!(
            "loaded {} trajectory sample(s) from feature `{}` spanning [{}, {}] ({time_crs})",
            sample_count,
            feature.name(),
            times[0],
            times[sample_count - 1]
        );

        Ok(Self {
            times,
            positions,
            yaw,
            pitch,
            roll,
        })
    }

    pub fn sample_count(&self) -> usize {
        self.times.len()
    }

    /// Reads a scalar attribute and pads it to one value per trajectory sample by
    /// replicating the last supplied value.
    fn padded_attribute(
        feature: &Feature,
        property: &str,
        sample_count: usize,
    ) -> Result<Vec<f64>, DataError> {
        let supplied = feature.scalars(property)?;
        ensure!(!supplied.is_empty(), EmptyAttributeSnafu { property });
        ensure!(
            supplied.len() <= sample_count,
            TooManyValuesSnafu {
                property,
                actual: supplied.len(),
                expected: sample_count,
            }
        );
        let last = supplied[supplied.len() - 1];
        let mut values = supplied.to_vec();
        values.resize(sample_count, last);
        Ok(values)
    }
}
