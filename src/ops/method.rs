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

use super::{CoordinateTransform, TrajectoryTransform};
use crate::io::{DataError, FeatureSource, TrajectoryRecord};
use crate::time::TemporalCrs;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use typed_builder::TypedBuilder;

/// Errors raised while instantiating a transform from an operation method.
#[derive(Clone, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FactoryError {
    /// The single category every data-loading failure maps to; the lower-level
    /// [`DataError`] stays available as the cause for diagnostics.
    #[snafu(display("cannot construct transform from parameters: {source}"))]
    CannotConstruct { source: DataError },
    #[snafu(display("required parameter `{name}` has no value"))]
    MissingParameter { name: String },
    #[snafu(display("parameter `{name}` is not {expected}"))]
    ParameterKind {
        name: String,
        expected: &'static str,
    },
    #[snafu(display("no operation method registered under `{name}`"))]
    UnknownMethod { name: String },
}

/// The type of value a parameter accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    /// A path or URI resolvable by a [`FeatureSource`].
    SourcePath,
    Real,
    Integer,
    Text,
}

/// Declares one parameter of an operation method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct ParameterDescriptor {
    #[builder(setter(into))]
    pub name: String,
    pub kind: ParameterKind,
    #[builder(default = true)]
    pub required: bool,
}

/// The named, ordered parameter schema of an operation method.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptorGroup {
    pub name: String,
    pub parameters: Vec<ParameterDescriptor>,
}

impl ParameterDescriptorGroup {
    pub fn new<S: ToString>(name: S, parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            parameters,
        }
    }

    pub fn descriptor(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// A parameter value, tagged by kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    SourcePath(String),
    Real(f64),
    Integer(i64),
    Text(String),
}

/// The parameter values an operation method is instantiated with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterGroup {
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: ParameterValue) {
        self.values.insert(name.to_string(), value);
    }

    /// Builder-style variant of [`ParameterGroup::set`].
    pub fn with(mut self, name: &str, value: ParameterValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn value(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Returns the named parameter as a source path.
    pub fn source_path(&self, name: &str) -> Result<&str, FactoryError> {
        match self.value(name) {
            Some(ParameterValue::SourcePath(path)) => Ok(path),
            Some(_) => ParameterKindSnafu {
                name,
                expected: "a source path",
            }
            .fail(),
            None => MissingParameterSnafu { name }.fail(),
        }
    }

    /// Returns the named parameter as a real number.
    pub fn real(&self, name: &str) -> Result<f64, FactoryError> {
        match self.value(name) {
            Some(ParameterValue::Real(value)) => Ok(*value),
            Some(_) => ParameterKindSnafu {
                name,
                expected: "a real number",
            }
            .fail(),
            None => MissingParameterSnafu { name }.fail(),
        }
    }
}

/// Identifies an operation method: the authority which defined it, the code it carries
/// within that authority, and its human readable name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodIdentifier {
    pub authority: String,
    pub code: String,
    pub name: String,
}

impl MethodIdentifier {
    pub fn new(authority: &str, code: &str, name: &str) -> Self {
        Self {
            authority: authority.to_string(),
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for MethodIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.authority, self.code)
    }
}

/// A formally described coordinate-operation method: identity, formula, parameter
/// schema, and a factory instantiating the transform from parameter values.
///
/// A referencing service discovers methods through a [`MethodRegistry`] and depends on
/// nothing else from the implementations.
pub trait OperationMethod: Send + Sync {
    fn identifier(&self) -> &MethodIdentifier;

    /// The formula or computation procedure of this method.
    fn formula(&self) -> &str;

    fn remarks(&self) -> &str {
        ""
    }

    fn parameters(&self) -> &ParameterDescriptorGroup;

    /// Instantiates the transform described by the provided parameter values, resolving
    /// any source data through `source`.
    fn create_transform(
        &self,
        source: &dyn FeatureSource,
        values: &ParameterGroup,
    ) -> Result<Box<dyn CoordinateTransform>, FactoryError>;
}

/// Name of the single parameter of [`TrajectoryToEcef`].
pub const FEATURE_TRAJECTORY_FILE: &str = "Feature trajectory file";

/// The "Trajectory to Earth Centered Earth Fixed (ECEF)" operation method.
///
/// Its schema declares exactly one required parameter, [`FEATURE_TRAJECTORY_FILE`]: the
/// path of the moving-feature record holding the precomputed trajectory. Timestamps of
/// that record are converted with the method's temporal CRS (Truncated Julian days by
/// default).
pub struct TrajectoryToEcef {
    identifier: MethodIdentifier,
    parameters: ParameterDescriptorGroup,
    time_crs: TemporalCrs,
}

impl TrajectoryToEcef {
    pub fn new() -> Self {
        Self::with_time_crs(TemporalCrs::truncated_julian())
    }

    /// Builds the method with a non-default time scale for the trajectory timestamps.
    pub fn with_time_crs(time_crs: TemporalCrs) -> Self {
        Self {
            identifier: MethodIdentifier::new(
                "OGC",
                "TB18-D025",
                "Trajectory to Earth Centered Earth Fixed (ECEF)",
            ),
            parameters: ParameterDescriptorGroup::new(
                "TrajectoryToECEF",
                vec![ParameterDescriptor::builder()
                    .name(FEATURE_TRAJECTORY_FILE)
                    .kind(ParameterKind::SourcePath)
                    .build()],
            ),
            time_crs,
        }
    }

    pub fn time_crs(&self) -> &TemporalCrs {
        &self.time_crs
    }
}

impl Default for TrajectoryToEcef {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationMethod for TrajectoryToEcef {
    fn identifier(&self) -> &MethodIdentifier {
        &self.identifier
    }

    fn formula(&self) -> &str {
        "None, this is a demonstration operation."
    }

    fn remarks(&self) -> &str {
        "Normalize the position then offset it by the trajectory sample at the tuple's time."
    }

    fn parameters(&self) -> &ParameterDescriptorGroup {
        &self.parameters
    }

    fn create_transform(
        &self,
        source: &dyn FeatureSource,
        values: &ParameterGroup,
    ) -> Result<Box<dyn CoordinateTransform>, FactoryError> {
        let path = values.source_path(FEATURE_TRAJECTORY_FILE)?;
        let feature = source.open(path).context(CannotConstructSnafu)?;
        let record =
            TrajectoryRecord::from_feature(&feature, &self.time_crs).context(CannotConstructSnafu)?;
        info!(
            "instantiating `{}` from `{path}` ({} sample(s))",
            self.identifier,
            record.sample_count()
        );
        Ok(Box::new(TrajectoryTransform::from_record(record)))
    }
}

/// A registry of operation methods, keyed by method name.
///
/// This is the discovery seam a referencing service plugs into: it registers or looks
/// up methods by name and instantiates transforms without knowing any concrete type.
pub struct MethodRegistry {
    methods: BTreeMap<String, Box<dyn OperationMethod>>,
}

impl MethodRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    /// Registers a method under its identifier name, replacing any previous method of
    /// the same name.
    pub fn register(&mut self, method: Box<dyn OperationMethod>) {
        let name = method.identifier().name.clone();
        debug!("registering operation method `{name}`");
        self.methods.insert(name, method);
    }

    pub fn method(&self, name: &str) -> Option<&dyn OperationMethod> {
        self.methods.get(name).map(AsRef::as_ref)
    }

    /// Names of the registered methods, in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Looks the method up by name and instantiates a transform from the provided
    /// parameter values.
    pub fn create_transform(
        &self,
        name: &str,
        source: &dyn FeatureSource,
        values: &ParameterGroup,
    ) -> Result<Box<dyn CoordinateTransform>, FactoryError> {
        let method = self.method(name).context(UnknownMethodSnafu { name })?;
        method.create_transform(source, values)
    }
}

impl Default for MethodRegistry {
    /// A registry pre-seeded with the methods this crate ships.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(TrajectoryToEcef::new()));
        registry
    }
}
