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

//! Demonstration of the "Trajectory to ECEF" operation method: register the method,
//! instantiate it against an in-memory moving-feature record, and transform one
//! spatiotemporal position, the way a referencing service would after reading the
//! operation from a catalog.

use coord_ops::io::{PropertyValue, TrajectoryGeometry};
use coord_ops::linalg::Vector3;
use coord_ops::ops::method::{ParameterGroup, ParameterValue, FEATURE_TRAJECTORY_FILE};
use coord_ops::{CoordinateTransform, Feature, MemoryStore, MethodRegistry, TemporalCrs};
use std::error::Error;

const VOYAGER_PATH: &str = "features/VoyagerToObservatory";

/// A dummy five-sample trajectory around Truncated Julian day 19883, the epoch of the
/// test position below.
fn voyager_feature() -> Feature {
    let crs = TemporalCrs::truncated_julian();
    let days = [19880.0, 19882.0, 19884.0, 19886.0, 19888.0];
    let geometry = TrajectoryGeometry {
        points: vec![
            Vector3::new(100.0, 20.0, -3.0),
            Vector3::new(110.0, 18.0, -2.0),
            Vector3::new(121.0, 16.5, -1.0),
            Vector3::new(133.0, 15.2, 0.5),
            Vector3::new(146.0, 14.0, 2.0),
        ],
        datetimes: days.iter().map(|d| crs.to_epoch(*d)).collect(),
    };
    Feature::new("Voyager")
        .with("trajectory", PropertyValue::Trajectory(geometry))
        .with("yaw", PropertyValue::Scalars(vec![1.0, 1.5, 2.0, 2.5, 3.0]))
        .with("pitch", PropertyValue::Scalars(vec![0.1, 0.2]))
        .with("roll", PropertyValue::Scalars(vec![0.0]))
        .with(
            "description",
            PropertyValue::Text("Dummy spacecraft trajectory for the demo".to_string()),
        )
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let store = MemoryStore::new().with(VOYAGER_PATH, voyager_feature());
    let registry = MethodRegistry::default();

    let name = "Trajectory to Earth Centered Earth Fixed (ECEF)";
    let method = registry.method(name).ok_or("method not registered")?;
    println!("Operation method: {}", method.identifier());
    println!("Formula: {}", method.formula());
    for parameter in &method.parameters().parameters {
        println!(
            "Parameter: {} ({:?}, required: {})",
            parameter.name, parameter.kind, parameter.required
        );
    }

    let values = ParameterGroup::new().with(
        FEATURE_TRAJECTORY_FILE,
        ParameterValue::SourcePath(VOYAGER_PATH.to_string()),
    );
    let transform = registry.create_transform(name, &store, &values)?;
    println!("\nImplementation of the coordinate operation:\n{transform}");

    // The same test position as the Testbed-18 demonstration: time is in Truncated
    // Julian days.
    let source = [5000.0, 100.0, -400.0, 19883.788];
    let mut target = [0.0; 4];
    transform.transform_tuple(&source, Some(&mut target), false)?;
    println!("\nTransform a coordinate tuple");
    println!("Source: {source:?}");
    println!("Target: {target:?}");
    Ok(())
}
