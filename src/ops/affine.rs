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

use super::{check_buffer, CoordinateTransform, TransformError};
use crate::linalg::{DMatrix, Matrix4, Vector4};
use approx::relative_eq;
use std::fmt;

/// An affine coordinate operation over 4D tuples: `dst = M * src + b`.
///
/// Unlike the trajectory core, this operation has an exact Jacobian (its matrix), which
/// makes it the reference implementation of the derivative side of the capability
/// trait.
#[derive(Clone, Debug, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix4<f64>,
    translation: Vector4<f64>,
}

impl AffineTransform {
    pub fn new(matrix: Matrix4<f64>, translation: Vector4<f64>) -> Self {
        Self {
            matrix,
            translation,
        }
    }

    /// A pure translation of the four axes.
    pub fn translation(offset: Vector4<f64>) -> Self {
        Self::new(Matrix4::identity(), offset)
    }

    /// A per-axis scaling, e.g. a unit conversion applied axis by axis.
    pub fn scaling(factors: Vector4<f64>) -> Self {
        Self::new(Matrix4::from_diagonal(&factors), Vector4::zeros())
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn is_identity(&self) -> bool {
        relative_eq!(self.matrix, Matrix4::identity())
            && relative_eq!(self.translation, Vector4::zeros())
    }
}

impl CoordinateTransform for AffineTransform {
    fn source_dimensions(&self) -> usize {
        4
    }

    fn target_dimensions(&self) -> usize {
        4
    }

    fn transform_tuple(
        &self,
        src: &[f64],
        dst: Option<&mut [f64]>,
        derivate: bool,
    ) -> Result<Option<DMatrix<f64>>, TransformError> {
        check_buffer("source", src.len(), 0, 1, 4)?;
        if let Some(dst) = dst {
            check_buffer("destination", dst.len(), 0, 1, 4)?;
            let tuple = Vector4::new(src[0], src[1], src[2], src[3]);
            let transformed = self.matrix * tuple + self.translation;
            dst[..4].copy_from_slice(transformed.as_slice());
        }
        if derivate {
            // The derivative of an affine map is its linear part, everywhere.
            Ok(Some(DMatrix::from_column_slice(4, 4, self.matrix.as_slice())))
        } else {
            Ok(None)
        }
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_identity() {
            write!(f, "Affine (identity)")
        } else {
            write!(f, "Affine {} + {}", self.matrix, self.translation.transpose())
        }
    }
}

/// The do-nothing coordinate operation, for any dimensionality.
///
/// A referencing service returns this when source and target reference systems turn out
/// to be the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentityTransform {
    dimension: usize,
}

impl IdentityTransform {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl CoordinateTransform for IdentityTransform {
    fn source_dimensions(&self) -> usize {
        self.dimension
    }

    fn target_dimensions(&self) -> usize {
        self.dimension
    }

    fn transform_tuple(
        &self,
        src: &[f64],
        dst: Option<&mut [f64]>,
        derivate: bool,
    ) -> Result<Option<DMatrix<f64>>, TransformError> {
        check_buffer("source", src.len(), 0, 1, self.dimension)?;
        if let Some(dst) = dst {
            check_buffer("destination", dst.len(), 0, 1, self.dimension)?;
            dst[..self.dimension].copy_from_slice(&src[..self.dimension]);
        }
        if derivate {
            Ok(Some(DMatrix::identity(self.dimension, self.dimension)))
        } else {
            Ok(None)
        }
    }
}

impl fmt::Display for IdentityTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Identity ({}D)", self.dimension)
    }
}
