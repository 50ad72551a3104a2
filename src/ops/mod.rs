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

use crate::linalg::DMatrix;
use snafu::prelude::*;
use std::fmt;

pub mod affine;
pub mod method;
pub mod trajectory;

pub use affine::{AffineTransform, IdentityTransform};
pub use trajectory::{TrajectoryTable, TrajectoryTransform};

/// Errors raised while transforming coordinate tuples.
///
/// These are per-point failures: they abort the bulk call which encountered them, but
/// the transform instance stays valid and tuples written before the failing point
/// remain in the destination buffer.
#[derive(Clone, PartialEq, Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TransformError {
    #[snafu(display("time {t} is outside the trajectory span [{start}, {end}]"))]
    TimeOutOfRange { t: f64, start: f64, end: f64 },
    #[snafu(display("{method} does not provide derivatives"))]
    DerivativeUnavailable { method: String },
    #[snafu(display(
        "{side} buffer of length {len} cannot hold {count} tuple(s) of dimension {dim} at offset {offset}"
    ))]
    BufferSize {
        side: &'static str,
        len: usize,
        offset: usize,
        count: usize,
        dim: usize,
    },
    #[snafu(display(
        "in-place transformation requires matching dimensions, but this operation maps {source_dim} -> {target_dim}"
    ))]
    DimensionMismatch {
        source_dim: usize,
        target_dim: usize,
    },
}

/// The capability every coordinate operation exposes: tuple-wise transformation with an
/// optional derivative, and bulk transformation over coordinate arrays.
///
/// Implementations are immutable once constructed, so a single transform may be shared
/// read-only across threads and invoked concurrently.
pub trait CoordinateTransform: fmt::Debug + fmt::Display + Send + Sync {
    /// Number of values in one source coordinate tuple.
    fn source_dimensions(&self) -> usize;

    /// Number of values in one target coordinate tuple.
    fn target_dimensions(&self) -> usize;

    /// Transforms a single coordinate tuple, and optionally computes the Jacobian of
    /// the operation at the source position.
    ///
    /// `src` must hold at least `source_dimensions()` values. When `dst` is provided,
    /// the transformed tuple is written to its first `target_dimensions()` entries;
    /// pass `None` to request the derivative only. Operations which cannot compute a
    /// derivative must fail with [`TransformError::DerivativeUnavailable`] when
    /// `derivate` is set, before writing anything, rather than silently returning no
    /// matrix.
    fn transform_tuple(
        &self,
        src: &[f64],
        dst: Option<&mut [f64]>,
        derivate: bool,
    ) -> Result<Option<DMatrix<f64>>, TransformError>;

    /// Transforms `count` tuples read from `src` starting at `src_offset` into `dst`
    /// starting at `dst_offset`.
    ///
    /// Buffer shapes are validated up front. The driver fails fast: the first failing
    /// point aborts the call, and tuples already written stay in `dst` (no rollback).
    /// Derivatives are not available at the bulk level.
    fn transform_many(
        &self,
        src: &[f64],
        src_offset: usize,
        dst: &mut [f64],
        dst_offset: usize,
        count: usize,
    ) -> Result<(), TransformError> {
        let src_dim = self.source_dimensions();
        let dst_dim = self.target_dimensions();
        check_buffer("source", src.len(), src_offset, count, src_dim)?;
        check_buffer("destination", dst.len(), dst_offset, count, dst_dim)?;

        let mut tuple = vec![0.0; src_dim];
        let mut transformed = vec![0.0; dst_dim];
        for k in 0..count {
            let s = src_offset + k * src_dim;
            let d = dst_offset + k * dst_dim;
            tuple.copy_from_slice(&src[s..s + src_dim]);
            self.transform_tuple(&tuple, Some(&mut transformed), false)?;
            dst[d..d + dst_dim].copy_from_slice(&transformed);
        }
        Ok(())
    }

    /// Transforms `count` tuples of a single buffer in place, starting at `offset`.
    ///
    /// This is the aliased-buffer form of [`CoordinateTransform::transform_many`]: each
    /// tuple is fully read into locals before any of its components is written back, so
    /// the source/destination overlap is safe and the result matches the two-buffer
    /// driver exactly.
    fn transform_in_place(
        &self,
        pts: &mut [f64],
        offset: usize,
        count: usize,
    ) -> Result<(), TransformError> {
        let dim = self.source_dimensions();
        ensure!(
            self.target_dimensions() == dim,
            DimensionMismatchSnafu {
                source_dim: dim,
                target_dim: self.target_dimensions(),
            }
        );
        check_buffer("in-place", pts.len(), offset, count, dim)?;

        let mut tuple = vec![0.0; dim];
        let mut transformed = vec![0.0; dim];
        for k in 0..count {
            let s = offset + k * dim;
            tuple.copy_from_slice(&pts[s..s + dim]);
            self.transform_tuple(&tuple, Some(&mut transformed), false)?;
            pts[s..s + dim].copy_from_slice(&transformed);
        }
        Ok(())
    }
}

pub(crate) fn check_buffer(
    side: &'static str,
    len: usize,
    offset: usize,
    count: usize,
    dim: usize,
) -> Result<(), TransformError> {
    ensure!(
        offset
            .checked_add(count * dim)
            .is_some_and(|needed| needed <= len),
        BufferSizeSnafu {
            side,
            len,
            offset,
            count,
            dim,
        }
    );
    Ok(())
}
