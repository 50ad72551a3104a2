use crate::demo_record;
use coord_ops::linalg::{Matrix4, Vector4};
use coord_ops::ops::{AffineTransform, IdentityTransform, TrajectoryTable, TrajectoryTransform};
use coord_ops::{CoordinateTransform, TransformError};
use rstest::rstest;

fn demo_transform() -> TrajectoryTransform {
    TrajectoryTransform::from_record(demo_record())
}

#[test]
fn locate_picks_the_following_sample() {
    let table = TrajectoryTable::from_record(demo_record());
    // Insertion point strictly inside the span: nearest-following sample, no
    // interpolation.
    assert_eq!(table.locate(5.0), Ok(1), "5 must resolve to the sample at 10");
    assert_eq!(table.locate(10.5), Ok(2), "10.5 must resolve to the sample at 20");
    // Exact matches resolve to their own index, including the table bounds.
    assert_eq!(table.locate(0.0), Ok(0));
    assert_eq!(table.locate(10.0), Ok(1));
    assert_eq!(table.locate(20.0), Ok(2));
}

#[rstest]
#[case(-1.0)]
#[case(-0.000_001)]
#[case(20.000_001)]
#[case(25.0)]
fn locate_rejects_out_of_span(#[case] t: f64) {
    let table = TrajectoryTable::from_record(demo_record());
    assert_eq!(
        table.locate(t),
        Err(TransformError::TimeOutOfRange {
            t,
            start: 0.0,
            end: 20.0
        })
    );
}

#[test]
fn single_tuple_scenario() {
    let xform = demo_transform();
    let mut dst = [0.0; 4];
    // (3,4,0) normalizes to (0.6, 0.8, 0); time 5 resolves to the sample at day 10,
    // which offsets the tuple by (0,1,0).
    xform
        .transform_tuple(&[3.0, 4.0, 0.0, 5.0], Some(&mut dst), false)
        .unwrap();
    assert_eq!(dst, [0.6, 1.8, 0.0, 5.0], "Wrong transformed tuple");
}

#[test]
fn exact_time_matches_use_their_own_sample() {
    let xform = demo_transform();
    let mut dst = [0.0; 4];

    // t = 0 is an exact match on the first sample (1,0,0).
    xform
        .transform_tuple(&[3.0, 4.0, 0.0, 0.0], Some(&mut dst), false)
        .unwrap();
    assert_eq!(dst, [1.6, 0.8, 0.0, 0.0], "Wrong tuple at the first sample");

    // t = 20 is an exact match on the last sample (0,0,1).
    xform
        .transform_tuple(&[3.0, 4.0, 0.0, 20.0], Some(&mut dst), false)
        .unwrap();
    assert_eq!(dst, [0.6, 0.8, 1.0, 20.0], "Wrong tuple at the last sample");
}

#[rstest]
#[case(-1.0)]
#[case(25.0)]
fn out_of_span_time_aborts_the_point(#[case] t: f64) {
    let xform = demo_transform();
    let mut dst = [0.0; 4];
    let err = xform
        .transform_tuple(&[3.0, 4.0, 0.0, t], Some(&mut dst), false)
        .unwrap_err();
    assert!(
        matches!(err, TransformError::TimeOutOfRange { .. }),
        "expected TimeOutOfRange, got {err:?}"
    );
}

#[test]
fn null_position_vector_propagates_ieee_specials() {
    // The reference operation does not guard against r == 0: the division yields NaN
    // which flows through the offset. The time coordinate is untouched.
    let xform = demo_transform();
    let mut dst = [0.0; 4];
    xform
        .transform_tuple(&[0.0, 0.0, 0.0, 5.0], Some(&mut dst), false)
        .unwrap();
    assert!(dst[0].is_nan() && dst[1].is_nan() && dst[2].is_nan());
    assert_eq!(dst[3], 5.0);
}

#[test]
fn derivative_is_explicitly_unavailable() {
    let xform = demo_transform();
    let err = xform
        .transform_tuple(&[3.0, 4.0, 0.0, 5.0], None, true)
        .unwrap_err();
    assert!(
        matches!(err, TransformError::DerivativeUnavailable { .. }),
        "expected DerivativeUnavailable, got {err:?}"
    );
}

#[test]
fn dimensions_are_fixed_at_four() {
    let xform = demo_transform();
    assert_eq!(xform.source_dimensions(), 4);
    assert_eq!(xform.target_dimensions(), 4);
}

#[test]
fn bulk_matches_single_point() {
    let xform = demo_transform();
    let src: Vec<f64> = vec![
        3.0, 4.0, 0.0, 5.0, //
        1.0, 2.0, 2.0, 12.5, //
        -5.0, 0.0, 12.0, 0.0, //
        0.3, -0.4, 1.2, 19.99, //
    ];
    let count = src.len() / 4;

    let mut bulk = vec![0.0; src.len()];
    xform.transform_many(&src, 0, &mut bulk, 0, count).unwrap();

    for k in 0..count {
        let mut single = [0.0; 4];
        xform
            .transform_tuple(&src[4 * k..4 * k + 4], Some(&mut single), false)
            .unwrap();
        assert_eq!(
            &bulk[4 * k..4 * k + 4],
            &single,
            "Tuple {k} differs between bulk and single-point"
        );
    }
}

#[test]
fn in_place_matches_two_buffers() {
    let xform = demo_transform();
    let src: Vec<f64> = vec![3.0, 4.0, 0.0, 5.0, 1.0, 2.0, 2.0, 12.5, -5.0, 0.0, 12.0, 0.0];
    let count = src.len() / 4;

    let mut separate = vec![0.0; src.len()];
    xform
        .transform_many(&src, 0, &mut separate, 0, count)
        .unwrap();

    let mut aliased = src.clone();
    xform.transform_in_place(&mut aliased, 0, count).unwrap();

    assert_eq!(aliased, separate, "In-place and two-buffer results differ");
}

#[test]
fn bulk_honors_offsets() {
    let xform = demo_transform();
    // Two tuples buried at offset 2 of a larger buffer.
    let mut src = vec![9.9; 2 + 8 + 3];
    src[2..6].copy_from_slice(&[3.0, 4.0, 0.0, 5.0]);
    src[6..10].copy_from_slice(&[3.0, 4.0, 0.0, 0.0]);

    let mut dst = vec![-1.0; 1 + 8 + 2];
    xform.transform_many(&src, 2, &mut dst, 1, 2).unwrap();

    assert_eq!(&dst[1..5], &[0.6, 1.8, 0.0, 5.0]);
    assert_eq!(&dst[5..9], &[1.6, 0.8, 0.0, 0.0]);
    assert_eq!(dst[0], -1.0, "Value before the destination offset must be untouched");
    assert_eq!(&dst[9..], &[-1.0, -1.0], "Trailing values must be untouched");
}

#[test]
fn bulk_fails_fast_and_keeps_prior_tuples() {
    let xform = demo_transform();
    let src: Vec<f64> = vec![
        3.0, 4.0, 0.0, 5.0, // in range
        3.0, 4.0, 0.0, 25.0, // out of range: aborts here
        3.0, 4.0, 0.0, 5.0, // never processed
    ];
    let mut dst = vec![0.0; src.len()];
    let err = xform.transform_many(&src, 0, &mut dst, 0, 3).unwrap_err();
    assert!(matches!(err, TransformError::TimeOutOfRange { .. }));

    assert_eq!(
        &dst[..4],
        &[0.6, 1.8, 0.0, 5.0],
        "Tuple written before the failure must remain"
    );
    assert_eq!(&dst[4..], &[0.0; 8], "Tuples at and after the failure must be untouched");
}

#[test]
fn buffer_shape_is_validated_before_any_write() {
    let xform = demo_transform();
    let src = vec![3.0, 4.0, 0.0, 5.0];
    let mut dst = vec![7.0; 3];
    let err = xform.transform_many(&src, 0, &mut dst, 0, 1).unwrap_err();
    assert!(
        matches!(err, TransformError::BufferSize { side: "destination", .. }),
        "expected a destination BufferSize error, got {err:?}"
    );
    assert_eq!(dst, vec![7.0; 3], "Nothing may be written on a shape error");

    let err = xform
        .transform_tuple(&[1.0, 2.0, 3.0], Some(&mut [0.0; 4]), false)
        .unwrap_err();
    assert!(matches!(err, TransformError::BufferSize { side: "source", .. }));
}

#[test]
fn shared_across_threads() {
    // Immutable after construction: concurrent callers need no locking.
    let xform = demo_transform();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut dst = [0.0; 4];
                for _ in 0..1000 {
                    xform
                        .transform_tuple(&[3.0, 4.0, 0.0, 5.0], Some(&mut dst), false)
                        .unwrap();
                    assert_eq!(dst, [0.6, 1.8, 0.0, 5.0]);
                }
            });
        }
    });
}

#[test]
fn affine_transform_and_jacobian() {
    let matrix = Matrix4::from_diagonal(&Vector4::new(2.0, 3.0, 4.0, 1.0));
    let translation = Vector4::new(10.0, 0.0, -1.0, 0.0);
    let affine = AffineTransform::new(matrix, translation);
    assert!(!affine.is_identity());

    let mut dst = [0.0; 4];
    let jacobian = affine
        .transform_tuple(&[1.0, 1.0, 1.0, 7.0], Some(&mut dst), true)
        .unwrap()
        .expect("affine must provide a derivative");
    assert_eq!(dst, [12.0, 3.0, 3.0, 7.0]);
    // The Jacobian of an affine map is its linear part.
    for row in 0..4 {
        for col in 0..4 {
            assert_eq!(jacobian[(row, col)], matrix[(row, col)]);
        }
    }
}

#[test]
fn affine_identity_and_in_place() {
    let affine = AffineTransform::translation(Vector4::new(1.0, 2.0, 3.0, 4.0));
    let mut pts = vec![0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0];
    affine.transform_in_place(&mut pts, 0, 2).unwrap();
    assert_eq!(pts, vec![1.0, 2.0, 3.0, 4.0, 11.0, 12.0, 13.0, 14.0]);

    assert!(AffineTransform::translation(Vector4::zeros()).is_identity());
}

#[test]
fn identity_transform_passes_through() {
    let identity = IdentityTransform::new(4);
    let mut dst = [0.0; 4];
    let jacobian = identity
        .transform_tuple(&[5.0, -1.0, 2.0, 9.0], Some(&mut dst), true)
        .unwrap()
        .expect("identity must provide a derivative");
    assert_eq!(dst, [5.0, -1.0, 2.0, 9.0]);
    assert!(jacobian.is_identity(0.0));
}
