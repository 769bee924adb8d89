// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Homogeneous transform helpers
//!
//! Translation-only matrices of arbitrary dimension plus the planar rigid
//! transforms used to re-express polygons in a rotated/translated frame.

use nalgebra::{DMatrix, Matrix3, Point2, Vector2};

/// Build a `(d+1)x(d+1)` homogeneous matrix that translates by `translation`
///
/// Identity everywhere except the last column, which holds the vector.
pub fn to_homogeneous_transform(translation: &[f64]) -> DMatrix<f64> {
    let d = translation.len();
    let mut transform = DMatrix::identity(d + 1, d + 1);
    for (row, value) in translation.iter().enumerate() {
        transform[(row, d)] = *value;
    }
    transform
}

/// 2D translation as a 3x3 homogeneous matrix
pub fn translation_2d(offset: &Vector2<f64>) -> Matrix3<f64> {
    let mut transform = Matrix3::identity();
    transform[(0, 2)] = offset.x;
    transform[(1, 2)] = offset.y;
    transform
}

/// Counter-clockwise rotation about the origin as a 3x3 homogeneous matrix
pub fn rotation_2d(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    let mut transform = Matrix3::identity();
    transform[(0, 0)] = cos;
    transform[(0, 1)] = -sin;
    transform[(1, 0)] = sin;
    transform[(1, 1)] = cos;
    transform
}

/// Transform that re-expresses world coordinates in a frame located at
/// `origin` with heading `heading`: rotate by `-heading` after translating
/// by `-origin`.
pub fn inverse_rigid_2d(origin: &Vector2<f64>, heading: f64) -> Matrix3<f64> {
    rotation_2d(-heading) * translation_2d(&-origin)
}

/// Apply a 3x3 homogeneous matrix to a point
#[inline]
pub fn transform_point_2d(matrix: &Matrix3<f64>, point: &Point2<f64>) -> Point2<f64> {
    matrix.transform_point(point)
}

/// Apply a 3x3 homogeneous matrix to every point of a contour
pub fn transform_contour(matrix: &Matrix3<f64>, contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    contour
        .iter()
        .map(|p| transform_point_2d(matrix, p))
        .collect()
}
