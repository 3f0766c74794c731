//! Smooth per-vertex normals from triangle geometry, for meshes that don't supply their own.

use nalgebra::{Point3, Vector3};

use crate::mesh::{check_indices, MeshError};

/// The direction given to vertices which receive no usable contribution from any triangle.
pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// Whether a flat normal buffer carries no usable data: it is empty, or every component is zero.
pub fn needs_normals(normals: &[f32]) -> bool {
    normals.iter().all(|&c| c == 0.0)
}

/// Compute one unit normal per vertex of `positions` (a flat `[x, y, z, …]` buffer).
///
/// With `indices`, each consecutive index triple is a triangle. Without, each consecutive
/// triple of positions is a triangle.
///
/// Each triangle contributes its unit face normal `(v2 - v1) × (v3 - v1)` to its three corners;
/// the sums are then renormalized. Zero-area triangles (an exactly zero cross product)
/// contribute nothing, and vertices left with a zero sum get [DEFAULT_NORMAL].
///
/// # Errors
///
/// * [PositionStride](MeshError::PositionStride) if `positions.len()` isn't a multiple of 3
/// * [IndexCountNotMultipleOfThree](MeshError::IndexCountNotMultipleOfThree) /
///   [IndexOutOfRange](MeshError::IndexOutOfRange) for a malformed index buffer
pub fn compute_vertex_normals(
    positions: &[f32],
    indices: Option<&[u32]>,
) -> Result<Vec<f32>, MeshError> {
    if positions.len() % 3 != 0 {
        return Err(MeshError::PositionStride(positions.len()));
    }
    let vertices = positions.len() / 3;
    Ok(match indices {
        Some(indices) => {
            check_indices(indices, vertices)?;
            smooth_normals(
                positions,
                indices
                    .chunks_exact(3)
                    .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize]),
            )
        }
        None => smooth_normals(
            positions,
            (0..vertices / 3).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]),
        ),
    })
}

/// Accumulate and renormalize; triangles referencing missing vertices are skipped.
pub(crate) fn smooth_normals(
    positions: &[f32],
    triangles: impl Iterator<Item = [usize; 3]>,
) -> Vec<f32> {
    let vertices = positions.len() / 3;
    let point = |i: usize| -> Option<Point3<f32>> {
        let start = i.checked_mul(3)?;
        let p = positions.get(start..start.checked_add(3)?)?;
        Some(Point3::new(p[0], p[1], p[2]))
    };

    let mut sums = vec![Vector3::<f32>::zeros(); vertices];
    let mut degenerate = 0usize;
    for tri in triangles {
        let (Some(v1), Some(v2), Some(v3)) = (point(tri[0]), point(tri[1]), point(tri[2])) else {
            continue;
        };
        // the cross product's length scales with area, so only an exact zero is degenerate
        let cross = (v2 - v1).cross(&(v3 - v1));
        let face = match cross.try_normalize(0.0) {
            Some(n) if n.iter().all(|c| c.is_finite()) => n,
            _ => {
                degenerate += 1;
                continue;
            }
        };
        for corner in tri {
            sums[corner] += face;
        }
    }

    if degenerate > 0 {
        tracing::debug!(degenerate, "zero-area triangles contributed no normal");
    }

    let fallback = Vector3::from(DEFAULT_NORMAL);
    sums.into_iter()
        .flat_map(|sum| {
            let n = sum.try_normalize(f32::EPSILON).unwrap_or(fallback);
            [n.x, n.y, n.z]
        })
        .collect()
}
