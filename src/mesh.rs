//! The welded, renderer-ready mesh value.

use meshweld_common::ArrayIndex;
use nalgebra::Point3;

use crate::{normals, spatial::Aabb};

/// Violations of the [MeshData] buffer invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("position buffer length {0} is not a multiple of 3")]
    PositionStride(usize),
    #[error("{attribute} buffer holds {actual} scalars; {expected} expected for {vertices} vertices")]
    LengthMismatch {
        attribute: &'static str,
        vertices: usize,
        expected: usize,
        actual: usize,
    },
    #[error("index buffer length {0} is not a multiple of 3")]
    IndexCountNotMultipleOfThree(usize),
    #[error("index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
    #[error("index {index} does not fit in {target}")]
    IndexOverflow { index: u32, target: &'static str },
}

/// Flat attribute buffers sharing one triangle-list index buffer.
///
/// # Invariants
///
/// * `positions.len() / 3 == uvs.len() / 2 == normals.len() / 3`, the vertex count
/// * `indices.len()` is a multiple of 3, and every index is less than the vertex count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    positions: Vec<f32>,
    uvs: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshData {
    /// Construct a mesh from its buffers, checking every invariant.
    pub fn new(
        positions: Vec<f32>,
        uvs: Vec<f32>,
        normals: Vec<f32>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            positions,
            uvs,
            normals,
            indices,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Construct a mesh without checking its invariants. Callers uphold them by construction.
    #[inline]
    pub(crate) fn from_parts_unchecked(
        positions: Vec<f32>,
        uvs: Vec<f32>,
        normals: Vec<f32>,
        indices: Vec<u32>,
    ) -> Self {
        debug_assert!(positions.len() % 3 == 0);
        debug_assert_eq!(positions.len() / 3, uvs.len() / 2);
        debug_assert_eq!(positions.len(), normals.len());
        Self {
            positions,
            uvs,
            normals,
            indices,
        }
    }

    /// Check the buffer invariants.
    ///
    /// Meshes produced by this crate always pass; this exists for data crossing an API boundary.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.positions.len() % 3 != 0 {
            return Err(MeshError::PositionStride(self.positions.len()));
        }
        let vertices = self.positions.len() / 3;
        for (attribute, buf, stride) in [("uv", &self.uvs, 2), ("normal", &self.normals, 3)] {
            if buf.len() != vertices * stride {
                return Err(MeshError::LengthMismatch {
                    attribute,
                    vertices,
                    expected: vertices * stride,
                    actual: buf.len(),
                });
            }
        }
        check_indices(&self.indices, vertices)
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    #[inline]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// The position of vertex `index`, if it exists.
    pub fn position(&self, index: usize) -> Option<Point3<f32>> {
        let start = index.checked_mul(3)?;
        let p = self.positions.get(start..start.checked_add(3)?)?;
        Some(Point3::new(p[0], p[1], p[2]))
    }

    /// Decompose into `(positions, uvs, normals, indices)`.
    #[inline]
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Vec<f32>, Vec<u32>) {
        (self.positions, self.uvs, self.normals, self.indices)
    }

    /// Whether the normal buffer carries no usable data.
    #[inline]
    pub fn needs_normals(&self) -> bool {
        normals::needs_normals(&self.normals)
    }

    /// Replace the normal buffer with smooth normals computed from the triangles.
    pub fn with_synthesized_normals(mut self) -> Self {
        self.normals = normals::smooth_normals(
            &self.positions,
            self.indices
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize]),
        );
        self
    }

    /// Copy the index buffer into a narrower (or wider) index type, e.g. `u16` for
    /// 16-bit index buffers.
    ///
    /// # Errors
    ///
    /// * [IndexOverflow](MeshError::IndexOverflow) if any index isn't representable by `Idx`
    pub fn indices_as<Idx: ArrayIndex>(&self) -> Result<Vec<Idx>, MeshError> {
        self.indices
            .iter()
            .map(|&i| {
                Idx::narrow_from(i).ok_or(MeshError::IndexOverflow {
                    index: i,
                    target: std::any::type_name::<Idx>(),
                })
            })
            .collect()
    }

    /// The axis-aligned bounds of every vertex position, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb<f32>> {
        Aabb::try_from_points(
            self.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2])),
        )
        .ok()
    }
}

pub(crate) fn check_indices(indices: &[u32], vertices: usize) -> Result<(), MeshError> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::IndexCountNotMultipleOfThree(indices.len()));
    }
    match indices.iter().find(|&&i| i as usize >= vertices) {
        Some(&index) => Err(MeshError::IndexOutOfRange { index, vertices }),
        None => Ok(()),
    }
}
