//! Unification of per-attribute face indices into a single index buffer.
//!
//! OBJ lets each face corner index positions, texcoords, and normals independently; a GPU draw
//! takes one index per vertex. Each distinct [VertexKey] becomes one output vertex, emitted the
//! first time it's seen, and every later use of the same key reuses its index.

use std::collections::{hash_map::Entry, HashMap};

use crate::{
    diag::{AttributeKind, Diagnostic, DiagnosticSink},
    mesh::MeshData,
    parse::{RawAttributeStore, TriangleList, VertexKey},
};

/// Errors which abort a weld.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeldError {
    #[error("triangle {triangle}: position index {index} out of range (0..{count})")]
    PositionOutOfRange {
        triangle: usize,
        index: usize,
        count: usize,
    },
    #[error("more than {} distinct vertices", u32::MAX)]
    TooManyVertices,
}

/// The output of [weld].
#[derive(Debug, Clone)]
pub struct Welded {
    pub mesh: MeshData,
    pub diagnostics: Vec<Diagnostic>,
}

const DEFAULT_UV: [f32; 2] = [0.0, 0.0];
const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 0.0];

/// Output buffers under construction.
struct Builder<'a> {
    attributes: &'a RawAttributeStore,
    cache: HashMap<VertexKey, u32>,
    next_index: u32,
    positions: Vec<f32>,
    uvs: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
    sink: DiagnosticSink,
}

impl<'a> Builder<'a> {
    fn new(attributes: &'a RawAttributeStore, triangles: usize) -> Self {
        let corners = triangles * 3;
        Self {
            attributes,
            cache: HashMap::new(),
            next_index: 0,
            positions: Vec::with_capacity(corners * 3),
            uvs: Vec::with_capacity(corners * 2),
            normals: Vec::with_capacity(corners * 3),
            indices: Vec::with_capacity(corners),
            sink: DiagnosticSink::new(),
        }
    }

    /// Emit the index for `key`, appending a new vertex if `key` hasn't been seen before.
    fn corner(&mut self, key: VertexKey, triangle: usize) -> Result<(), WeldError> {
        // presence is decided by the map entry, never by the stored value: index 0 is a valid hit
        let index = match self.cache.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let index = self.next_index;
                self.next_index = index.checked_add(1).ok_or(WeldError::TooManyVertices)?;
                e.insert(index);
                Self::emit(
                    self.attributes,
                    key,
                    triangle,
                    &mut self.positions,
                    &mut self.uvs,
                    &mut self.normals,
                    &mut self.sink,
                )?;
                index
            }
        };
        self.indices.push(index);
        Ok(())
    }

    fn emit(
        attributes: &RawAttributeStore,
        key: VertexKey,
        triangle: usize,
        positions: &mut Vec<f32>,
        uvs: &mut Vec<f32>,
        normals: &mut Vec<f32>,
        sink: &mut DiagnosticSink,
    ) -> Result<(), WeldError> {
        let position =
            attributes
                .position(key.position)
                .ok_or(WeldError::PositionOutOfRange {
                    triangle,
                    index: key.position,
                    count: attributes.position_count(),
                })?;
        positions.extend_from_slice(&position);

        let uv = resolve_or_default(
            key.texcoord,
            |i| attributes.texcoord(i),
            DEFAULT_UV,
            |index| Diagnostic::MissingAttribute {
                triangle,
                attribute: AttributeKind::Texcoord,
                index,
                count: attributes.texcoord_count(),
            },
            sink,
        );
        uvs.extend_from_slice(&uv);

        let normal = resolve_or_default(
            key.normal,
            |i| attributes.normal(i),
            DEFAULT_NORMAL,
            |index| Diagnostic::MissingAttribute {
                triangle,
                attribute: AttributeKind::Normal,
                index,
                count: attributes.normal_count(),
            },
            sink,
        );
        normals.extend_from_slice(&normal);
        Ok(())
    }

    fn finish(self) -> Welded {
        tracing::debug!(
            vertices = self.next_index,
            indices = self.indices.len(),
            "welded vertex streams"
        );
        Welded {
            mesh: MeshData::from_parts_unchecked(
                self.positions,
                self.uvs,
                self.normals,
                self.indices,
            ),
            diagnostics: self.sink.into_vec(),
        }
    }
}

/// An absent attribute silently takes its default; a present one that's out of range takes its
/// default and records a diagnostic.
fn resolve_or_default<const N: usize>(
    index: Option<usize>,
    lookup: impl Fn(usize) -> Option<[f32; N]>,
    default: [f32; N],
    missing: impl FnOnce(usize) -> Diagnostic,
    sink: &mut DiagnosticSink,
) -> [f32; N] {
    let Some(index) = index else {
        return default;
    };
    lookup(index).unwrap_or_else(|| {
        sink.push(missing(index));
        default
    })
}

/// Collapse repeated [VertexKeys](VertexKey) into shared vertices, producing flat attribute
/// buffers and a single index buffer.
///
/// The output vertex count equals the number of distinct keys referenced by `triangles`, and
/// vertices appear in order of first use.
///
/// # Errors
///
/// * [PositionOutOfRange](WeldError::PositionOutOfRange) if a key names a position that
///   `attributes` doesn't have; positions have no safe default
/// * [TooManyVertices](WeldError::TooManyVertices) if the distinct vertices overflow `u32`
pub fn weld(
    attributes: &RawAttributeStore,
    triangles: &TriangleList,
) -> Result<Welded, WeldError> {
    let mut builder = Builder::new(attributes, triangles.len());
    for (t, tri) in triangles.iter().enumerate() {
        for &key in tri {
            builder.corner(key, t)?;
        }
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    fn store(positions: usize, texcoords: usize, normals: usize) -> RawAttributeStore {
        let mut s = RawAttributeStore::new();
        for i in 0..positions {
            s.push_position([i as f32, 0.0, 0.0]);
        }
        for i in 0..texcoords {
            s.push_texcoord([i as f32, 1.0]);
        }
        for i in 0..normals {
            s.push_normal([0.0, 0.0, i as f32]);
        }
        s
    }

    fn key(p: usize, t: Option<usize>, n: Option<usize>) -> VertexKey {
        VertexKey::new(p, t, n)
    }

    #[test]
    fn shared_key_welds_to_one_vertex() {
        let attrs = store(6, 6, 6);
        let shared = key(4, Some(4), Some(4));
        let tris = TriangleList::from(vec![
            [key(0, Some(0), Some(0)), key(1, Some(1), Some(1)), shared],
            [shared, key(2, Some(2), Some(2)), key(3, Some(3), Some(3))],
        ]);
        let welded = weld(&attrs, &tris).unwrap();
        let mesh = &welded.mesh;
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.indices(), &[0, 1, 2, 2, 3, 4]);
        assert_eq!(&mesh.positions()[6..9], &[4.0, 0.0, 0.0]);
        assert!(welded.diagnostics.is_empty());
    }

    #[test]
    fn index_zero_is_reused() {
        let attrs = store(3, 0, 0);
        let first = key(0, None, None);
        let tris = TriangleList::from(vec![
            [first, key(1, None, None), key(2, None, None)],
            [key(2, None, None), key(1, None, None), first],
        ]);
        let mesh = weld(&attrs, &tris).unwrap().mesh;
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn differing_attributes_split_vertices() {
        let attrs = store(3, 2, 0);
        let tris = TriangleList::from(vec![
            [key(0, Some(0), None), key(1, None, None), key(2, None, None)],
            [key(0, Some(1), None), key(2, None, None), key(1, None, None)],
        ]);
        let mesh = weld(&attrs, &tris).unwrap().mesh;
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 3, 2, 1]);
        assert_eq!(&mesh.uvs()[6..8], &[1.0, 1.0]);
    }

    #[test]
    fn absent_attributes_take_defaults_quietly() {
        let attrs = store(3, 0, 1);
        let tris = TriangleList::from(vec![[
            key(0, None, Some(0)),
            key(1, None, Some(0)),
            key(2, None, Some(0)),
        ]]);
        let welded = weld(&attrs, &tris).unwrap();
        assert_eq!(welded.mesh.uvs(), &[0.0; 6]);
        assert!(welded.diagnostics.is_empty());
    }

    #[test]
    fn out_of_range_attributes_take_defaults_with_diagnostic() {
        let attrs = store(3, 1, 1);
        let tris = TriangleList::from(vec![[
            key(0, Some(5), Some(0)),
            key(1, Some(0), Some(7)),
            key(2, Some(0), Some(0)),
        ]]);
        let welded = weld(&attrs, &tris).unwrap();
        assert_eq!(&welded.mesh.uvs()[0..2], &[0.0, 0.0]);
        assert_eq!(&welded.mesh.normals()[3..6], &[0.0, 0.0, 0.0]);
        assert_eq!(
            welded.diagnostics,
            vec![
                Diagnostic::MissingAttribute {
                    triangle: 0,
                    attribute: AttributeKind::Texcoord,
                    index: 5,
                    count: 1
                },
                Diagnostic::MissingAttribute {
                    triangle: 0,
                    attribute: AttributeKind::Normal,
                    index: 7,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn missing_position_is_fatal() {
        let attrs = store(2, 0, 0);
        let tris = TriangleList::from(vec![[
            key(0, None, None),
            key(1, None, None),
            key(2, None, None),
        ]]);
        assert_eq!(
            weld(&attrs, &tris).unwrap_err(),
            WeldError::PositionOutOfRange {
                triangle: 0,
                index: 2,
                count: 2
            }
        );
    }

    /// A triangle list whose keys all reference a small, fully-populated store.
    #[derive(Debug, Clone)]
    struct SmallMesh(TriangleList);

    const SMALL: usize = 8;

    impl Arbitrary for SmallMesh {
        fn arbitrary(g: &mut Gen) -> Self {
            let count = usize::arbitrary(g) % 32;
            let mut k = || {
                key(
                    usize::arbitrary(g) % SMALL,
                    Option::<usize>::arbitrary(g).map(|i| i % SMALL),
                    Option::<usize>::arbitrary(g).map(|i| i % SMALL),
                )
            };
            Self((0..count).map(|_| [k(), k(), k()]).collect())
        }
    }

    #[quickcheck]
    fn welded_indices_stay_in_range(mesh: SmallMesh) -> bool {
        let attrs = store(SMALL, SMALL, SMALL);
        let welded = weld(&attrs, &mesh.0).unwrap();
        let m = welded.mesh;
        m.validate().is_ok()
            && m.indices().len() == mesh.0.len() * 3
            && m.indices().iter().all(|&i| (i as usize) < m.vertex_count())
    }

    #[quickcheck]
    fn vertex_count_is_distinct_key_count(mesh: SmallMesh) -> bool {
        let attrs = store(SMALL, SMALL, SMALL);
        let distinct: std::collections::HashSet<_> = mesh.0.iter().flatten().collect();
        weld(&attrs, &mesh.0).unwrap().mesh.vertex_count() == distinct.len()
    }
}
