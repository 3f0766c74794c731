//! Text parsing of Wavefront OBJ geometry.
//!
//! Only `v`, `vt`, `vn`, and `f` are interpreted; every other directive is ignored. Faces are
//! fan-triangulated as they're read.
//!
//! # See Also
//!
//! * [Wavefront OBJ format](https://paulbourke.net/dataformats/obj/)

mod reference;
mod triangulate;

pub use triangulate::triangulate_fan;

use std::str::SplitWhitespace;

use crate::diag::{Diagnostic, DiagnosticSink};
use reference::{parse_reference, StreamCounts, Unresolved};

/// Errors which abort a parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("input is empty")]
    EmptyInput,
    #[error("line {line}: expected a finite number, found {token:?}")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: `{directive}` requires at least {expected} component(s), found {found}")]
    MissingComponents {
        line: usize,
        directive: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("none of the {rejected} face(s) in the input could be used")]
    NoUsableFaces { rejected: usize },
}

/// Per-attribute data exactly as declared in the source, before welding.
///
/// All indices taken by this type are element indices, not scalar offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAttributeStore {
    positions: Vec<f32>,
    texcoords: Vec<f32>,
    normals: Vec<f32>,
}

impl RawAttributeStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push_position(&mut self, p: [f32; 3]) {
        self.positions.extend_from_slice(&p);
    }

    #[inline]
    pub fn push_texcoord(&mut self, t: [f32; 2]) {
        self.texcoords.extend_from_slice(&t);
    }

    #[inline]
    pub fn push_normal(&mut self, n: [f32; 3]) {
        self.normals.extend_from_slice(&n);
    }

    #[inline]
    pub fn position_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / 2
    }

    #[inline]
    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    #[inline]
    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        element(&self.positions, index)
    }

    #[inline]
    pub fn texcoord(&self, index: usize) -> Option<[f32; 2]> {
        element(&self.texcoords, index)
    }

    #[inline]
    pub fn normal(&self, index: usize) -> Option<[f32; 3]> {
        element(&self.normals, index)
    }

    fn counts(&self, total_positions: usize) -> StreamCounts {
        StreamCounts {
            total_positions,
            positions: self.position_count(),
            texcoords: self.texcoord_count(),
            normals: self.normal_count(),
        }
    }
}

fn element<const N: usize>(data: &[f32], index: usize) -> Option<[f32; N]> {
    let start = index.checked_mul(N)?;
    data.get(start..start.checked_add(N)?)?.try_into().ok()
}

/// Identifies one emitted vertex: a combination of resolved, 0-based attribute indices.
///
/// `None` means the face corner didn't reference that attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl VertexKey {
    #[inline]
    pub fn new(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }
}

/// Three corners, in source winding order.
pub type Triangle = [VertexKey; 3];

/// Triangles in the order they were produced from the source faces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriangleList {
    triangles: Vec<Triangle>,
}

impl TriangleList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, tri: Triangle) {
        self.triangles.push(tri);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Triangle] {
        &self.triangles
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }
}

impl From<Vec<Triangle>> for TriangleList {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl FromIterator<Triangle> for TriangleList {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: iter.into_iter().collect(),
        }
    }
}

impl<'list> IntoIterator for &'list TriangleList {
    type Item = &'list Triangle;
    type IntoIter = std::slice::Iter<'list, Triangle>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The output of [parse].
#[derive(Debug, Clone)]
pub struct ParsedObj {
    pub attributes: RawAttributeStore,
    pub triangles: TriangleList,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse OBJ text into raw attribute streams and a triangulated face list.
///
/// # Errors
///
/// * [EmptyInput](ParseError::EmptyInput) if `text` has zero length
/// * [InvalidNumber](ParseError::InvalidNumber) / [MissingComponents](ParseError::MissingComponents)
///   if an attribute line is malformed; skipping it would shift every later index
/// * [NoUsableFaces](ParseError::NoUsableFaces) if there were faces, and all of them were rejected
pub fn parse(text: &str) -> Result<ParsedObj, ParseError> {
    if text.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let total_positions = count_positions(text);
    let mut attributes = RawAttributeStore::new();
    let mut triangles = TriangleList::new();
    let mut sink = DiagnosticSink::new();
    let mut faces = 0usize;
    let mut rejected = 0usize;

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let mut it = s.split_whitespace();
        let tag = it.next().unwrap_or("");
        match tag {
            "v" => {
                let [x, y, z] = read_floats::<3>(&mut it, line_no, "v", 3)?;
                attributes.push_position([x, y, z]);
            }
            "vt" => {
                let [u, v] = read_floats::<2>(&mut it, line_no, "vt", 1)?;
                attributes.push_texcoord([u, v]);
            }
            "vn" => {
                let [x, y, z] = read_floats::<3>(&mut it, line_no, "vn", 3)?;
                attributes.push_normal([x, y, z]);
            }
            "f" => {
                faces += 1;
                let counts = attributes.counts(total_positions);
                if !read_face(it, line_no, counts, &mut triangles, &mut sink) {
                    rejected += 1;
                }
            }
            other => tracing::trace!(line = line_no, directive = other, "ignoring directive"),
        }
    }

    if faces > 0 && rejected == faces {
        return Err(ParseError::NoUsableFaces { rejected });
    }

    tracing::debug!(
        positions = attributes.position_count(),
        texcoords = attributes.texcoord_count(),
        normals = attributes.normal_count(),
        faces,
        rejected,
        triangles = triangles.len(),
        "parsed OBJ text"
    );

    Ok(ParsedObj {
        attributes,
        triangles,
        diagnostics: sink.into_vec(),
    })
}

/// Positive face indices may name positions declared later in the file, so faces are checked
/// against the final count. A malformed `v` line aborts the parse, so the count is exact whenever
/// parsing succeeds.
fn count_positions(text: &str) -> usize {
    text.lines()
        .filter(|line| line.split_whitespace().next() == Some("v"))
        .count()
}

/// Read up to `N` floats; at least `required` must be present, and the rest default to `0.0`.
/// Tokens beyond `N` are ignored.
fn read_floats<const N: usize>(
    it: &mut SplitWhitespace<'_>,
    line: usize,
    directive: &'static str,
    required: usize,
) -> Result<[f32; N], ParseError> {
    let mut out = [0.0f32; N];
    let mut found = 0;
    for (slot, token) in out.iter_mut().zip(it) {
        *slot = match token.parse::<f32>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                return Err(ParseError::InvalidNumber {
                    line,
                    token: token.to_owned(),
                })
            }
        };
        found += 1;
    }
    if found < required {
        return Err(ParseError::MissingComponents {
            line,
            directive,
            expected: required,
            found,
        });
    }
    Ok(out)
}

/// Parse one face and append its triangles. Returns `false` if the face was rejected.
fn read_face(
    it: SplitWhitespace<'_>,
    line: usize,
    counts: StreamCounts,
    triangles: &mut TriangleList,
    sink: &mut DiagnosticSink,
) -> bool {
    let tokens: Vec<&str> = it.collect();
    if tokens.len() < 3 {
        sink.push(Diagnostic::ShortFace {
            line,
            count: tokens.len(),
        });
        return false;
    }

    let mut corners = Vec::with_capacity(tokens.len());
    for token in tokens {
        let Some(raw) = parse_reference(token) else {
            sink.push(Diagnostic::InvalidReference {
                line,
                token: token.to_owned(),
            });
            return false;
        };
        let resolved = raw.resolve(counts, |u| sink.push(out_of_range(line, u)));
        match resolved {
            Ok(key) => corners.push(key),
            Err(u) => {
                sink.push(out_of_range(line, u));
                return false;
            }
        }
    }

    for tri in triangulate_fan(&corners) {
        triangles.push(tri);
    }
    true
}

fn out_of_range(line: usize, u: Unresolved) -> Diagnostic {
    Diagnostic::FaceIndexOutOfRange {
        line,
        attribute: u.attribute,
        index: u.index,
        count: u.count,
    }
}
