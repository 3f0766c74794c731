//! Wavefront OBJ ingestion for renderers.
//!
//! Text goes in; flat position, texcoord, and normal buffers sharing a single index buffer come
//! out. The pipeline runs in three stages, each usable on its own:
//!
//! 1. [parse]: tokenize the text into raw attribute streams and fan-triangulated faces
//! 2. [weld]: collapse repeated `(position, texcoord, normal)` references into shared vertices
//! 3. [normals]: synthesize smooth normals when the source didn't supply any
//!
//! Problems local to one face or attribute are recovered from and reported as
//! [Diagnostics](Diagnostic); only whole-input problems are [Errors](Error).
//!
//! ```
//! let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
//! let loaded = meshweld::load(obj, &Default::default()).unwrap();
//! assert_eq!(loaded.mesh.vertex_count(), 4);
//! assert_eq!(loaded.mesh.indices(), &[0, 1, 2, 0, 2, 3]);
//! ```
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod diag;
pub mod error;
pub mod mesh;
pub mod normals;
pub mod parse;
pub mod spatial;
pub mod weld;

use std::path::Path;

pub use diag::Diagnostic;
pub use error::Error;
pub use mesh::MeshData;
pub use parse::parse;
pub use weld::weld;

/// When to replace a mesh's normals with synthesized ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalMode {
    /// Synthesize only if the source normals are absent or all zero.
    #[default]
    Auto,
    /// Always synthesize, discarding any source normals.
    Always,
    /// Never synthesize.
    Never,
}

/// Configuration for [load].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub normals: NormalMode,
}

/// Where the normals of a [LoadedMesh] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalSource {
    FromInput,
    Synthesized,
    /// The source had none, and synthesis was disabled; the buffer is all zeroes.
    Absent,
}

/// The result of [load].
#[derive(Debug, Clone)]
pub struct LoadedMesh {
    pub mesh: MeshData,
    /// Every recoverable problem from every stage, in the order encountered.
    pub diagnostics: Vec<Diagnostic>,
    pub normals: NormalSource,
}

/// Run the whole pipeline over OBJ text.
///
/// This is a pure function of `text` and `options`.
#[tracing::instrument(skip(text), fields(len = text.len()))]
pub fn load(text: &str, options: &LoadOptions) -> Result<LoadedMesh, Error> {
    let parsed = parse(text)?;
    let welded = weld(&parsed.attributes, &parsed.triangles)?;

    let mut diagnostics = parsed.diagnostics;
    diagnostics.extend(welded.diagnostics);

    let mesh = welded.mesh;
    let synthesize = match options.normals {
        NormalMode::Auto => mesh.needs_normals(),
        NormalMode::Always => true,
        NormalMode::Never => false,
    };
    let (mesh, normals) = if synthesize {
        tracing::debug!(vertices = mesh.vertex_count(), "synthesizing normals");
        (mesh.with_synthesized_normals(), NormalSource::Synthesized)
    } else if mesh.needs_normals() {
        (mesh, NormalSource::Absent)
    } else {
        (mesh, NormalSource::FromInput)
    };

    tracing::debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        diagnostics = diagnostics.len(),
        "loaded mesh"
    );

    Ok(LoadedMesh {
        mesh,
        diagnostics,
        normals,
    })
}

/// Read a file as UTF-8 and [load] it.
///
/// # Errors
///
/// * [Io](Error::Io) if the file can't be read, or isn't valid UTF-8
/// * anything [load] can return
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<LoadedMesh, Error> {
    let text = std::fs::read_to_string(path)?;
    load(&text, options)
}
