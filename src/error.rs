use crate::{mesh::MeshError, parse::ParseError, weld::WeldError};

/// Errors which abort the [load](crate::load) pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Weld(#[from] WeldError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
