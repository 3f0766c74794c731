use std::path::{Path, PathBuf};

use clap::Parser;
use meshweld::{LoadOptions, LoadedMesh};

mod cli;
mod input;

use cli::{Cli, IndexWidth};
use input::MappedFile;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path:?}: not valid UTF-8: {source}")]
    Utf8 {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
    #[error("{path:?}: {source}")]
    Load {
        path: PathBuf,
        source: meshweld::Error,
    },
    #[error("{failed} of {total} file(s) failed")]
    Failed { failed: usize, total: usize },
}

fn load(path: &Path, options: &LoadOptions) -> Result<LoadedMesh, CliError> {
    let data = MappedFile::open(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })?;
    let text = std::str::from_utf8(&data).map_err(|source| CliError::Utf8 {
        path: path.to_owned(),
        source,
    })?;
    meshweld::load(text, options).map_err(|source| CliError::Load {
        path: path.to_owned(),
        source,
    })
}

fn check_width(path: &Path, loaded: &LoadedMesh, width: IndexWidth) -> Result<(), CliError> {
    let res = match width {
        IndexWidth::U16 => loaded.mesh.indices_as::<u16>().map(|_| ()),
        IndexWidth::U32 => Ok(()),
    };
    res.map_err(|e| CliError::Load {
        path: path.to_owned(),
        source: e.into(),
    })
}

fn report(path: &Path, loaded: &LoadedMesh) {
    let mesh = &loaded.mesh;
    println!("{}", path.display());
    println!("  vertices:    {}", mesh.vertex_count());
    println!("  triangles:   {}", mesh.triangle_count());
    println!("  normals:     {:?}", loaded.normals);
    println!("  diagnostics: {}", loaded.diagnostics.len());
    if let Some(b) = mesh.bounds() {
        let (c, e) = (b.center(), b.extents());
        println!("  center:      [{}, {}, {}]", c.x, c.y, c.z);
        println!("  extents:     [{}, {}, {}]", e.x, e.y, e.z);
    }
}

pub fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.log_filter, cli.log_format);

    let options = LoadOptions {
        normals: cli.normals.into(),
    };

    let mut failed = 0;
    for path in &cli.files {
        let res = load(path, &options).and_then(|loaded| {
            check_width(path, &loaded, cli.index_width)?;
            Ok(loaded)
        });
        match res {
            Ok(loaded) => report(path, &loaded),
            Err(e) => {
                tracing::error!("{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CliError::Failed {
            failed,
            total: cli.files.len(),
        });
    }
    Ok(())
}
