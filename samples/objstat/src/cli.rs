use std::path::PathBuf;

use clap::ValueHint;
use meshweld::NormalMode;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Mirrors [NormalMode], so that the library needn't depend on clap.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum NormalArg {
    Auto,
    Always,
    Never,
}

impl std::fmt::Display for NormalArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalArg::Auto => f.write_str("auto"),
            NormalArg::Always => f.write_str("always"),
            NormalArg::Never => f.write_str("never"),
        }
    }
}

impl From<NormalArg> for NormalMode {
    fn from(value: NormalArg) -> Self {
        match value {
            NormalArg::Auto => NormalMode::Auto,
            NormalArg::Always => NormalMode::Always,
            NormalArg::Never => NormalMode::Never,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum IndexWidth {
    #[value(name = "16")]
    U16,
    #[value(name = "32")]
    U32,
}

impl std::fmt::Display for IndexWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexWidth::U16 => f.write_str("16"),
            IndexWidth::U32 => f.write_str("32"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,meshweld=info,objstat=info",
        env = "OBJSTAT_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// When to synthesize vertex normals
    #[arg(short, long, default_value_t = NormalArg::Auto)]
    pub normals: NormalArg,
    /// Index buffer width the meshes must fit
    #[arg(short, long, default_value_t = IndexWidth::U32)]
    pub index_width: IndexWidth,
    /// OBJ files to load
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
