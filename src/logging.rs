use env_logger::{Builder, Target};
use std::env;
use std::fs::OpenOptions;

const LOG_FILE_VAR: &str = "ARCADE_LOG";
const FILTER_VAR: &str = "RUST_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Sets up `env_logger`. The games own the terminal, so `ARCADE_LOG=<path>`
/// sends records to a file. `RUST_LOG` only applies together with a log
/// file; records below `warn` on stderr would tear the game screen.
pub fn init() -> Result<(), String>
{
    let file = match env::var(LOG_FILE_VAR) {
        Ok(path) => Some(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|err| format!("Failed to open log file {path}: {err}"))?,
        ),
        Err(_) => None,
    };

    let mut builder = Builder::new();
    builder.parse_filters(&filter_spec(env::var(FILTER_VAR).ok(), file.is_some()));
    if let Some(file) = file {
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder
        .try_init()
        .map_err(|err| format!("Failed to start logging: {err}"))
}

fn filter_spec(requested: Option<String>, to_file: bool) -> String
{
    match requested {
        Some(spec) if to_file && !spec.trim().is_empty() => spec,
        _ => DEFAULT_FILTER.to_string(),
    }
}
