use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Writes `value` as pretty-printed JSON to `path`, or to stdout when no path
/// is given.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            emit_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => emit_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn emit_json<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: io::Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

/// Parses the JSON file at `path`; `what` names the file in error messages.
pub fn read_json<T>(what: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open {what} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {what} file: {}", path.display()))
}

/// Like [`read_json`], but yields `T::default()` when no path is given.
pub fn read_json_or_default<T>(what: &str, path: Option<&Path>) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    path.map_or_else(|| Ok(T::default()), |path| read_json(what, path))
}
