use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use csv::Writer;

use crate::control_loop::TraceRow;
use crate::SimError;

const MAX_RUN_DIRS_PER_SECOND: u32 = 100;

/// Writes rows under a `time,setpoint,measurement,control` header.
pub fn write_trace_csv(path: &Path, rows: &[TraceRow]) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates a fresh `<root>/<UTC timestamp>` run directory. A name already
/// taken gets a `-NN` suffix.
pub fn create_timestamped_output_dir(output_root: &Path) -> Result<PathBuf, SimError> {
    fs::create_dir_all(output_root)?;
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    for attempt in 0..MAX_RUN_DIRS_PER_SECOND {
        let candidate = match attempt {
            0 => output_root.join(&stamp),
            n => output_root.join(format!("{stamp}-{n:02}")),
        };
        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(SimError::InvalidConfig(format!(
        "more than {MAX_RUN_DIRS_PER_SECOND} run directories for {stamp} under {}",
        output_root.display()
    )))
}
