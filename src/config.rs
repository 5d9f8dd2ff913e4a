// Database location resolution. Precedence: explicit path, then the
// environment, then the platform data directory.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the database location.
pub const DB_ENV_VAR: &str = "OVERTIME_LEDGER_DB";

const APP_DIR: &str = "overtime-ledger";
const DB_FILE: &str = "overtime-ledger.db";

/// Resolve where the database lives.
///
/// Falls back to the working directory when the platform has no data
/// directory (stripped-down containers).
pub fn database_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    if let Ok(path) = env::var(DB_ENV_VAR) {
        return PathBuf::from(path);
    }

    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR).join(DB_FILE),
        None => PathBuf::from(DB_FILE),
    }
}
