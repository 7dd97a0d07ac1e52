use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const LOG_DIR: &str = "logs";

/// Appends a message to a log file under `logs/`, stamped with the local
/// wall-clock time. The file and directory are created on first use.
pub fn log_to_file(filename: &str, message: &str) -> io::Result<()> {
    if !Path::new(LOG_DIR).exists() {
        std::fs::create_dir_all(LOG_DIR)?;
    }

    let path = format!("{}/{}", LOG_DIR, filename);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    writeln!(file, "[{}] {}", timestamp, message)?;
    file.flush()?;

    Ok(())
}

/// Appends one row to a CSV file under `logs/`, writing the header row only
/// when the file is new.
pub fn log_csv(filename: &str, headers: &[&str], data: &[&str]) -> io::Result<()> {
    if !Path::new(LOG_DIR).exists() {
        std::fs::create_dir_all(LOG_DIR)?;
    }

    let path = format!("{}/{}", LOG_DIR, filename);
    let file_exists = Path::new(&path).exists();

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if !file_exists && !headers.is_empty() {
        writeln!(file, "{}", headers.join(","))?;
    }

    writeln!(file, "{}", data.join(","))?;
    file.flush()?;

    Ok(())
}
