// src/settings/io.rs

use bevy::log::{error, info};
use directories_next::ProjectDirs;
use std::fs;
use std::io::{self, BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use super::ConsoleSettings;

const QUALIFIER: &str = "club";
const ORGANIZATION: &str = "Hunch";
const APPLICATION: &str = "HunchAdmin";
const CONFIG_FILE: &str = "console_settings.json";

fn config_path() -> io::Result<PathBuf> {
    let proj_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        io::Error::new(ErrorKind::NotFound, "Could not determine project directories for console settings.")
    })?;
    let config_dir = proj_dirs.config_dir();
    fs::create_dir_all(config_dir)?;
    Ok(config_dir.join(CONFIG_FILE))
}

pub fn load_settings() -> io::Result<ConsoleSettings> {
    load_settings_from(&config_path()?)
}

pub fn save_settings(settings: &ConsoleSettings) -> io::Result<()> {
    save_settings_to(&config_path()?, settings)
}

/// Missing file means defaults; a file that does not parse is an error.
pub fn load_settings_from(path: &Path) -> io::Result<ConsoleSettings> {
    match fs::File::open(path) {
        Ok(file) => serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            error!("ConsoleSettings: Failed to parse {:?}: {}", path, e);
            io::Error::new(ErrorKind::InvalidData, format!("Failed to parse settings file: {}", e))
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("ConsoleSettings: {:?} not found. Using defaults.", path);
            Ok(ConsoleSettings::default())
        }
        Err(e) => {
            error!("ConsoleSettings: Failed to open {:?}: {}", path, e);
            Err(e)
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &ConsoleSettings) -> io::Result<()> {
    let writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(writer, settings).map_err(|e| {
        error!("ConsoleSettings: Failed to write {:?}: {}", path, e);
        io::Error::other(e)
    })
}
