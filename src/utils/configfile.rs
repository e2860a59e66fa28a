use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;


/// `file` in the directory of the running executable.
pub fn nearby(file: &str) -> Result<PathBuf, ConfigError> {
    let current_exe = std::env::current_exe().map_err(ConfigError::Executable)?;
    let dir = current_exe.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(dir.join(file))
}


/// A JSON settings file; written with defaults on first use.
pub struct ConfigFile<C> {
    path: PathBuf,
    data: C,
}

impl<C: Serialize + DeserializeOwned + Default> ConfigFile<C> {

    /// Returns the file and whether it was just created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<(Self, bool), ConfigError> {
        let path = path.as_ref();
        let (data, created) = Self::load(path)?;
        Ok(
            (Self { path: path.to_path_buf(), data }, created)
        )
    }

    pub fn new_nearby(file: &str) -> Result<(Self, bool), ConfigError> {
        let path = nearby(file)?;
        Self::new(path)
    }

    fn load(file: &Path) -> Result<(C, bool), ConfigError> {
        let io_err = |source: io::Error| ConfigError::Io { path: file.to_path_buf(), source };
        let json_err = |source: serde_json::Error| ConfigError::Json { path: file.to_path_buf(), source };
        match File::open(file) {
            Ok(ifile) => serde_json::from_reader(io::BufReader::new(ifile))
                .map(|data| (data, false))
                .map_err(json_err),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = C::default();
                if let Some(dir) = file.parent() {
                    std::fs::create_dir_all(dir).map_err(io_err)?;
                }
                let ofile = File::create(file).map_err(io_err)?;
                serde_json::to_writer_pretty(ofile, &config).map_err(json_err)?;
                tracing::info!("default config written @{:?}", file);
                Ok((config, true))
            }
            Err(e) => Err(io_err(e)),
        }
    }
}

impl<C> ConfigFile<C> {

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn data(&self) -> &C {
        &self.data
    }

    pub fn into_data(self) -> C {
        self.data
    }
}
