use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::{
    backup::{BackupError, FileTransport, ShareOutcome},
    storage::json_backend::{tmp_path, write_atomic},
    time::{Clock, SystemClock},
};

/// Writes backups as `backup_<millis>.json` files into a directory.
///
/// There is no share sheet on the desktop, so sharing always reports unavailable. The
/// file to import is chosen up front with [`FsTransport::with_import_path`]; without one
/// every pick counts as cancelled.
pub struct FsTransport {
    dir: PathBuf,
    import_path: Option<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl FsTransport {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            import_path: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_import_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_path = Some(path.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileTransport for FsTransport {
    fn write(&self, blob: &str) -> Result<String, BackupError> {
        let file_name = format!("backup_{}.json", self.clock.now().timestamp_millis());
        let path = self.dir.join(file_name);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, blob)
            .and_then(|_| fs::rename(&tmp, &path).map_err(Into::into))
            .map_err(|err| BackupError::Transport(err.to_string()))?;
        Ok(path.display().to_string())
    }

    fn share(&self, locator: &str) -> Result<ShareOutcome, BackupError> {
        debug!(locator, "no share target on this platform");
        Ok(ShareOutcome::Unavailable)
    }

    fn pick_file_for_import(&self) -> Result<Option<String>, BackupError> {
        let Some(path) = &self.import_path else {
            return Ok(None);
        };
        fs::read_to_string(path)
            .map(Some)
            .map_err(|err| BackupError::Transport(format!("{}: {}", path.display(), err)))
    }
}
