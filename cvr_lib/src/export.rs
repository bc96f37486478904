//! Boundary to the browser-driven document export.
//!
//! The browser session itself lives outside this crate. An [`ExportTrigger`]
//! asks it to download the registry printout for a company, then
//! [`DocumentExporter`] waits for the finished file to show up in the
//! download directory.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::ExportSettings;
use crate::error::CvrError;
use crate::model::CvrNumber;

/// Suffixes browsers use for downloads still in progress.
const PARTIAL_SUFFIXES: &[&str] = &[".crdownload", ".part", ".tmp"];

/// Shortest pause between two scans of the download directory.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A downloaded registry document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub file_path: PathBuf,
}

/// Starts a document download for one company into `download_dir`.
pub trait ExportTrigger {
    fn trigger(
        &mut self,
        cvr: CvrNumber,
        download_dir: &Path,
    ) -> impl Future<Output = Result<(), CvrError>> + Send;
}

/// Runs an external command that drives the browser session.
///
/// The CVR number is appended as the last argument. `CVR_NUMBER` and
/// `CVR_EXPORT_DIR` are also set in the child's environment.
#[derive(Debug, Clone)]
pub struct CommandTrigger {
    program: String,
    args: Vec<String>,
}

impl CommandTrigger {
    /// Splits a command line on whitespace. No shell quoting is applied.
    pub fn from_command_line(command: &str) -> Result<Self, CvrError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| CvrError::InvalidInput("export command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl ExportTrigger for CommandTrigger {
    fn trigger(
        &mut self,
        cvr: CvrNumber,
        download_dir: &Path,
    ) -> impl Future<Output = Result<(), CvrError>> + Send {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .arg(cvr.to_string())
            .env("CVR_NUMBER", cvr.to_string())
            .env("CVR_EXPORT_DIR", download_dir)
            .kill_on_drop(true);
        let program = self.program.clone();

        async move {
            tracing::debug!("Running export command {} for {}", program, cvr);
            let output = command.output().await.map_err(|e| {
                CvrError::ExportFailed(format!("could not run '{}': {}", program, e))
            })?;
            if output.status.success() {
                Ok(())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::error!("Export command exited with {}: {}", output.status, stderr.trim());
                Err(CvrError::ExportFailed(format!(
                    "'{}' exited with {}",
                    program, output.status
                )))
            }
        }
    }
}

/// Owns one export session and serializes exports through it.
pub struct DocumentExporter<T> {
    session: Mutex<T>,
    settings: ExportSettings,
}

impl<T: ExportTrigger + Send> DocumentExporter<T> {
    pub fn new(trigger: T, settings: ExportSettings) -> Self {
        Self {
            session: Mutex::new(trigger),
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Name prefix of the file the export for `cvr` produces.
    pub fn expected_prefix(&self, cvr: CvrNumber) -> String {
        format!("{}{}", self.settings.file_prefix, cvr)
    }

    /// Triggers an export and waits for the downloaded file.
    ///
    /// Fails with `NotFound` if the download directory does not exist,
    /// `ExportFailed` if the trigger fails, and `Timeout` if no finished
    /// file appears before the configured deadline. The deadline covers the
    /// trigger as well as the wait.
    pub async fn export_document(&self, cvr: CvrNumber) -> Result<ExportedFile, CvrError> {
        let dir = &self.settings.download_dir;
        if !tokio::fs::try_exists(dir).await? {
            return Err(CvrError::NotFound(format!(
                "download directory {} does not exist",
                dir.display()
            )));
        }

        let mut session = self.session.lock().await;
        let deadline = deadline_after(self.settings.timeout)?;
        let existing = list_files(dir).await?;

        tokio::time::timeout_at(deadline, session.trigger(cvr, dir))
            .await
            .map_err(|_| timeout_error(cvr, self.settings.timeout))??;

        let prefix = self.expected_prefix(cvr);
        let file = wait_until(dir, &prefix, &existing, deadline, self.settings.poll_interval)
            .await?
            .ok_or_else(|| timeout_error(cvr, self.settings.timeout))?;
        tracing::info!("Exported {} to {}", cvr, file.file_path.display());
        Ok(file)
    }
}

/// `now + timeout`, or `InvalidInput` when the deadline cannot be represented.
fn deadline_after(timeout: Duration) -> Result<Instant, CvrError> {
    Instant::now().checked_add(timeout).ok_or_else(|| {
        CvrError::InvalidInput(format!("export timeout of {}s is too large", timeout.as_secs()))
    })
}

fn timeout_error(cvr: CvrNumber, timeout: Duration) -> CvrError {
    CvrError::Timeout(format!(
        "export of {} did not finish within {}s",
        cvr,
        timeout.as_secs()
    ))
}

fn is_partial(file_name: &str) -> bool {
    PARTIAL_SUFFIXES.iter().any(|suffix| file_name.ends_with(suffix))
}

/// Names of the regular files currently in `dir`.
pub async fn list_files(dir: &Path) -> Result<HashSet<String>, CvrError> {
    let mut names = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                names.insert(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Polls `dir` until a finished file named `prefix*` that is not in
/// `existing` appears, or `timeout` elapses.
pub async fn wait_for_download(
    dir: &Path,
    prefix: &str,
    existing: &HashSet<String>,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<ExportedFile, CvrError> {
    wait_until(dir, prefix, existing, deadline_after(timeout)?, poll_interval)
        .await?
        .ok_or_else(|| {
            CvrError::Timeout(format!(
                "no file starting with '{}' appeared in {} within {}s",
                prefix,
                dir.display(),
                timeout.as_secs()
            ))
        })
}

async fn wait_until(
    dir: &Path,
    prefix: &str,
    existing: &HashSet<String>,
    deadline: Instant,
    poll_interval: Duration,
) -> Result<Option<ExportedFile>, CvrError> {
    let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
    loop {
        let mut found: Vec<String> = list_files(dir)
            .await?
            .into_iter()
            .filter(|name| name.starts_with(prefix) && !is_partial(name) && !existing.contains(name))
            .collect();
        if !found.is_empty() {
            found.sort();
            let file_name = found.swap_remove(0);
            return Ok(Some(ExportedFile {
                file_path: dir.join(&file_name),
                file_name,
            }));
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(poll_interval.min(deadline - now)).await;
    }
}
