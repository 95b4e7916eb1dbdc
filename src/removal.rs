//! Removal executor
//!
//! Drives the OS-level uninstall for each record marked for removal.
//! Strictly sequential: one attempt per record, waiting for each invocation
//! to fully exit, with a settling delay between invocations - platform
//! uninstallers commonly serialize on a global installer mutex and
//! overlapping runs can deadlock or corrupt shared installer state. No
//! automatic retry.

use std::process::Command;
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use regex::Regex;

use crate::record::InstallationRecord;

/// Exit code meaning "succeeded, reboot required".
const EXIT_REBOOT_REQUIRED: i32 = 3010;

/// Argument tokens recognized as already-silent, lowercased.
const SILENT_FLAGS: &[&str] = &[
    "/s", "/silent", "/verysilent", "/quiet", "/q", "/qn", "-s", "-q", "--silent", "--quiet",
];

/// Conservative silent/no-restart flags appended to executable-style
/// commands that carry no recognized silent flag.
const APPENDED_FLAGS: &[&str] = &["/quiet", "/norestart"];

static MSI_PRODUCT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}")
        .expect("static pattern")
});

/// The concrete invocation constructed from a record's uninstall command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallInvocation {
    /// Installer-service uninstall of a product GUID, quiet and no-restart.
    Msi { product_code: String },
    /// Direct executable invocation with its argument tail.
    Executable { program: String, args: Vec<String> },
}

impl UninstallInvocation {
    /// Classify an uninstall command line and construct the invocation.
    ///
    /// Commands containing an installer-service token with an extractable
    /// product GUID become quiet GUID uninstalls; everything else is split
    /// into program and argument tail, with conservative silent flags
    /// appended when the tail has none.
    pub fn from_command(command: &str) -> Self {
        let is_msi = command.to_lowercase().contains("msiexec");
        if is_msi {
            if let Some(code) = MSI_PRODUCT_CODE.find(command) {
                return UninstallInvocation::Msi {
                    product_code: code.as_str().to_string(),
                };
            }
        }

        let (program, mut args) = split_command(command);
        if !has_silent_flag(&args) {
            args.extend(APPENDED_FLAGS.iter().map(|f| (*f).to_string()));
        }
        UninstallInvocation::Executable { program, args }
    }

    /// The program and argument list actually spawned.
    pub fn command_line(&self) -> (String, Vec<String>) {
        match self {
            UninstallInvocation::Msi { product_code } => (
                "msiexec".to_string(),
                vec![
                    "/x".to_string(),
                    product_code.clone(),
                    "/qn".to_string(),
                    "/norestart".to_string(),
                ],
            ),
            UninstallInvocation::Executable { program, args } => (program.clone(), args.clone()),
        }
    }
}

/// Split a command line into program and argument tail, honoring a quoted
/// program path.
fn split_command(command: &str) -> (String, Vec<String>) {
    let trimmed = command.trim();
    if let Some(rest) = trimmed.strip_prefix('"') {
        if let Some(end) = rest.find('"') {
            let program = rest[..end].to_string();
            let args = rest[end + 1..]
                .split_whitespace()
                .map(String::from)
                .collect();
            return (program, args);
        }
    }
    let mut parts = trimmed.split_whitespace();
    let program = parts.next().unwrap_or_default().to_string();
    (program, parts.map(String::from).collect())
}

fn has_silent_flag(args: &[String]) -> bool {
    args.iter()
        .any(|a| SILENT_FLAGS.contains(&a.to_lowercase().as_str()))
}

/// Per-record removal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(i32),
    Errored(String),
}

/// One record's removal attempt and its outcome.
#[derive(Debug)]
pub struct RemovalResult {
    pub record: InstallationRecord,
    pub outcome: Outcome,
}

/// Spawns an uninstall process and waits for its exit code.
///
/// A trait seam so the executor is testable without mutating the machine.
pub trait UninstallInvoker {
    fn invoke(&self, program: &str, args: &[String]) -> std::io::Result<i32>;
}

/// Real process invoker.
#[derive(Debug, Default)]
pub struct ProcessInvoker;

impl UninstallInvoker for ProcessInvoker {
    fn invoke(&self, program: &str, args: &[String]) -> std::io::Result<i32> {
        let status = Command::new(program).args(args).status()?;
        // Killed-by-signal has no code; surface it as a generic failure
        Ok(status.code().unwrap_or(-1))
    }
}

/// Sequential removal executor.
pub struct RemovalExecutor<'a> {
    invoker: &'a dyn UninstallInvoker,
    settle_delay: Duration,
}

impl<'a> RemovalExecutor<'a> {
    pub fn new(invoker: &'a dyn UninstallInvoker, settle_delay: Duration) -> Self {
        Self {
            invoker,
            settle_delay,
        }
    }

    /// Attempt one record's uninstall. Exactly one attempt, no retry.
    pub fn remove(&self, record: &InstallationRecord) -> Outcome {
        let invocation = UninstallInvocation::from_command(&record.uninstall_command);
        let (program, args) = invocation.command_line();
        match self.invoker.invoke(&program, &args) {
            Ok(0) | Ok(EXIT_REBOOT_REQUIRED) => Outcome::Succeeded,
            Ok(code) => Outcome::Failed(code),
            Err(e) => Outcome::Errored(e.to_string()),
        }
    }

    /// Remove records one at a time, in order, waiting for each invocation
    /// to exit and settling between invocations. A failed record does not
    /// stop processing of subsequent records.
    pub fn execute(
        &self,
        records: &[InstallationRecord],
        mut observer: impl FnMut(&InstallationRecord, &Outcome),
    ) -> Vec<RemovalResult> {
        let mut results = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if i > 0 && !self.settle_delay.is_zero() {
                thread::sleep(self.settle_delay);
            }
            let outcome = self.remove(record);
            observer(record, &outcome);
            results.push(RemovalResult {
                record: record.clone(),
                outcome,
            });
        }
        results
    }
}
