//! A transport driving BlueZ `gatttool`, one process per operation.
//!
//! Each call spawns `gatttool` in non-interactive mode, waits for it and parses
//! its free-text output. A binary that cannot be spawned is a transport error;
//! a non-zero exit status is only an error during service discovery.

use std::process::Stdio;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use glizzy_common::config::Target;
use glizzy_common::error::{FuzzError, Result};
use glizzy_common::gatt::{CharacteristicDescriptor, Handle, ServiceRange};
use glizzy_core::transport::{ResponseMarkers, Transport, WriteResponse};
use regex::Regex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{Instant, timeout_at};
use tracing::debug;

const DEFAULT_PROGRAM: &str = "gatttool";

const MARKERS: ResponseMarkers = ResponseMarkers {
    confirmed: "was written successfully",
    length_rejected: "invalid",
};

static SERVICE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"attr handle = (0x[0-9a-fA-F]+), end grp handle = (0x[0-9a-fA-F]+) uuid: ([0-9a-fA-F-]+)")
        .expect("service pattern is valid")
});

static CHARACTERISTIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"handle: (0x[0-9a-fA-F]+), char properties: (0x[0-9a-fA-F]+), char value handle: (0x[0-9a-fA-F]+), uuid: ([0-9a-fA-F-]+)",
    )
    .expect("characteristic pattern is valid")
});

static READ_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Characteristic value/descriptor:\s*(.*)").expect("read pattern is valid")
});

pub struct GattTool {
    target: Target,
    program: String,
}

impl GattTool {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Uses another binary with the same command line, e.g. a wrapper script.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(format!("--addr-type={}", self.target.address_type))
            .arg(format!("--device={}", self.target.address))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        // Own process group: a terminal Ctrl-C must reach glizzy only, so
        // the call in flight finishes and is recorded.
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }

    async fn run(&self, args: &[String]) -> Result<(i32, String, String)> {
        let output = self
            .command()
            .args(args)
            .output()
            .await
            .map_err(|e| FuzzError::Transport(format!("could not run {}: {e}", self.program)))?;

        let code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(?args, code, "gatttool finished");
        Ok((code, stdout, stderr))
    }
}

#[async_trait]
impl Transport for GattTool {
    fn markers(&self) -> ResponseMarkers {
        MARKERS
    }

    async fn discover_primary_services(&self) -> Result<Vec<ServiceRange>> {
        let (code, stdout, _) = self
            .run(&["--primary".to_string()])
            .await
            .map_err(|e| FuzzError::Discovery(e.to_string()))?;

        if code != 0 {
            return Err(FuzzError::Discovery(format!(
                "{} --primary exited with status {code}",
                self.program
            )));
        }
        Ok(parse_primary_services(&stdout))
    }

    async fn discover_characteristic_descriptors(&self) -> Result<Vec<CharacteristicDescriptor>> {
        let (code, stdout, _) = self.run(&["--characteristics".to_string()]).await?;
        if code != 0 {
            return Err(FuzzError::Transport(format!(
                "{} --characteristics exited with status {code}",
                self.program
            )));
        }
        Ok(parse_characteristics(&stdout))
    }

    async fn write(&self, handle: Handle, payload: &str) -> Result<WriteResponse> {
        let args = [
            "--char-write-req".to_string(),
            format!("--handle={handle}"),
            format!("--value={payload}"),
        ];
        let (code, stdout, stderr) = self.run(&args).await?;
        let text = format!("{stdout}{stderr}").trim().to_string();
        Ok(WriteResponse::new(code, text))
    }

    async fn read(&self, handle: Handle) -> Result<String> {
        let args = ["--char-read".to_string(), format!("--handle={handle}")];
        let (_, stdout, _) = self.run(&args).await?;
        Ok(parse_read_value(&stdout))
    }

    async fn listen_for_notification(&self, timeout: Duration) -> Result<Option<String>> {
        let mut child = self
            .command()
            .arg("--listen")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| FuzzError::Transport(format!("could not run {}: {e}", self.program)))?;

        let Some(stdout) = child.stdout.take() else {
            return Ok(None);
        };

        let deadline = Instant::now() + timeout;
        let mut lines = BufReader::new(stdout).lines();
        let mut received: Vec<String> = Vec::new();

        while let Ok(Ok(Some(line))) = timeout_at(deadline, lines.next_line()).await {
            if is_notification(&line) {
                received.push(line.trim().to_string());
            }
        }

        if let Err(e) = child.kill().await {
            debug!("stopping listener failed: {e}");
        }
        Ok((!received.is_empty()).then(|| received.join("; ")))
    }
}

pub fn parse_primary_services(text: &str) -> Vec<ServiceRange> {
    text.lines()
        .filter_map(|line| SERVICE_LINE.captures(line))
        .filter_map(|caps| {
            let start: Handle = caps[1].parse().ok()?;
            let end: Handle = caps[2].parse().ok()?;
            Some(ServiceRange::new(start, end, caps[3].to_ascii_lowercase()))
        })
        .collect()
}

pub fn parse_characteristics(text: &str) -> Vec<CharacteristicDescriptor> {
    text.lines()
        .filter_map(|line| CHARACTERISTIC_LINE.captures(line))
        .filter_map(|caps| {
            let properties = u8::from_str_radix(caps[2].trim_start_matches("0x"), 16).ok()?;
            Some(CharacteristicDescriptor {
                handle: caps[1].parse().ok()?,
                properties,
                value_handle: caps[3].parse().ok()?,
                uuid: caps[4].to_ascii_lowercase(),
            })
        })
        .collect()
}

/// Strips the `Characteristic value/descriptor:` label when present.
pub fn parse_read_value(text: &str) -> String {
    match READ_VALUE.captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.trim().to_string(),
    }
}

fn is_notification(line: &str) -> bool {
    line.contains("Notification") || line.contains("Indication")
}
