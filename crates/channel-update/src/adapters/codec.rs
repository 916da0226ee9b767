//! # External Codec Tool Adapter
//!
//! Wraps the `configtxlator`-equivalent binary behind the [`ConfigCodec`]
//! port. The tool is driven over stdin/stdout with stderr captured; a
//! nonzero exit, unparseable output, or a blown wall-clock budget all map
//! to [`CodecError`] rather than leaking shell output to callers.

use crate::ports::outbound::{CodecError, ConfigCodec};
use serde_json::Value;
use shared_types::{ChannelName, MessageType};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Default wall-clock budget per codec invocation.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-spawning codec client.
pub struct ConfigtxlatorCodec {
    tool: PathBuf,
    timeout: Duration,
}

impl ConfigtxlatorCodec {
    /// Wrap the tool at the given path with the default timeout.
    pub fn new<P: AsRef<Path>>(tool: P) -> Self {
        Self {
            tool: tool.as_ref().to_path_buf(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.tool);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Run one tool invocation, feeding `input` to stdin and returning
    /// stdout on a zero exit.
    async fn run(
        &self,
        mut command: Command,
        input: Option<&[u8]>,
        operation: &str,
    ) -> Result<Vec<u8>, CodecError> {
        let tool = self.tool.display().to_string();
        debug!("[channel-update] codec {operation} via `{tool}`");

        let mut child = command.spawn().map_err(|e| CodecError::Spawn {
            tool: tool.clone(),
            reason: e.to_string(),
        })?;

        if let Some(bytes) = input {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(bytes).await.map_err(|e| CodecError::Io {
                    path: tool.clone(),
                    reason: format!("writing tool stdin: {e}"),
                })?;
                // closing stdin lets the tool see EOF and finish
            }
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| CodecError::Timeout {
                operation: operation.to_string(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| CodecError::Io {
                path: tool,
                reason: format!("reaping tool process: {e}"),
            })?;

        if !output.status.success() {
            return Err(CodecError::ToolFailed {
                operation: operation.to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait::async_trait]
impl ConfigCodec for ConfigtxlatorCodec {
    async fn decode(&self, binary: &[u8], message_type: MessageType) -> Result<Value, CodecError> {
        let operation = format!("decode {message_type}");
        let mut command = self.command();
        command
            .arg("proto_decode")
            .arg("--type")
            .arg(message_type.proto_name());

        let stdout = self.run(command, Some(binary), &operation).await?;
        serde_json::from_slice(&stdout).map_err(|e| CodecError::MalformedOutput {
            operation,
            reason: e.to_string(),
        })
    }

    async fn encode(&self, tree: &Value, message_type: MessageType) -> Result<Vec<u8>, CodecError> {
        let operation = format!("encode {message_type}");
        let input = serde_json::to_vec(tree).map_err(|e| CodecError::MalformedOutput {
            operation: operation.clone(),
            reason: format!("serializing input tree: {e}"),
        })?;

        let mut command = self.command();
        command
            .arg("proto_encode")
            .arg("--type")
            .arg(message_type.proto_name());

        self.run(command, Some(&input), &operation).await
    }

    async fn compute_update(
        &self,
        original: &[u8],
        modified: &[u8],
        channel: &ChannelName,
    ) -> Result<Vec<u8>, CodecError> {
        let operation = "compute_update".to_string();

        // The tool takes the two configs as files, not stdin.
        let scratch = tempfile::tempdir().map_err(|e| CodecError::Io {
            path: "<tempdir>".to_string(),
            reason: e.to_string(),
        })?;
        let original_path = scratch.path().join("original.pb");
        let modified_path = scratch.path().join("updated.pb");
        for (path, bytes) in [(&original_path, original), (&modified_path, modified)] {
            tokio::fs::write(path, bytes).await.map_err(|e| CodecError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let mut command = self.command();
        command
            .arg("compute_update")
            .arg("--channel_id")
            .arg(channel.as_str())
            .arg("--original")
            .arg(&original_path)
            .arg("--updated")
            .arg(&modified_path);

        self.run(command, None, &operation).await
    }
}
