use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub const SHARE_FALLBACK_NOTICE: &str =
    "Tu dispositivo no soporta compartir. Copiá el texto manualmente.";

/// A native share capability, if the platform has one.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    fn is_available(&self) -> bool;
    async fn share(&self, title: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// No share capability; the user gets the text to copy by hand.
    Fallback { notice: &'static str, text: String },
}

/// Used when nothing is configured.
pub struct NoShare;

#[async_trait]
impl ShareTarget for NoShare {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _title: &str, _text: &str) -> Result<()> {
        anyhow::bail!("Sharing is not available")
    }
}

/// Pipes the shared text into an external program, e.g. `wl-copy` or `xclip -selection clipboard`.
pub struct CommandShare {
    program: String,
    args: Vec<String>,
}

impl CommandShare {
    pub fn new(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl ShareTarget for CommandShare {
    fn is_available(&self) -> bool {
        true
    }

    async fn share(&self, title: &str, text: &str) -> Result<()> {
        tracing::info!("Sharing {:?} through {}", title, self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::piped())
            .spawn()
            .with_context(|| format!("Starting share command {}", self.program))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }
        let status = child.wait().await?;
        ensure!(status.success(), "Share command exited with {status}");
        Ok(())
    }
}

/// Share through `target`, or fall back to handing the text back.
pub async fn share_or_fallback(
    target: &dyn ShareTarget,
    title: &str,
    text: String,
) -> Result<ShareOutcome> {
    if !target.is_available() {
        return Ok(ShareOutcome::Fallback {
            notice: SHARE_FALLBACK_NOTICE,
            text,
        });
    }
    target.share(title, &text).await?;
    Ok(ShareOutcome::Shared)
}
