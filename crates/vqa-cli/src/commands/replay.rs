//! Replays a recorded event log through the streaming pipeline.
//!
//! Each non-blank line of the log is one JSON object:
//!
//! ```text
//! {"prompt": "what happens at 2:10?"}
//! {"event": "stream_chunk", "payload": {"chunk": "A dog", "msg_type": "text"}}
//! {"reconnect": true}
//! ```
//!
//! Lines starting with `#` are comments. Prompts go through the chat
//! service, events through the session driver, so the printed transcript is
//! exactly what a live client would have rendered.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use vqa_application::ChatContext;
use vqa_core::channel::{OutboundMessage, PushChannel};
use vqa_core::chat::{Block, MessageRole, Transcript};
use vqa_core::config::RootConfig;
use vqa_core::error::Result as ChatResult;
use vqa_infrastructure::{InMemoryChatStateRepository, InMemoryHistoryRepository};

pub struct ReplayOptions {
    pub session: Option<String>,
    pub group: Option<String>,
    pub json: bool,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    Prompt {
        prompt: String,
    },
    Event {
        event: String,
        #[serde(default)]
        payload: Value,
    },
    Reconnect {
        reconnect: bool,
    },
}

/// Parses one log line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ReplayStep>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let step = serde_json::from_str(line).context("Expected a prompt, event or reconnect object")?;
    Ok(Some(step))
}

/// Outbound channel that only logs; there is no server to answer.
struct LoggingChannel;

#[async_trait]
impl PushChannel for LoggingChannel {
    async fn emit(&self, event_name: &str, message: &OutboundMessage) -> ChatResult<()> {
        tracing::info!(
            "[Replay] Would emit '{}' (session: {:?}, group: {:?}): {}",
            event_name,
            message.session_id,
            message.group_id,
            message.text
        );
        Ok(())
    }
}

pub async fn run(config: RootConfig, file: &Path, options: ReplayOptions) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let ctx = ChatContext::new(
        config,
        Arc::new(InMemoryChatStateRepository::new()),
        Arc::new(InMemoryHistoryRepository::new()),
        Arc::new(LoggingChannel),
    );
    let service = ctx.chat_service();
    if let Some(group) = options.group {
        service.set_current_group(Some(group)).await?;
    }
    if let Some(session) = &options.session {
        ctx.store().assign_session_id(session).await?;
    }

    let (handle, driver) = ctx.start_session();

    let mut steps = 0usize;
    for (index, line) in content.lines().enumerate() {
        let step = match parse_line(line) {
            Ok(Some(step)) => step,
            Ok(None) => continue,
            Err(e) => bail!("{}:{}: {:#}", file.display(), index + 1, e),
        };
        steps += 1;

        match step {
            ReplayStep::Prompt { prompt } => {
                // Prompts are ordered after every event already read.
                handle.settle().await?;
                service.submit_prompt(&prompt).await?;
            }
            ReplayStep::Event { event, payload } => handle.deliver(event, payload).await?,
            ReplayStep::Reconnect { reconnect: true } => handle.reconnected().await?,
            ReplayStep::Reconnect { reconnect: false } => {}
        }
    }

    handle.settle().await?;
    drop(handle);
    let session = driver.await.context("Session driver panicked")?;
    tracing::debug!("[Replay] Applied {} steps; final state {:?}", steps, session.state());

    let snapshot = ctx.store().snapshot().await;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.transcript)?);
        return Ok(());
    }

    print!("{}", render_transcript(&snapshot.transcript));
    println!(
        "{} {}",
        "session:".dimmed(),
        snapshot.session.session_id.as_deref().unwrap_or("(new chat)")
    );
    if let Some(status) = snapshot.session.thinking_status {
        println!("{} {}", "still thinking:".yellow(), status);
    }
    if let Some(error) = snapshot.last_error {
        println!("{} {}", "error:".red().bold(), error);
    }
    Ok(())
}

pub fn render_transcript(transcript: &Transcript) -> String {
    let mut out = String::new();
    for turn in transcript.turns() {
        let role = match turn.role() {
            MessageRole::User => turn.role().as_str().green().bold(),
            MessageRole::Assistant => turn.role().as_str().cyan().bold(),
            MessageRole::System => turn.role().as_str().magenta().bold(),
        };
        out.push_str(&format!("{} {}\n", role, turn.timestamp().dimmed()));
        for block in turn.blocks() {
            match block {
                Block::Text { .. } => {
                    for line in block.as_plain_text().lines() {
                        out.push_str(&format!("  {}\n", line));
                    }
                }
                Block::Image { .. } | Block::Video { .. } => {
                    let label = format!("[{}]", block.kind());
                    for url in block.as_plain_text().lines() {
                        out.push_str(&format!("  {} {}\n", label.blue(), url));
                    }
                }
            }
        }
        out.push('\n');
    }
    out
}
