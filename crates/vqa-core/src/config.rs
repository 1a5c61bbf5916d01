//! Configuration model.
//!
//! Mirrors `config.toml`. Every section and field has a default so a partial
//! or missing file still yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RootConfig {
    /// Rejects values that parse but cannot drive a client.
    pub fn validate(&self) -> Result<()> {
        let channel = &self.channel;
        if channel.event_buffer == 0 {
            return Err(ChatError::config("channel.event_buffer must be at least 1"));
        }

        let inbound = [
            ("status_event", &channel.status_event),
            ("thinking_event", &channel.thinking_event),
            ("chunk_event", &channel.chunk_event),
            ("end_event", &channel.end_event),
            ("error_event", &channel.error_event),
        ];
        for (i, (field, name)) in inbound.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ChatError::config(format!("channel.{} is empty", field)));
            }
            if let Some((other, _)) = inbound[..i].iter().find(|(_, n)| n == name) {
                return Err(ChatError::config(format!(
                    "channel.{} and channel.{} both use '{}'",
                    other, field, name
                )));
            }
        }
        if channel.outbound_event.trim().is_empty() {
            return Err(ChatError::config("channel.outbound_event is empty"));
        }

        if self.history.timeout_secs == 0 {
            return Err(ChatError::config("history.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Wire event names used by the push channel, plus the inbound queue size.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    /// Server acknowledgement carrying the conversation id.
    pub status_event: String,
    /// Transient progress notice ("AI is thinking...").
    pub thinking_event: String,
    /// Content chunk.
    pub chunk_event: String,
    /// End of one assistant response.
    pub end_event: String,
    /// Server-side generation failure.
    pub error_event: String,
    /// Outbound user prompt.
    pub outbound_event: String,
    /// Capacity of the per-session inbound event queue.
    pub event_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            status_event: "message_received".to_string(),
            thinking_event: "stream_thinking".to_string(),
            chunk_event: "stream_chunk".to_string(),
            end_event: "stream_end".to_string(),
            error_event: "error".to_string(),
            outbound_event: "stream_chat".to_string(),
            event_buffer: 256,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Base URL of the chat history API.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.channel.chunk_event, "stream_chunk");
        assert_eq!(config.channel.event_buffer, 256);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
            [channel]
            chunk_event = "chunk"

            [logging]
            level = "vqa_application=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.channel.chunk_event, "chunk");
        assert_eq!(config.channel.end_event, "stream_end");
        assert_eq!(config.history, HistoryConfig::default());
        assert_eq!(config.logging.level, "vqa_application=debug");
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(RootConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut config = RootConfig::default();
        config.channel.event_buffer = 0;
        assert!(config.validate().unwrap_err().is_config());

        let mut config = RootConfig::default();
        config.channel.end_event = config.channel.chunk_event.clone();
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("chunk_event and channel.end_event"));

        let mut config = RootConfig::default();
        config.channel.outbound_event = " ".to_string();
        assert!(config.validate().unwrap_err().is_config());

        let mut config = RootConfig::default();
        config.history.timeout_secs = 0;
        assert!(config.validate().unwrap_err().is_config());
    }
}
