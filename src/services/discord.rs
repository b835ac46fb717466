//! Discord-backed message delivery
//!
//! Sends through the serenity HTTP client, splitting long texts at the
//! 2000-character message limit (UTF-8 safe, preferring line boundaries).

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::{ChannelId, UserId};
use std::sync::Arc;

use super::{DeliveryTarget, Notifier};

/// Discord message content limit.
const MESSAGE_LIMIT: usize = 2000;

pub struct DiscordNotifier {
    http: Arc<Http>,
}

impl DiscordNotifier {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    async fn send_to_channel(&self, channel: ChannelId, chunk: &str) -> Result<()> {
        channel
            .send_message(&self.http, |m| m.content(chunk))
            .await
            .with_context(|| format!("failed to deliver to channel {channel}"))?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, target: DeliveryTarget, text: &str) -> Result<()> {
        for chunk in chunk_message(text) {
            match target {
                DeliveryTarget::Channel(id) => {
                    self.send_to_channel(ChannelId(id), &chunk).await?;
                }
                DeliveryTarget::User(id) => {
                    let dm = UserId(id)
                        .create_dm_channel(self.http.as_ref())
                        .await
                        .with_context(|| format!("failed to open DM with user {id}"))?;
                    self.send_to_channel(dm.id, &chunk).await?;
                }
            }
        }
        Ok(())
    }
}

/// Split text into message-sized chunks, preferring line boundaries and
/// never splitting inside a UTF-8 character.
fn chunk_message(text: &str) -> Vec<String> {
    if text.len() <= MESSAGE_LIMIT {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if current.len() + line.len() + 1 > MESSAGE_LIMIT {
            if !current.is_empty() {
                chunks.push(current.trim_end().to_string());
                current = String::new();
            }
            if line.len() + 1 > MESSAGE_LIMIT {
                chunks.extend(chunk_long_line(line));
                continue;
            }
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.is_empty() {
        chunks.push(current.trim_end().to_string());
    }
    chunks
}

fn chunk_long_line(line: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in line.chars() {
        if current.len() + ch.len_utf8() > MESSAGE_LIMIT && !current.is_empty() {
            chunks.push(current);
            current = String::new();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
