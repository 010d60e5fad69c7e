//! Context manager: distributes a token budget across registered
//! providers and assembles their parts into a single map.

use std::collections::HashMap;

use crate::error::ManagerError;
use crate::providers::{AssemblyContext, ChatProvider, Message, SeedableChatHistory};
use crate::registry::Registry;

/// Drives a [`Registry`] of providers: budget distribution, uniform
/// assembly, and the narrow cross-cutting operations (`ClearContext`,
/// `SeedChatHistory`) that need to reach into one specific provider by
/// capability rather than iterate all of them uniformly.
pub struct ContextManager {
    registry: Registry,
}

impl ContextManager {
    /// Wrap a registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Distribute `total` tokens across providers proportional to their
    /// share: `⌊total × share / Σ shares⌋`. Every provider receives a
    /// call — `0` when the registry's total share is non-positive or the
    /// provider's own share is non-positive — so a provider can always
    /// tell "freshly configured with nothing" from "never configured".
    pub fn set_context_budget(&self, total: i64) {
        let sum = self.registry.total_share();

        for (provider, share) in self.registry.registrations() {
            let budget = if sum > 0.0 && share > 0.0 {
                #[allow(clippy::cast_precision_loss)]
                let total_f = total as f64;
                let scaled = (total_f * share / sum).floor();
                #[allow(clippy::cast_possible_truncation)]
                let budget = scaled as i64;
                budget
            } else {
                0
            };
            provider.set_token_budget(budget);
        }
    }

    /// Call `get_part` on every provider in registration order and
    /// collect the non-empty parts into a key→content map.
    ///
    /// # Errors
    ///
    /// Aborts and returns the first [`ManagerError`] encountered; no
    /// partial map is ever returned.
    pub async fn get_context_parts(
        &self,
        ctx: &AssemblyContext,
    ) -> Result<HashMap<String, String>, ManagerError> {
        let mut parts = HashMap::new();
        for provider in self.registry.providers() {
            let part = provider.get_part(ctx).await?;
            if !part.content.is_empty() {
                parts.insert(part.key, part.content);
            }
        }
        Ok(parts)
    }

    /// Clear the first registered provider whose key is `"chat"`. Other
    /// providers (project/file caches, todos) are left intact — "reset
    /// conversation" only means the conversation.
    pub fn clear_context(&self) {
        if let Some(provider) = self.registry.providers().find(|p| p.key() == "chat") {
            provider.clear_part();
        }
    }

    /// Hand `history` to the first provider that accepts pre-seeded chat
    /// history (today, [`ChatProvider`]). No-op if none is registered or
    /// `history` is empty.
    pub fn seed_chat_history(&self, history: Vec<Message>) {
        if history.is_empty() {
            return;
        }
        for provider in self.registry.providers() {
            if let Some(chat) = provider.as_any().downcast_ref::<ChatProvider>() {
                chat.seed(history);
                return;
            }
        }
    }
}
