//! Chat provider (`key = "chat"`): accumulates chat turns from
//! `chat.response` events and renders them as alternating `User:`/`Genie:`
//! lines.

use std::any::Any;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::bus::Bus;
use crate::error::ManagerError;
use crate::events::Event;
use crate::trim::SlidingWindow;

use super::{AssemblyContext, ContextPart, ContextProvider, Message, SeedableChatHistory};

/// Accumulates chat turns in arrival order and renders them.
pub struct ChatProvider {
    messages: RwLock<Vec<Message>>,
    budget: AtomicI64,
    window: SlidingWindow,
}

impl ChatProvider {
    /// Construct the provider and subscribe it to `chat.response` on
    /// `bus`. Arrival order is preserved because `chat.response` has a
    /// single subscribed topic, so the bus's per-topic worker already
    /// serializes delivery — no internal queue is needed.
    #[must_use]
    pub fn new(bus: &Bus) -> Arc<Self> {
        let provider = Arc::new(Self {
            messages: RwLock::new(Vec::new()),
            budget: AtomicI64::new(0),
            window: SlidingWindow,
        });

        let handler_provider = Arc::clone(&provider);
        bus.subscribe(
            "chat.response",
            Arc::new(move |event: &Event| {
                handler_provider.handle(event);
            }),
        );

        provider
    }

    fn handle(&self, event: &Event) {
        if let Event::ChatResponse(payload) = event {
            let mut messages = self
                .messages
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            messages.push(Message {
                user: payload.message.clone(),
                assistant: payload.response.clone(),
            });
        }
    }
}

fn render(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("User: {}\nGenie: {}", m.user, m.assistant))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ContextProvider for ChatProvider {
    fn key(&self) -> &'static str {
        "chat"
    }

    fn set_token_budget(&self, budget: i64) {
        self.budget.store(budget, Ordering::Relaxed);
    }

    async fn get_part(&self, _ctx: &AssemblyContext) -> Result<ContextPart, ManagerError> {
        let messages = self
            .messages
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let budget = self.budget.load(Ordering::Relaxed);

        let kept = self.window.apply(&messages, budget, |m| {
            format!("User: {}\nGenie: {}", m.user, m.assistant)
        });

        Ok(ContextPart {
            key: "chat".to_string(),
            content: render(&kept),
        })
    }

    fn clear_part(&self) {
        let mut messages = self
            .messages
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        messages.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl SeedableChatHistory for ChatProvider {
    fn seed(&self, messages: Vec<Message>) {
        let mut current = self
            .messages
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = messages;
    }
}
