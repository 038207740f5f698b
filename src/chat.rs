//! Direct messaging between members.
//!
//! [`ChatHub`] owns every conversation and pushes snapshots to subscribers.
//! A subscriber gets the current state as soon as it subscribes and a fresh
//! snapshot after every change to its topic, until its [`Subscription`] is
//! dropped or [`Subscription::unsubscribe`] is called.
//!
//! Callbacks are invoked after the hub lock is released, so a callback may
//! call back into the hub. A callback must not trigger a change on its own
//! topic from inside itself.
//!
//! Every change bumps a revision taken under the hub lock. A listener never
//! sees a snapshot older than one it has already been given, even when
//! several threads change the hub at once.

use crate::context::AppContext;
use crate::error::ChatError;
use crate::model::{Conversation, ConversationSummary, LastMessage, Message, chat_id};
use crate::storage::LocalStorage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    /// Messages of one conversation, oldest first.
    Messages(String),
    /// Inbox of one user, most recent activity first.
    Conversations(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatSnapshot {
    Messages(Vec<Message>),
    Conversations(Vec<ConversationSummary>),
}

type Callback = Box<dyn FnMut(ChatSnapshot) + Send>;

struct Slot {
    callback: Callback,
    /// Revision of the last snapshot handed to `callback`.
    delivered: Option<u64>,
}

type SharedSlot = Arc<Mutex<Slot>>;

struct Listener {
    id: u64,
    topic: Topic,
    slot: SharedSlot,
}

#[derive(Default)]
struct Inner {
    conversations: Vec<Conversation>,
    listeners: Vec<Listener>,
    next_listener: u64,
    revision: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Inner {
    fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn snapshot(&self, topic: &Topic) -> ChatSnapshot {
        match topic {
            Topic::Messages(chat) => ChatSnapshot::Messages(
                self.get(chat).map(|c| c.messages.clone()).unwrap_or_default(),
            ),
            Topic::Conversations(user) => ChatSnapshot::Conversations(self.inbox(user)),
        }
    }

    fn inbox(&self, user: &str) -> Vec<ConversationSummary> {
        let mut list: Vec<&Conversation> = self
            .conversations
            .iter()
            .filter(|c| c.has_participant(user))
            .collect();
        list.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
        list.into_iter().map(Conversation::summary).collect()
    }

    /// Timestamps never go backwards, even if the wall clock does.
    fn stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    /// Records a change and collects deliveries for every listener on `topics`.
    fn changed(&mut self, topics: &[Topic]) -> Vec<Delivery> {
        self.revision += 1;
        self.listeners
            .iter()
            .filter(|l| topics.contains(&l.topic))
            .map(|l| Delivery {
                slot: l.slot.clone(),
                revision: self.revision,
                snapshot: self.snapshot(&l.topic),
            })
            .collect()
    }
}

struct Delivery {
    slot: SharedSlot,
    revision: u64,
    snapshot: ChatSnapshot,
}

fn deliver(pending: Vec<Delivery>) {
    for delivery in pending {
        let mut guard = delivery.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = &mut *guard;
        if slot.delivered.is_some_and(|seen| seen >= delivery.revision) {
            continue;
        }
        slot.delivered = Some(delivery.revision);
        (slot.callback)(delivery.snapshot);
    }
}

#[derive(Clone, Default)]
pub struct ChatHub {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for ChatHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ChatHub")
            .field("conversations", &inner.conversations.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl ChatHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_conversations(conversations: Vec<Conversation>) -> Self {
        let last_timestamp = conversations
            .iter()
            .flat_map(|c| c.messages.iter().map(|m| m.timestamp))
            .max();
        Self {
            inner: Arc::new(Mutex::new(Inner {
                conversations,
                last_timestamp,
                ..Default::default()
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_chats_path()?;
        let conversations = LocalStorage::load_document::<Conversation>(&path)?;
        Ok(Self::from_conversations(conversations))
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_chats_path()?;
        let conversations = self.lock().conversations.clone();
        LocalStorage::save_document(&path, &conversations)
    }

    /// Returns the id of the conversation between `me` and `other`,
    /// creating it on first contact.
    pub fn find_or_create_chat(&self, me: &str, other: &str) -> Result<String, ChatError> {
        if me == other {
            return Err(ChatError::SelfChat);
        }
        let id = chat_id(me, other);
        let pending = {
            let mut inner = self.lock();
            if inner.get(&id).is_some() {
                return Ok(id);
            }
            let created_at = inner.stamp(Utc::now());
            inner.conversations.push(Conversation {
                id: id.clone(),
                participant_ids: vec![me.to_string(), other.to_string()],
                created_at,
                last_message: None,
                messages: vec![],
            });
            log::debug!("Created conversation {}", id);
            inner.changed(&[
                Topic::Conversations(me.to_string()),
                Topic::Conversations(other.to_string()),
            ])
        };
        deliver(pending);
        Ok(id)
    }

    pub fn send_message(&self, chat: &str, sender: &str, text: &str) -> Result<Message, ChatError> {
        self.send_message_at(chat, sender, text, Utc::now())
    }

    /// Like [`ChatHub::send_message`] with an explicit clock reading.
    pub fn send_message_at(
        &self,
        chat: &str,
        sender: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Message, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let (message, pending) = {
            let mut inner = self.lock();
            let idx = inner
                .conversations
                .iter()
                .position(|c| c.id == chat)
                .ok_or_else(|| ChatError::UnknownChat(chat.to_string()))?;
            if !inner.conversations[idx].has_participant(sender) {
                return Err(ChatError::NotParticipant {
                    chat: chat.to_string(),
                    user: sender.to_string(),
                });
            }

            let timestamp = inner.stamp(now);
            let message = Message {
                id: uuid::Uuid::new_v4().to_string(),
                sender_id: sender.to_string(),
                text: text.to_string(),
                timestamp,
            };
            let conversation = &mut inner.conversations[idx];
            conversation.messages.push(message.clone());
            conversation.last_message = Some(LastMessage {
                text: message.text.clone(),
                sender_id: message.sender_id.clone(),
                timestamp,
            });

            let mut topics = vec![Topic::Messages(chat.to_string())];
            topics.extend(
                conversation
                    .participant_ids
                    .iter()
                    .map(|p| Topic::Conversations(p.clone())),
            );
            (message, inner.changed(&topics))
        };
        deliver(pending);
        Ok(message)
    }

    pub fn messages(&self, chat: &str) -> Result<Vec<Message>, ChatError> {
        self.lock()
            .get(chat)
            .map(|c| c.messages.clone())
            .ok_or_else(|| ChatError::UnknownChat(chat.to_string()))
    }

    /// A user's inbox, most recent activity first.
    pub fn conversations(&self, user: &str) -> Vec<ConversationSummary> {
        self.lock().inbox(user)
    }

    pub fn subscribe<F>(&self, topic: Topic, callback: F) -> Subscription
    where
        F: FnMut(ChatSnapshot) + Send + 'static,
    {
        let slot: SharedSlot = Arc::new(Mutex::new(Slot {
            callback: Box::new(callback),
            delivered: None,
        }));
        let (id, initial) = {
            let mut inner = self.lock();
            let id = inner.next_listener;
            inner.next_listener += 1;
            let initial = Delivery {
                slot: slot.clone(),
                revision: inner.revision,
                snapshot: inner.snapshot(&topic),
            };
            inner.listeners.push(Listener { id, topic, slot });
            (id, initial)
        };
        deliver(vec![initial]);
        Subscription {
            id,
            hub: Arc::downgrade(&self.inner),
        }
    }

    pub fn subscribe_messages<F>(&self, chat: &str, mut callback: F) -> Subscription
    where
        F: FnMut(Vec<Message>) + Send + 'static,
    {
        self.subscribe(Topic::Messages(chat.to_string()), move |snap| {
            if let ChatSnapshot::Messages(messages) = snap {
                callback(messages);
            }
        })
    }

    pub fn subscribe_conversations<F>(&self, user: &str, mut callback: F) -> Subscription
    where
        F: FnMut(Vec<ConversationSummary>) + Send + 'static,
    {
        self.subscribe(Topic::Conversations(user.to_string()), move |snap| {
            if let ChatSnapshot::Conversations(list) = snap {
                callback(list);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

/// Handle to an active subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    hub: Weak<Mutex<Inner>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .retain(|l| l.id != self.id);
        }
    }
}
