// Direct-message conversations.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversation id for a pair of users. The same for both orderings.
pub fn chat_id(uid1: &str, uid2: &str) -> String {
    if uid1 > uid2 {
        format!("{}_{}", uid1, uid2)
    } else {
        format!("{}_{}", uid2, uid1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub text: String,
    pub sender_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participant_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_message: Option<LastMessage>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn has_participant(&self, uid: &str) -> bool {
        self.participant_ids.iter().any(|p| p == uid)
    }

    /// The participant that is not `uid`.
    pub fn other_participant(&self, uid: &str) -> Option<&str> {
        self.participant_ids
            .iter()
            .map(String::as_str)
            .find(|p| *p != uid)
    }

    /// Last activity, used to order an inbox.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_message
            .as_ref()
            .map(|m| m.timestamp)
            .unwrap_or(self.created_at)
    }

    /// Conversation header without the message history.
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            participant_ids: self.participant_ids.clone(),
            created_at: self.created_at,
            last_message: self.last_message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub participant_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_message: Option<LastMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_ignores_argument_order() {
        assert_eq!(chat_id("alice", "bob"), chat_id("bob", "alice"));
        assert_eq!(chat_id("alice", "bob"), "bob_alice");
    }
}
