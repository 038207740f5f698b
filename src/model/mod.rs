// File: ./src/model/mod.rs
pub mod artist;
pub mod chat;
pub mod event;
pub mod matcher;

pub use artist::{Artist, Artwork, Designation, Role, UserProfile};
pub use chat::{Conversation, ConversationSummary, LastMessage, Message, chat_id};
pub use event::{Event, EventCategory, EventId, RawEvent, TemporalMode, now, parse_instant};
pub use matcher::Searchable;
