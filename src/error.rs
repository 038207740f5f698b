// Domain error types.
//
// IO and parse failures at the storage/config boundary stay `anyhow::Error`;
// the enums here are for callers that need to tell the cases apart.

/// A record delivered by the backend that cannot become a domain value.
/// Ingestion logs these and drops the record; they never abort a load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataQualityError {
    #[error("record has no usable id")]
    MissingId,

    #[error("event {id} has no title")]
    MissingTitle { id: String },

    #[error("event {id} has no start time")]
    MissingStart { id: String },

    #[error("event {id} has an unparseable start time '{value}'")]
    InvalidStart { id: String, value: String },

    #[error("event {id} has an unknown category '{value}'")]
    UnknownCategory { id: String, value: String },

    #[error("duplicate event id {id}")]
    DuplicateId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("You must be logged in to perform this action.")]
    Unauthenticated,

    #[error("This action can only be performed by an admin.")]
    PermissionDenied,
}

/// Rejections from the admin and profile forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("unknown category '{0}'")]
    InvalidCategory(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No profile document found to update for {0}")]
    ProfileNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("conversation {0} does not exist")]
    UnknownChat(String),

    #[error("{user} is not a participant of {chat}")]
    NotParticipant { chat: String, user: String },

    #[error("cannot start a conversation with yourself")]
    SelfChat,

    #[error("message text is empty")]
    EmptyMessage,
}
