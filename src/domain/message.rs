use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, MessageId, MessageText, PersonName, PhoneNumber};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    pub author: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    /// Replies written by the shop render on the right-hand side.
    #[serde(default)]
    pub from_staff: bool,
}

/// A client inquiry plus its reply thread (mensaje).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageThread {
    pub id: MessageId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub body: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl MessageThread {
    /// Most recent activity, used to order the inbox.
    pub fn last_activity(&self) -> NaiveDateTime {
        self.replies
            .iter()
            .map(|reply| reply.created_at)
            .max()
            .map_or(self.created_at, |last| last.max(self.created_at))
    }

    /// A thread awaits an answer until the shop writes the last reply.
    pub fn awaiting_reply(&self) -> bool {
        self.replies.last().is_none_or(|reply| !reply.from_staff)
    }
}

/// Contact-form submission.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewMessage {
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub body: MessageText,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewReply {
    pub body: MessageText,
}
