use serde::Serialize;

use crate::domain::message::MessageThread;

#[derive(Debug, Serialize)]
pub struct InboxPageData {
    /// Most recent activity first.
    pub threads: Vec<MessageThread>,
    pub unread: usize,
    pub awaiting_reply: usize,
}

#[derive(Debug, Serialize)]
pub struct ThreadPageData {
    pub thread: MessageThread,
}
