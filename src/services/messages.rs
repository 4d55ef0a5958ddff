use crate::domain::auth::AuthenticatedUser;
use crate::domain::message::{MessageThread, NewReply};
use crate::domain::types::MessageId;
use crate::dto::messages::{InboxPageData, ThreadPageData};
use crate::forms::messages::ReplyForm;
use crate::gateway::{MessageReader, MessageWriter};
use crate::services::{ServiceResult, ensure_admin, form_error};

/// Inbox ordered by latest activity.
pub fn load_inbox_page<G>(gateway: &G, user: &AuthenticatedUser) -> ServiceResult<InboxPageData>
where
    G: MessageReader + ?Sized,
{
    ensure_admin(user)?;

    let mut threads = gateway.list_messages().map_err(|err| {
        log::error!("Failed to list messages: {err}");
        err
    })?;
    threads.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));

    Ok(InboxPageData {
        unread: threads.iter().filter(|thread| !thread.read).count(),
        awaiting_reply: threads.iter().filter(|thread| thread.awaiting_reply()).count(),
        threads,
    })
}

pub fn load_thread_page<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    message_id: i32,
) -> ServiceResult<ThreadPageData>
where
    G: MessageReader + ?Sized,
{
    ensure_admin(user)?;
    let thread = gateway.get_message(MessageId::new(message_id)?)?;
    Ok(ThreadPageData { thread })
}

pub fn reply_message<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    message_id: i32,
    form: ReplyForm,
) -> ServiceResult<MessageThread>
where
    G: MessageWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = MessageId::new(message_id)?;
    let reply = NewReply::try_from(form).map_err(form_error)?;

    gateway.reply_message(id, &reply).map_err(|err| {
        log::error!("Failed to reply to message {id}: {err}");
        err.into()
    })
}

pub fn delete_message<G>(
    gateway: &G,
    user: &AuthenticatedUser,
    message_id: i32,
) -> ServiceResult<()>
where
    G: MessageWriter + ?Sized,
{
    ensure_admin(user)?;
    let id = MessageId::new(message_id)?;

    gateway.delete_message(id).map_err(|err| {
        log::error!("Failed to delete message {id}: {err}");
        err.into()
    })
}
