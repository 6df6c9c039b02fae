//! Direct message validation.

use crate::error::CoreError;
use crate::types::string_enum;

string_enum! {
    pub enum MessageType {
        Text => "text",
        Image => "image",
        File => "file",
    }
}

impl Default for MessageType {
    fn default() -> Self {
        MessageType::Text
    }
}

/// Text messages need content; image and file messages need a media URL.
pub fn validate_message(
    kind: MessageType,
    content: Option<&str>,
    media_url: Option<&str>,
) -> Result<(), CoreError> {
    let has = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    match kind {
        MessageType::Text if !has(content) => {
            Err(CoreError::validation("Message content is required"))
        }
        MessageType::Image | MessageType::File if !has(media_url) => Err(CoreError::validation(
            format!("A media URL is required for {kind} messages"),
        )),
        _ => Ok(()),
    }
}
