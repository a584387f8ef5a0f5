//! UI-agnostic conversation state
//!
//! Message types and the append-only conversation log, plus the fixed
//! localized strings the interface shows.

pub const HEADER_TITLE: &str = "仓库查询助手";
pub const USER_LABEL: &str = "您：";
pub const INTERPRETATION_LABEL: &str = "AI理解为：";
pub const BOT_LABEL: &str = "助手：";
pub const PROCESSING_CAPTION: &str = "正在处理您的请求...";
pub const SUBMIT_LABEL: &str = "发送";
pub const SUBMIT_BUSY_LABEL: &str = "处理中...";
pub const INPUT_PLACEHOLDER: &str = "请输入您的问题，例如：查询 MH-1211-42 的库存";
pub const ERROR_FALLBACK: &str = "抱歉，发生错误，请稍后重试。";

/// Where a conversation entry came from, and how it is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Interpretation,
    Bot,
    Error,
}

/// A single entry in the conversation log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub content: String,
}

impl Message {
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageKind::User, content)
    }

    pub fn interpretation(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Interpretation, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Bot, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, content)
    }
}

/// Append-only list of messages, in display order
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Text for an error entry: the failure's own message, or the fallback
/// when there is nothing to show.
pub fn error_content(message: &str) -> String {
    if message.trim().is_empty() {
        ERROR_FALLBACK.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_keeps_insertion_order() {
        let mut log = ConversationLog::new();
        assert!(log.is_empty());

        log.push(Message::user("query MH-1211-42 stock"));
        log.push(Message::interpretation("check inventory for MH-1211-42"));
        log.push(Message::bot("Current stock: 42"));

        let kinds: Vec<MessageKind> = log.entries().iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MessageKind::User, MessageKind::Interpretation, MessageKind::Bot]
        );
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn error_content_falls_back_on_blank_message() {
        assert_eq!(error_content(""), ERROR_FALLBACK);
        assert_eq!(error_content("   "), ERROR_FALLBACK);
        assert_eq!(error_content("SKU not found"), "SKU not found");
    }
}
