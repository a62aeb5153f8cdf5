#![forbid(unsafe_code)]

//! Message area state.

use crate::content::ContentPart;

/// The server-reported kind of a shown message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Plain,
    Confirm,
    ConfirmSub,
    Emsg,
    Echo,
    Echomsg,
    Echoerr,
    LuaError,
    RpcError,
    ReturnPrompt,
    Quickfix,
    SearchCount,
    Wmsg,
    SearchCmd,
    /// A kind this build does not know; kept verbatim for display.
    Other(String),
}

impl MessageKind {
    /// Map the protocol kind string.
    pub fn parse(kind: &str) -> MessageKind {
        match kind {
            "" => MessageKind::Plain,
            "confirm" => MessageKind::Confirm,
            "confirm_sub" => MessageKind::ConfirmSub,
            "emsg" => MessageKind::Emsg,
            "echo" => MessageKind::Echo,
            "echomsg" => MessageKind::Echomsg,
            "echoerr" => MessageKind::Echoerr,
            "lua_error" => MessageKind::LuaError,
            "rpc_error" => MessageKind::RpcError,
            "return_prompt" => MessageKind::ReturnPrompt,
            "quickfix" => MessageKind::Quickfix,
            "search_count" => MessageKind::SearchCount,
            "wmsg" => MessageKind::Wmsg,
            "search_cmd" => MessageKind::SearchCmd,
            other => MessageKind::Other(other.to_string()),
        }
    }

    /// Whether the message blocks input until dismissed.
    pub fn is_modal(&self) -> bool {
        matches!(
            self,
            MessageKind::Confirm
                | MessageKind::ConfirmSub
                | MessageKind::ReturnPrompt
                | MessageKind::Quickfix
        )
    }
}

/// One shown message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub content: Vec<ContentPart>,
}

/// The visible message list, newest last.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Messages {
    messages: Vec<Message>,
}

impl Messages {
    /// Append a message, optionally replacing the newest one.
    pub fn show(&mut self, message: Message, replace_last: bool) {
        if replace_last {
            self.messages.pop();
        }
        self.messages.push(message);
    }

    /// Dismiss every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The visible messages, oldest first.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Whether any visible message is modal.
    pub fn has_modal(&self) -> bool {
        self.messages.iter().any(|message| message.kind.is_modal())
    }
}
