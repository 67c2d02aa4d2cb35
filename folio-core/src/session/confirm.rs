//! Confirmation and prompt collaborators

/// Yes/no confirmation and single-line text prompts
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;

    /// Ask for text with a pre-filled default. `None` means cancelled.
    fn prompt(&mut self, message: &str, default: &str) -> Option<String>;
}

/// Accepts every confirmation and every prompt default
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }

    fn prompt(&mut self, _message: &str, default: &str) -> Option<String> {
        Some(default.to_string())
    }
}

/// Cancels every confirmation and prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl Confirm for Decline {
    fn confirm(&mut self, _message: &str) -> bool {
        false
    }

    fn prompt(&mut self, _message: &str, _default: &str) -> Option<String> {
        None
    }
}

/// Fixed answers, with a log of the questions asked
#[derive(Debug, Clone, Default)]
pub struct Preset {
    pub accept: bool,
    pub reply: Option<String>,
    pub asked: Vec<String>,
}

impl Preset {
    pub fn new(accept: bool, reply: Option<String>) -> Self {
        Self {
            accept,
            reply,
            asked: Vec::new(),
        }
    }
}

impl Confirm for Preset {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.accept
    }

    fn prompt(&mut self, message: &str, _default: &str) -> Option<String> {
        self.asked.push(message.to_string());
        self.reply.clone()
    }
}
