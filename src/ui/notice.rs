//! ui::notice
//!
//! User-visible notices.
//!
//! # Design
//!
//! A notice is what the player sees: a chat line, or a popup tip when the
//! host supports one. Notices are separate from logging. The engine builds
//! them and hands them to [`crate::world::World::post_notice`]; each one is
//! also logged at `debug`.

use std::fmt;

/// How a notice should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

/// A message for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    /// Short title (popup header).
    pub header: String,
    /// Detail line.
    pub body: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, header: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level,
            header: header.into(),
            body: body.into(),
        }
    }

    pub fn info(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, header, body)
    }

    pub fn success(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, header, body)
    }

    pub fn warning(header: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, header, body)
    }

    /// Whether the host should style this as a warning popup.
    pub fn is_warning(&self) -> bool {
        self.level == NoticeLevel::Warning
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "done",
            NoticeLevel::Warning => "warning",
        };
        if self.body.is_empty() {
            write!(f, "[{}] {}", tag, self.header)
        } else {
            write!(f, "[{}] {}: {}", tag, self.header, self.body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_level_and_body() {
        let notice = Notice::warning("Sort cancelled", "ship is departing");
        assert!(notice.is_warning());
        assert_eq!(notice.to_string(), "[warning] Sort cancelled: ship is departing");
    }

    #[test]
    fn display_without_body() {
        assert_eq!(Notice::success("Sorted", "").to_string(), "[done] Sorted");
    }
}
