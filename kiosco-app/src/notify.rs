//! Transient user notifications
//!
//! Short-lived banners rendered at the top of every screen. Each notice
//! carries a deadline; pruning happens once per render tick.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    deadline: Instant,
}

/// Queue of live notices, newest last.
#[derive(Default)]
pub struct Notices {
    items: Vec<Notice>,
}

const DEFAULT_TTL: Duration = Duration::from_secs(4);

impl Notices {
    pub fn push(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.items.push(Notice {
            kind,
            text: text.into(),
            deadline: Instant::now() + DEFAULT_TTL,
        });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text);
    }

    /// Drop notices past their deadline.
    pub fn prune(&mut self) {
        let now = Instant::now();
        self.items.retain(|n| n.deadline > now);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_wins_and_pruning_is_deadline_based() {
        let mut notices = Notices::default();
        notices.info("cargando");
        notices.success("listo");
        assert_eq!(notices.latest().unwrap().text, "listo");

        notices.prune();
        assert!(!notices.is_empty());
    }
}
