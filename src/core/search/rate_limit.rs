//! Client-side cooldown after the translator reports a rate limit.

use std::time::Duration;

use tokio::time::Instant;

/// Upper bound on a single cooldown, whatever the server asks for.
pub const MAX_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

/// While `now < locked_until`, no translation call is issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitWindow {
    locked_until: Option<Instant>,
}

impl RateLimitWindow {
    /// Time left in the window, clearing it once it has elapsed.
    pub fn remaining(&mut self, now: Instant) -> Option<Duration> {
        match self.locked_until {
            Some(until) if now < until => Some(until - now),
            Some(_) => {
                self.locked_until = None;
                None
            }
            None => None,
        }
    }

    /// Open (or extend) the window for `cooldown` from `now`.
    pub fn lock(&mut self, now: Instant, cooldown: Duration) {
        let until = now + cooldown.min(MAX_COOLDOWN);
        self.locked_until = Some(self.locked_until.map_or(until, |current| current.max(until)));
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }
}

/// Whole seconds to show in a countdown, rounded up.
pub fn countdown_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs();
    if wait.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
