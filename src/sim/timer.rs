//! Deferred timers on the simulation clock
//!
//! Every scheduled timer gets a fresh token. Owners remember the token they
//! care about, so a timer that fires after its owner moved on can be told
//! apart from the current one.

use serde::{Deserialize, Serialize};

/// Identity of one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerToken(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Turn the active bonus off
    BonusExpired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    token: TimerToken,
    due_ms: f64,
    event: TimerEvent,
}

/// Pending timers, drained once per tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    next_token: u64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once the clock reaches `now_ms + delay_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, event: TimerEvent) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.pending.push(Pending {
            token,
            due_ms: now_ms + delay_ms,
            event,
        });
        token
    }

    /// Drop a pending timer; returns false if it already fired or never existed
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every timer due at `now_ms`, earliest first
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<(TimerToken, TimerEvent)> {
        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.due_ms <= now_ms {
                due.push(p.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.token.cmp(&b.token)));
        due.into_iter().map(|p| (p.token, p.event)).collect()
    }
}
