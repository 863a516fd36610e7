/*!
 * Access Audit Trail
 * Tracks access decisions and denials for security monitoring
 */

use super::types::{AccessDecision, PermissionKind};
use crate::core::limits::{MAX_AUDIT_EVENTS, MAX_AUDIT_EVENTS_PER_USER};
use crate::core::types::UserId;
use ahash::RandomState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Audit event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    Info,
    Warning,
    Critical,
}

/// A recorded access decision
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuditEvent {
    pub decision: AccessDecision,
    pub severity: AuditSeverity,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub logged_at: SystemTime,
}

impl AuditEvent {
    pub fn new(decision: AccessDecision) -> Self {
        let severity = if decision.is_allowed() {
            AuditSeverity::Info
        } else if decision
            .request
            .kinds
            .intersects(PermissionKind::DELETE | PermissionKind::ADMINISTER)
        {
            // Denied attempts at destructive or administrative access
            AuditSeverity::Critical
        } else {
            AuditSeverity::Warning
        };

        Self {
            decision,
            severity,
            logged_at: SystemTime::now(),
        }
    }

    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Audit logger for access decisions
pub struct AuditLogger {
    /// Global event log (ring buffer)
    events: parking_lot::RwLock<VecDeque<AuditEvent>>,
    /// Per-user event logs
    user_events: DashMap<UserId, VecDeque<AuditEvent>, RandomState>,
    /// Denial counters for monitoring
    denial_counts: DashMap<UserId, u64, RandomState>,
    total_events: AtomicU64,
    total_denials: AtomicU64,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self {
            events: parking_lot::RwLock::new(VecDeque::with_capacity(MAX_AUDIT_EVENTS)),
            user_events: DashMap::with_hasher(RandomState::new()),
            denial_counts: DashMap::with_hasher(RandomState::new()),
            total_events: AtomicU64::new(0),
            total_denials: AtomicU64::new(0),
        }
    }

    /// Record an access decision
    pub fn log(&self, event: AuditEvent) {
        let user = event.decision.request.user;
        let is_denied = !event.decision.is_allowed();

        // Add to global log
        {
            let mut events = self.events.write();
            if events.len() >= MAX_AUDIT_EVENTS {
                events.pop_front();
            }
            events.push_back(event.clone());
        }

        // Add to user-specific log
        {
            let mut entry = self
                .user_events
                .entry(user)
                .or_insert_with(|| VecDeque::with_capacity(MAX_AUDIT_EVENTS_PER_USER));
            if entry.len() >= MAX_AUDIT_EVENTS_PER_USER {
                entry.pop_front();
            }
            entry.push_back(event);
        }

        self.total_events.fetch_add(1, Ordering::Relaxed);
        if is_denied {
            self.total_denials.fetch_add(1, Ordering::Relaxed);
            self.denial_counts
                .entry(user)
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    /// Most recent events, newest last
    pub fn recent(&self, count: usize) -> Vec<AuditEvent> {
        let events = self.events.read();
        events
            .iter()
            .skip(events.len().saturating_sub(count))
            .cloned()
            .collect()
    }

    /// Most recent events for a user, newest last
    pub fn recent_for_user(&self, user: UserId, count: usize) -> Vec<AuditEvent> {
        match self.user_events.get(&user) {
            Some(events) => events
                .iter()
                .skip(events.len().saturating_sub(count))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// How many denials a user has accumulated
    pub fn denial_count(&self, user: UserId) -> u64 {
        self.denial_counts.get(&user).map(|entry| *entry).unwrap_or(0)
    }

    /// Get audit statistics
    pub fn stats(&self) -> AuditStats {
        AuditStats {
            total_events: self.total_events.load(Ordering::Relaxed),
            total_denials: self.total_denials.load(Ordering::Relaxed),
            tracked_users: self.user_events.len(),
        }
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Audit statistics
#[derive(Debug, Clone)]
pub struct AuditStats {
    pub total_events: u64,
    pub total_denials: u64,
    pub tracked_users: usize,
}
