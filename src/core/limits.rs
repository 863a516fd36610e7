/*!
 * Limits and Constants
 *
 * Centralized location for crate-wide limits and thresholds.
 * All values include rationale comments explaining WHY they exist.
 */

// =============================================================================
// AUDIT LIMITS
// =============================================================================

/// Maximum access decisions kept in the global audit ring buffer
/// Bounds memory for long-lived managers; oldest events are dropped first
pub const MAX_AUDIT_EVENTS: usize = 10_000;

/// Maximum access decisions kept per user
/// Keeps per-user history useful for denial triage without unbounded growth
pub const MAX_AUDIT_EVENTS_PER_USER: usize = 100;

// =============================================================================
// PENDING WRITE CACHE
// =============================================================================

/// Soft ceiling on pending-write entries per unit of work
/// A single write sequence touching more entities than this almost certainly
/// leaked its manager across unrelated operations; exceeding it logs a warning
pub const PENDING_WRITES_SOFT_LIMIT: usize = 1_024;
