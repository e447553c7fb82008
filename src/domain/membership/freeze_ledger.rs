//! Freeze history of a membership.
//!
//! The ledger is append-only: closing a freeze stamps its end, nothing is ever
//! removed. "The open freeze" is whichever interval matches the open predicate
//! at the given instant; there is no separate pointer to keep in sync.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StaffId, Timestamp};

use super::MembershipError;

/// One suspension of a membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeInterval {
    pub start_date: Timestamp,

    /// Requested or actual end; `None` while open-ended.
    pub end_date: Option<Timestamp>,

    pub reason: String,

    pub requested_by: StaffId,

    /// Staff member who lifted the freeze; set on unfreeze.
    pub approved_by: Option<StaffId>,

    pub created_at: Timestamp,
}

impl FreezeInterval {
    /// Open means no end yet, or an end still in the future.
    pub fn is_open_at(&self, now: Timestamp) -> bool {
        match self.end_date {
            None => true,
            Some(end) => end.is_after(&now),
        }
    }

    /// Days credited for this freeze when lifted at `now`.
    ///
    /// Measured from the freeze start to the moment of unfreeze, rounded up,
    /// regardless of the end that was originally requested.
    pub fn elapsed_days(&self, now: Timestamp) -> i64 {
        now.days_since_ceil(&self.start_date)
    }

    fn close(&mut self, now: Timestamp, approved_by: Option<StaffId>) {
        self.end_date = Some(now);
        self.approved_by = approved_by;
    }
}

/// Ordered, append-only list of freeze intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreezeLedger(Vec<FreezeInterval>);

impl FreezeLedger {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn intervals(&self) -> &[FreezeInterval] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a new freeze.
    ///
    /// # Errors
    ///
    /// `Conflict(AlreadyFrozen)` when any interval is still open at `now`.
    pub fn add_freeze(
        &mut self,
        start_date: Timestamp,
        end_date: Option<Timestamp>,
        reason: impl Into<String>,
        requested_by: StaffId,
        now: Timestamp,
    ) -> Result<&FreezeInterval, MembershipError> {
        if self.find_active_index(now).is_some() {
            return Err(MembershipError::already_frozen());
        }

        self.0.push(FreezeInterval {
            start_date,
            end_date,
            reason: reason.into(),
            requested_by,
            approved_by: None,
            created_at: now,
        });
        let last = self.0.len() - 1;
        Ok(&self.0[last])
    }

    /// The interval open at `now`, if any.
    ///
    /// Should several be open, the most recently created one wins.
    pub fn find_active_freeze(&self, now: Timestamp) -> Option<&FreezeInterval> {
        self.find_active_index(now).map(|idx| &self.0[idx])
    }

    /// Closes the open interval at `now` and returns a copy of it.
    ///
    /// Returns `None` when nothing is open.
    pub fn close_active_freeze(
        &mut self,
        now: Timestamp,
        approved_by: Option<StaffId>,
    ) -> Option<FreezeInterval> {
        let idx = self.find_active_index(now)?;
        let interval = &mut self.0[idx];
        interval.close(now, approved_by);
        Some(interval.clone())
    }

    /// Days credited for `interval` if it were lifted at `now`.
    pub fn total_freeze_days(interval: &FreezeInterval, now: Timestamp) -> i64 {
        interval.elapsed_days(now)
    }

    /// Total days spent frozen across every closed interval.
    pub fn total_days_frozen(&self, now: Timestamp) -> i64 {
        self.0
            .iter()
            .filter(|interval| !interval.is_open_at(now))
            .filter_map(|interval| {
                interval
                    .end_date
                    .map(|end| end.days_since_ceil(&interval.start_date))
            })
            .sum()
    }

    fn find_active_index(&self, now: Timestamp) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, interval)| interval.is_open_at(now))
            .max_by_key(|(idx, interval)| (interval.created_at, *idx))
            .map(|(idx, _)| idx)
    }
}
