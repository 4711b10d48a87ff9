//! # Navigation Cursor
//!
//! The selected position inside the current filtered list. Pure index
//! arithmetic: every operation takes the list length (or the list itself)
//! and returns a new state.
//!
//! ```text
//!   len == 0  ──▶ Empty
//!   len  > 0  ──▶ Positioned(i)   0 <= i < len
//! ```
//!
//! Two stepping policies coexist: the reader view wraps around at either
//! end, list-style steppers stop at the ends instead.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::types::Hadith;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPolicy {
    /// Last → first and first → last.
    #[default]
    Wrap,
    /// Stay put at either end.
    Bounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorState {
    #[default]
    Empty,
    Positioned(usize),
}

impl CursorState {
    /// Clamp an arbitrary requested index into `[0, len - 1]`.
    pub fn clamp(requested: i64, len: usize) -> CursorState {
        if len == 0 {
            return CursorState::Empty;
        }
        let last = (len - 1) as i64;
        CursorState::Positioned(requested.clamp(0, last) as usize)
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            CursorState::Empty => None,
            CursorState::Positioned(i) => Some(*i),
        }
    }

    /// Re-clamp this cursor after the list changed length.
    pub fn reclamp(self, len: usize) -> CursorState {
        CursorState::clamp(self.index().unwrap_or(0) as i64, len)
    }

    pub fn next(self, len: usize, policy: NavigationPolicy) -> CursorState {
        let CursorState::Positioned(i) = self.reclamp(len) else {
            return CursorState::Empty;
        };
        match policy {
            NavigationPolicy::Wrap => CursorState::Positioned((i + 1) % len),
            NavigationPolicy::Bounded => CursorState::Positioned((i + 1).min(len - 1)),
        }
    }

    pub fn previous(self, len: usize, policy: NavigationPolicy) -> CursorState {
        let CursorState::Positioned(i) = self.reclamp(len) else {
            return CursorState::Empty;
        };
        match (policy, i) {
            (NavigationPolicy::Wrap, 0) => CursorState::Positioned(len - 1),
            (_, 0) => CursorState::Positioned(0),
            (_, i) => CursorState::Positioned(i - 1),
        }
    }

    /// Whether `next` would move. Always true for `Wrap` on a list of two or more.
    pub fn can_step_forward(&self, len: usize, policy: NavigationPolicy) -> bool {
        match (self.index(), policy) {
            (None, _) => false,
            (Some(_), NavigationPolicy::Wrap) => len > 1,
            (Some(i), NavigationPolicy::Bounded) => i + 1 < len,
        }
    }

    pub fn can_step_back(&self, len: usize, policy: NavigationPolicy) -> bool {
        match (self.index(), policy) {
            (None, _) => false,
            (Some(_), NavigationPolicy::Wrap) => len > 1,
            (Some(i), NavigationPolicy::Bounded) => i > 0 && len > 0,
        }
    }
}

/// Keep pointing at the same hadith number after the list changed. Falls
/// back to the first item when that number is gone.
pub fn resolve_across_filter_change(previous_number: Option<u32>, list: &[Hadith]) -> CursorState {
    if list.is_empty() {
        return CursorState::Empty;
    }
    previous_number
        .and_then(|number| list.iter().position(|h| h.number == number))
        .map(CursorState::Positioned)
        .unwrap_or(CursorState::Positioned(0))
}
