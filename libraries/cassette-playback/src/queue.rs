//! Play queue and next/previous selection
//!
//! The queue is whatever list playback was started from ("Songs",
//! "Recently Played", ...). When shuffle is on, a shuffled copy anchored at
//! the current track governs navigation instead:
//!
//! ```text
//! queue:     A  B  C  D  E
//! shuffled:  C  E  A  D  B     (anchored at C when shuffle was enabled)
//! active:    shuffled if shuffle is on, else queue
//! ```
//!
//! `compute_next` / `compute_previous` are pure functions over the active
//! queue; [`PlayQueue`] only stores the lists and rebuilds the shuffled copy
//! whenever its inputs change.

use crate::shuffle::build_shuffled_queue;
use crate::types::{RepeatMode, Track, TrackId};
use rand::RngCore;

/// Result of looking up the track after the current one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NextStep<'a> {
    /// Play this track next
    Advance(&'a Track),

    /// Current track is the last one and repeat-all is off
    EndOfQueue,

    /// Current track is not in the active queue (it left the queue)
    NotInQueue,
}

impl<'a> NextStep<'a> {
    /// Track to play, if any
    pub fn track(&self) -> Option<&'a Track> {
        match self {
            NextStep::Advance(track) => Some(track),
            NextStep::EndOfQueue | NextStep::NotInQueue => None,
        }
    }

    /// Whether playback should stop instead of advancing
    pub fn should_stop(&self) -> bool {
        !matches!(self, NextStep::Advance(_))
    }
}

/// Track after `current` in `active`
///
/// Wraps to the first track only under [`RepeatMode::All`]; `One` behaves
/// like `Off` here (restarting in place is handled by the end-of-track
/// signal, not by this lookup).
pub fn compute_next<'a>(active: &'a [Track], current: &TrackId, repeat: RepeatMode) -> NextStep<'a> {
    let Some(index) = active.iter().position(|t| &t.id == current) else {
        return NextStep::NotInQueue;
    };

    if let Some(next) = active.get(index + 1) {
        return NextStep::Advance(next);
    }

    match repeat {
        RepeatMode::All => NextStep::Advance(&active[0]),
        RepeatMode::Off | RepeatMode::One => NextStep::EndOfQueue,
    }
}

/// Track before `current` in `active`
///
/// Always wraps from the first track to the last, whatever the repeat mode.
/// Returns `None` if `current` is not in `active`.
pub fn compute_previous<'a>(active: &'a [Track], current: &TrackId) -> Option<&'a Track> {
    let index = active.iter().position(|t| &t.id == current)?;
    let previous = if index == 0 {
        active.len() - 1
    } else {
        index - 1
    };
    active.get(previous)
}

/// Queue plus derived shuffled order
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    /// Tracks in browsing order
    queue: Vec<Track>,

    /// Anchored permutation of `queue` (empty while shuffle is off)
    shuffled: Vec<Track>,

    /// Whether `shuffled` governs navigation
    shuffle_active: bool,
}

impl PlayQueue {
    /// Create new empty queue
    pub fn new(shuffle_active: bool) -> Self {
        Self {
            queue: Vec::new(),
            shuffled: Vec::new(),
            shuffle_active,
        }
    }

    /// Queue governing next/previous
    pub fn active(&self) -> &[Track] {
        if self.shuffle_active {
            &self.shuffled
        } else {
            &self.queue
        }
    }

    /// Tracks in browsing order
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Shuffled order (empty while shuffle is off)
    pub fn shuffled(&self) -> &[Track] {
        &self.shuffled
    }

    /// Check if shuffle is on
    pub fn is_shuffle_active(&self) -> bool {
        self.shuffle_active
    }

    /// Replace the queue, rebuilding the shuffled order around `anchor`
    pub fn replace(&mut self, tracks: Vec<Track>, anchor: Option<&Track>, rng: &mut dyn RngCore) {
        self.queue = tracks;
        self.rebuild_shuffled(anchor, rng);
    }

    /// Turn shuffle on, anchoring the new order at `anchor`
    ///
    /// With no anchor (nothing playing) the shuffled order stays empty.
    pub fn enable_shuffle(&mut self, anchor: Option<&Track>, rng: &mut dyn RngCore) {
        self.shuffle_active = true;
        self.rebuild_shuffled(anchor, rng);
    }

    /// Turn shuffle off and discard the shuffled order
    pub fn disable_shuffle(&mut self) {
        self.shuffle_active = false;
        self.shuffled.clear();
    }

    /// Recompute the shuffled order from the queue (no-op while shuffle is off)
    pub fn rebuild_shuffled(&mut self, anchor: Option<&Track>, rng: &mut dyn RngCore) {
        self.shuffled = match (self.shuffle_active, anchor) {
            (true, Some(anchor)) => build_shuffled_queue(&self.queue, anchor, rng),
            _ => Vec::new(),
        };
    }

    /// Next step from `current` in the active queue
    pub fn next_after(&self, current: &TrackId, repeat: RepeatMode) -> NextStep<'_> {
        compute_next(self.active(), current, repeat)
    }

    /// Previous track from `current` in the active queue
    pub fn previous_before(&self, current: &TrackId) -> Option<&Track> {
        compute_previous(self.active(), current)
    }
}
