//! Audio output device contract
//!
//! Abstracts the single audio sink (an `<audio>` element in a browser) the
//! session drives. The device is a collaborator: it does the decoding and
//! rendering, the session only issues transport commands and reacts to the
//! signals the device reports.

use crate::error::Result;
use crate::types::AudioHandle;

/// Single-track audio output
///
/// Exclusively owned by one `PlaybackSession`; nothing else may command it.
/// Commands are fire-and-forget. A `play()` that fails immediately returns an
/// error; one that fails later (e.g. a rejected promise) is reported as
/// [`DeviceSignal::PlayRejected`] carrying the [`PlayAttempt`] that `play()`
/// returned.
pub trait AudioOutput {
    /// Load a new source, replacing the current one
    fn set_source(&mut self, source: &AudioHandle);

    /// Start or resume playback of the loaded source
    ///
    /// # Errors
    ///
    /// `PlaybackError::DeviceRejected` when the device refuses synchronously.
    fn play(&mut self) -> Result<PlayAttempt>;

    /// Pause playback
    fn pause(&mut self);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Move to a position in seconds
    ///
    /// Clamping to the valid range is the device's job.
    fn set_current_time(&mut self, seconds: f64);
}

/// Token for one `play()` call
///
/// Late refusals name the attempt they belong to, so one that was superseded
/// by a new source or a pause can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayAttempt(u64);

impl PlayAttempt {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Signals reported by the output device
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceSignal {
    /// Playback position advanced (seconds)
    TimeUpdate(f64),

    /// Duration of the loaded source became known (seconds)
    DurationKnown(f64),

    /// The loaded source played to its end
    Ended,

    /// A previous `play()` was refused asynchronously
    PlayRejected { attempt: PlayAttempt, reason: String },
}

/// Recording output for unit tests
///
/// Remembers every command it received.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct DummyOutput {
    pub calls: Vec<DeviceCall>,
    pub position: f64,
    pub reject_play: bool,
    pub plays: u64,
}

/// Command received by [`DummyOutput`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetSource(String),
    Play,
    Pause,
    Seek(f64),
}

#[cfg(test)]
impl DummyOutput {
    /// Token returned by the most recent `play()`
    pub fn last_attempt(&self) -> PlayAttempt {
        PlayAttempt::new(self.plays)
    }

    /// Last command received
    pub fn last_call(&self) -> Option<&DeviceCall> {
        self.calls.last()
    }
}

#[cfg(test)]
impl AudioOutput for DummyOutput {
    fn set_source(&mut self, source: &AudioHandle) {
        self.position = 0.0;
        self.calls.push(DeviceCall::SetSource(source.as_str().to_string()));
    }

    fn play(&mut self) -> Result<PlayAttempt> {
        self.calls.push(DeviceCall::Play);
        if self.reject_play {
            return Err(crate::error::PlaybackError::DeviceRejected(
                "autoplay blocked".to_string(),
            ));
        }
        self.plays += 1;
        Ok(self.last_attempt())
    }

    fn pause(&mut self) {
        self.calls.push(DeviceCall::Pause);
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds;
        self.calls.push(DeviceCall::Seek(seconds));
    }
}
