//! Labelled timelines
//!
//! A timeline is a fixed list of entries, each placed at an absolute start
//! time resolved when the entry is added. Placement is expressed with a
//! [`Position`]: an absolute time, relative to the current end, or relative
//! to a named label.
//!
//! Timelines never touch render state. Ticking one produces
//! [`TimelineEvent`]s that the owner drains and applies.
//!
//! # Example
//!
//! ```rust
//! use deckswap_animation::{Easing, Position, Timeline, TimelineEvent};
//! use deckswap_core::{Property, TargetId, TrackKey};
//!
//! let key = TrackKey::new(TargetId(0), Property::Y);
//! let mut timeline = Timeline::new();
//! timeline.seed(key, 0.0);
//! timeline.to(key, 500.0, 800.0, Easing::EaseInOutQuad, Position::End);
//! timeline.add_label("settle", Position::FromEnd(-200.0));
//! timeline.cue(1, Position::label("settle"));
//!
//! timeline.start();
//! timeline.tick(1_000.0);
//! let events = timeline.drain_events();
//! assert!(events.contains(&TimelineEvent::Cue(1)));
//! assert!(timeline.is_finished());
//! ```

use crate::easing::Easing;
use deckswap_core::TrackKey;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Where a new entry or label is placed
#[derive(Clone, Debug, PartialEq)]
pub enum Position {
    /// Absolute time in milliseconds
    At(f32),
    /// The current end of the timeline
    End,
    /// The current end plus an offset, which may be negative
    FromEnd(f32),
    /// A previously added label
    Label(String),
    /// A previously added label plus an offset
    LabelOffset(String, f32),
}

impl Position {
    pub fn label(name: impl Into<String>) -> Self {
        Position::Label(name.into())
    }

    pub fn label_offset(name: impl Into<String>, offset_ms: f32) -> Self {
        Position::LabelOffset(name.into(), offset_ms)
    }
}

/// Output of ticking a timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineEvent {
    /// A track took a new value
    Write { key: TrackKey, value: f32 },
    /// A cue marker was passed
    Cue(u32),
    /// The playhead passed the end; emitted once per playback
    Completed,
}

/// Events produced between two drains
pub type EventBatch = SmallVec<[TimelineEvent; 16]>;

#[derive(Clone, Debug)]
enum Action {
    Tween {
        key: TrackKey,
        to: f32,
        easing: Easing,
        /// Captured the first time the entry becomes active
        from: Option<f32>,
    },
    Set {
        key: TrackKey,
        value: f32,
    },
    Cue(u32),
}

#[derive(Clone, Debug)]
struct Entry {
    start_ms: f32,
    duration_ms: f32,
    action: Action,
    done: bool,
}

impl Entry {
    fn progress_at(&self, time_ms: f32) -> f32 {
        if time_ms < self.start_ms {
            0.0
        } else if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((time_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Playback {
    Idle,
    Playing,
    Paused,
    Finished,
}

/// An ordered set of tweens, sets and cues on a shared clock
#[derive(Clone, Debug)]
pub struct Timeline {
    /// Sorted by start time; equal starts keep insertion order
    entries: Vec<Entry>,
    labels: FxHashMap<String, f32>,
    /// Last value written (or seeded) per track
    values: FxHashMap<TrackKey, f32>,
    end_ms: f32,
    time_ms: f32,
    playback: Playback,
    events: EventBatch,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            labels: FxHashMap::default(),
            values: FxHashMap::default(),
            end_ms: 0.0,
            time_ms: 0.0,
            playback: Playback::Idle,
            events: EventBatch::new(),
        }
    }

    /// Record the value a track holds before the timeline touches it
    ///
    /// Tweens start from the latest known value of their track. Unseeded
    /// tracks start at the tween's own target, which makes the tween a no-op.
    pub fn seed(&mut self, key: TrackKey, value: f32) {
        self.values.insert(key, value);
    }

    /// Last value written to (or seeded for) a track
    pub fn value(&self, key: TrackKey) -> Option<f32> {
        self.values.get(&key).copied()
    }

    /// Add a named label and return its resolved time
    pub fn add_label(&mut self, name: impl Into<String>, position: Position) -> f32 {
        let at = self.resolve(&position);
        self.labels.insert(name.into(), at);
        at
    }

    pub fn label_time(&self, name: &str) -> Option<f32> {
        self.labels.get(name).copied()
    }

    /// Tween a track from its current value to `value`
    pub fn to(
        &mut self,
        key: TrackKey,
        value: f32,
        duration_ms: f32,
        easing: Easing,
        position: Position,
    ) {
        let start = self.resolve(&position);
        self.push(
            start,
            duration_ms.max(0.0),
            Action::Tween {
                key,
                to: value,
                easing,
                from: None,
            },
        )
    }

    /// Write a track instantly
    pub fn set(&mut self, key: TrackKey, value: f32, position: Position) {
        let start = self.resolve(&position);
        self.push(start, 0.0, Action::Set { key, value })
    }

    /// Emit [`TimelineEvent::Cue`] when the playhead reaches `position`
    pub fn cue(&mut self, cue: u32, position: Position) {
        let start = self.resolve(&position);
        self.push(start, 0.0, Action::Cue(cue))
    }

    fn push(&mut self, start_ms: f32, duration_ms: f32, action: Action) {
        let index = self.entries.partition_point(|e| e.start_ms <= start_ms);
        self.entries.insert(
            index,
            Entry {
                start_ms,
                duration_ms,
                action,
                done: false,
            },
        );
        self.end_ms = self.end_ms.max(start_ms + duration_ms);
    }

    fn resolve(&self, position: &Position) -> f32 {
        let at = match position {
            Position::At(ms) => *ms,
            Position::End => self.end_ms,
            Position::FromEnd(offset) => self.end_ms + offset,
            Position::Label(name) => self.label_or_end(name),
            Position::LabelOffset(name, offset) => self.label_or_end(name) + offset,
        };
        at.max(0.0)
    }

    fn label_or_end(&self, name: &str) -> f32 {
        match self.labels.get(name) {
            Some(at) => *at,
            None => {
                tracing::warn!("Timeline: unknown label '{}', placing at end", name);
                self.end_ms
            }
        }
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Play from the beginning
    pub fn start(&mut self) {
        self.time_ms = 0.0;
        for entry in &mut self.entries {
            entry.done = false;
            if let Action::Tween { from, .. } = &mut entry.action {
                *from = None;
            }
        }
        self.playback = Playback::Playing;
    }

    /// Freeze at the current time; ticks are ignored until [`resume`](Self::resume)
    pub fn pause(&mut self) {
        if self.playback == Playback::Playing {
            self.playback = Playback::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.playback == Playback::Paused {
            self.playback = Playback::Playing;
        }
    }

    /// Halt without completing; no `Completed` event is emitted
    pub fn stop(&mut self) {
        self.playback = Playback::Idle;
    }

    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.playback == Playback::Paused
    }

    pub fn is_finished(&self) -> bool {
        self.playback == Playback::Finished
    }

    pub fn duration_ms(&self) -> f32 {
        self.end_ms
    }

    pub fn time_ms(&self) -> f32 {
        self.time_ms
    }

    /// Overall progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        if self.end_ms <= 0.0 {
            return if self.playback == Playback::Finished {
                1.0
            } else {
                0.0
            };
        }
        (self.time_ms / self.end_ms).clamp(0.0, 1.0)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Advance the playhead by `dt_ms` and emit events for everything it crossed
    pub fn tick(&mut self, dt_ms: f32) {
        if self.playback != Playback::Playing {
            return;
        }
        self.time_ms += dt_ms.max(0.0);

        let time = self.time_ms;
        let Self {
            entries,
            values,
            events,
            ..
        } = self;

        for entry in entries.iter_mut() {
            if entry.start_ms > time {
                break;
            }
            if entry.done {
                continue;
            }

            let progress = entry.progress_at(time);
            match &mut entry.action {
                Action::Set { key, value } => {
                    values.insert(*key, *value);
                    events.push(TimelineEvent::Write {
                        key: *key,
                        value: *value,
                    });
                    entry.done = true;
                }
                Action::Cue(cue) => {
                    events.push(TimelineEvent::Cue(*cue));
                    entry.done = true;
                }
                Action::Tween {
                    key,
                    to,
                    easing,
                    from,
                } => {
                    let (key, to) = (*key, *to);
                    let start = *from.get_or_insert_with(|| values.get(&key).copied().unwrap_or(to));
                    let value = if progress >= 1.0 {
                        to
                    } else {
                        lerp(start, to, easing.apply(progress))
                    };
                    values.insert(key, value);
                    events.push(TimelineEvent::Write { key, value });
                    entry.done = progress >= 1.0;
                }
            }
        }

        if time >= self.end_ms {
            self.playback = Playback::Finished;
            self.events.push(TimelineEvent::Completed);
        }
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> EventBatch {
        std::mem::take(&mut self.events)
    }
}

/// `t` leaves `[0, 1]` under elastic curves
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}
