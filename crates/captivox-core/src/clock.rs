use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

pub const INTERVAL_RANGE: RangeInclusive<u32> = 0..=100;
pub const INTERVAL_DEF: u32 = 35;
pub const FIRST_FRAME: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

/// Frame counter advanced by a repaint timer.
///
/// The clock runs only while both the tick interval and the animation speed
/// are nonzero. Hosts call [`poll`](Self::poll) with the current time; at most
/// one tick fires per poll, so a late host sees coalesced ticks the way a UI
/// timer would deliver them.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    frame_no: u64,
    interval_ms: u32,
    speed_mult: u32,
    last_tick: Option<Instant>,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(INTERVAL_DEF, crate::params::SPEED_MULT_DEF)
    }
}

impl AnimationClock {
    pub fn new(interval_ms: u32, speed_mult: u32) -> Self {
        Self {
            frame_no: FIRST_FRAME,
            interval_ms,
            speed_mult,
            last_tick: None,
        }
    }

    pub fn frame_no(&self) -> u64 {
        self.frame_no
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms as u64)
    }

    pub fn state(&self) -> ClockState {
        if self.interval_ms == 0 || self.speed_mult == 0 {
            ClockState::Paused
        } else {
            ClockState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == ClockState::Running
    }

    /// Playback rate implied by the tick interval, `None` while paused.
    pub fn fps(&self) -> Option<f64> {
        self.is_running().then(|| 1000.0 / self.interval_ms as f64)
    }

    /// Change the tick delay. Returns the new state if it changed.
    pub fn set_interval(&mut self, interval_ms: u32) -> Option<ClockState> {
        let before = self.state();
        self.interval_ms = interval_ms;
        self.transition_from(before)
    }

    /// Mirror the animation speed. Returns the new state if it changed.
    pub fn set_speed_mult(&mut self, speed_mult: u32) -> Option<ClockState> {
        let before = self.state();
        self.speed_mult = speed_mult;
        self.transition_from(before)
    }

    fn transition_from(&mut self, before: ClockState) -> Option<ClockState> {
        let after = self.state();
        if before == after {
            return None;
        }
        // Re-arm on the next poll instead of firing a backlog of ticks.
        self.last_tick = None;
        log::debug!("animation clock {:?} -> {:?} at frame {}", before, after, self.frame_no);
        Some(after)
    }

    /// Fire a tick if one is due. Returns the frame number to draw.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        match self.last_tick {
            None => {
                self.last_tick = Some(now);
                None
            }
            Some(last) if now.saturating_duration_since(last) >= self.interval() => {
                self.last_tick = Some(now);
                Some(self.advance())
            }
            Some(_) => None,
        }
    }

    /// Time until the next tick is due, `None` while paused.
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        if !self.is_running() {
            return None;
        }
        Some(match self.last_tick {
            None => Duration::ZERO,
            Some(last) => self.interval().saturating_sub(now.saturating_duration_since(last)),
        })
    }

    /// Draw the current frame and move on to the next one.
    pub fn advance(&mut self) -> u64 {
        let shown = self.frame_no;
        self.frame_no += 1;
        shown
    }

    /// Redraw request for a parameter change while paused.
    ///
    /// Steps back one frame and advances again, so the preview shows the
    /// last drawn frame and `frame_no` is unchanged afterwards. Returns
    /// `None` while running, since the next tick redraws anyway.
    pub fn preview(&mut self) -> Option<u64> {
        if self.is_running() {
            return None;
        }
        self.frame_no -= 1;
        Some(self.advance())
    }

    pub fn reset(&mut self) {
        self.frame_no = FIRST_FRAME;
        self.last_tick = None;
    }
}
