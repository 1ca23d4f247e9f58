use crate::clock::{AnimationClock, ClockState, INTERVAL_DEF, INTERVAL_RANGE};
use crate::color::Hsv;
use crate::error::ParamError;
use crate::geometry::{frame_primitives, Primitive, Viewport};
use crate::params::{
    check_color, check_range, AnimationParameters, ANGLE_FACTOR_RANGE, DOT_SIZE_RANGE,
    HALFMAX_RANGE, MULTIPLIER_RANGE, NUM_DOTS_RANGE, SPEED_MULT_RANGE,
};
use crossbeam::channel::{self, Receiver, Sender};
use std::time::Instant;

/// A single change requested by a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    AngleFactor(u32),
    NumDots(u32),
    DotSize(u32),
    XMultiplier(u32),
    YMultiplier(u32),
    Halfmax(u32),
    SpeedMult(u32),
    /// Tick delay in milliseconds. 0 pauses the clock.
    Interval(u32),
    JoinEndDots(bool),
    DrawAxes(bool),
    DrawLines(bool),
    ConnectLines(bool),
    ColorStart(Hsv),
    ColorEnd(Hsv),
    /// Restore every parameter and the tick delay, and rewind to frame 1.
    ResetDefaults,
}

/// Notifications published to subscribers of an [`Animation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent {
    /// An update was applied.
    Changed(ParamUpdate),
    /// The clock started or stopped.
    StateChanged(ClockState),
    /// The given frame should be drawn.
    Redraw { frame_no: u64 },
}

/// Owns the parameters and the clock, and is the single entry point for
/// mutating them.
///
/// Every applied update is broadcast to subscribers. While the clock is
/// paused, an update also triggers one preview redraw without advancing the
/// animation.
pub struct Animation {
    params: AnimationParameters,
    clock: AnimationClock,
    subscribers: Vec<Sender<AnimationEvent>>,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(AnimationParameters::default(), INTERVAL_DEF)
    }
}

impl Animation {
    pub fn new(params: AnimationParameters, interval_ms: u32) -> Self {
        let clock = AnimationClock::new(interval_ms, params.speed_mult);
        Self {
            params,
            clock,
            subscribers: Vec::new(),
        }
    }

    pub fn params(&self) -> &AnimationParameters {
        &self.params
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Register an observer. Receivers that are dropped are forgotten on
    /// the next publish.
    pub fn subscribe(&mut self) -> Receiver<AnimationEvent> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: AnimationEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Validate and apply one update.
    ///
    /// Returns the frame number of the preview redraw if the clock is
    /// paused after the update. Rejected updates leave all state untouched.
    pub fn apply(&mut self, update: ParamUpdate) -> Result<Option<u64>, ParamError> {
        let p = &mut self.params;
        let mut transition = None;
        match update {
            ParamUpdate::AngleFactor(v) => {
                check_range("angle_factor", v, ANGLE_FACTOR_RANGE)?;
                p.angle_factor = v;
            }
            ParamUpdate::NumDots(v) => {
                check_range("num_dots", v, NUM_DOTS_RANGE)?;
                p.num_dots = v;
            }
            ParamUpdate::DotSize(v) => {
                check_range("dot_size", v, DOT_SIZE_RANGE)?;
                p.dot_size = v;
            }
            ParamUpdate::XMultiplier(v) => {
                check_range("x_multiplier", v, MULTIPLIER_RANGE)?;
                p.x_multiplier = v;
            }
            ParamUpdate::YMultiplier(v) => {
                check_range("y_multiplier", v, MULTIPLIER_RANGE)?;
                p.y_multiplier = v;
            }
            ParamUpdate::Halfmax(v) => {
                check_range("halfmax", v, HALFMAX_RANGE)?;
                p.halfmax = v;
            }
            ParamUpdate::SpeedMult(v) => {
                check_range("speed_mult", v, SPEED_MULT_RANGE)?;
                p.speed_mult = v;
                transition = self.clock.set_speed_mult(v);
            }
            ParamUpdate::Interval(v) => {
                check_range("interval_ms", v, INTERVAL_RANGE)?;
                transition = self.clock.set_interval(v);
            }
            ParamUpdate::JoinEndDots(v) => p.join_end_dots = v,
            ParamUpdate::DrawAxes(v) => p.draw_axes = v,
            ParamUpdate::DrawLines(v) => p.draw_lines = v,
            ParamUpdate::ConnectLines(v) => p.connect_lines = v,
            ParamUpdate::ColorStart(c) => {
                check_color(c)?;
                p.color_start = c;
            }
            ParamUpdate::ColorEnd(c) => {
                check_color(c)?;
                p.color_end = c;
            }
            ParamUpdate::ResetDefaults => {
                *p = AnimationParameters::default();
                let before = self.clock.state();
                self.clock.set_speed_mult(p.speed_mult);
                self.clock.set_interval(INTERVAL_DEF);
                self.clock.reset();
                let after = self.clock.state();
                transition = (before != after).then_some(after);
            }
        }

        self.publish(AnimationEvent::Changed(update));
        if let Some(state) = transition {
            self.publish(AnimationEvent::StateChanged(state));
        }

        let preview = self.clock.preview();
        if let Some(frame_no) = preview {
            self.publish(AnimationEvent::Redraw { frame_no });
        }
        Ok(preview)
    }

    /// Advance the clock if a tick is due, publishing the redraw.
    pub fn tick(&mut self, now: Instant) -> Option<u64> {
        let frame_no = self.clock.poll(now)?;
        self.publish(AnimationEvent::Redraw { frame_no });
        Some(frame_no)
    }

    /// Draw calls for `frame_no` with the current parameters.
    pub fn primitives(
        &self,
        frame_no: u64,
        viewport: Viewport,
    ) -> Result<impl Iterator<Item = Primitive>, ParamError> {
        frame_primitives(&self.params, frame_no as f64, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &Receiver<AnimationEvent>) -> Vec<AnimationEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_running_update_has_no_preview() {
        let mut anim = Animation::default();
        let rx = anim.subscribe();
        assert_eq!(anim.apply(ParamUpdate::NumDots(12)), Ok(None));
        assert_eq!(anim.params().num_dots, 12);
        assert_eq!(drain(&rx), vec![AnimationEvent::Changed(ParamUpdate::NumDots(12))]);
    }

    #[test]
    fn test_pause_publishes_state_and_preview() {
        let mut anim = Animation::default();
        let rx = anim.subscribe();
        assert_eq!(anim.apply(ParamUpdate::SpeedMult(0)), Ok(Some(0)));
        assert_eq!(
            drain(&rx),
            vec![
                AnimationEvent::Changed(ParamUpdate::SpeedMult(0)),
                AnimationEvent::StateChanged(ClockState::Paused),
                AnimationEvent::Redraw { frame_no: 0 },
            ]
        );
        assert_eq!(anim.clock().frame_no(), 1);
    }

    #[test]
    fn test_rejected_update_leaves_state() {
        let mut anim = Animation::default();
        let rx = anim.subscribe();
        assert!(anim.apply(ParamUpdate::NumDots(1)).is_err());
        assert!(anim.apply(ParamUpdate::ColorEnd(Hsv::new(-1.0, 0.0, 0.0))).is_err());
        assert_eq!(anim.params(), &AnimationParameters::default());
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let mut anim = Animation::default();
        drop(anim.subscribe());
        let rx = anim.subscribe();
        anim.apply(ParamUpdate::DrawAxes(true)).unwrap();
        assert_eq!(anim.subscribers.len(), 1);
        assert_eq!(drain(&rx).len(), 1);
    }

    #[test]
    fn test_reset_defaults_rewinds() {
        let mut anim = Animation::default();
        anim.apply(ParamUpdate::Halfmax(20)).unwrap();
        anim.apply(ParamUpdate::Interval(0)).unwrap();
        anim.apply(ParamUpdate::ResetDefaults).unwrap();
        assert_eq!(anim.params(), &AnimationParameters::default());
        assert_eq!(anim.clock().interval_ms(), INTERVAL_DEF);
        assert_eq!(anim.clock().frame_no(), 1);
        assert!(anim.clock().is_running());
    }

    #[test]
    fn test_tick_publishes_redraw() {
        let mut anim = Animation::new(AnimationParameters::default(), 10);
        let rx = anim.subscribe();
        let t0 = Instant::now();
        assert_eq!(anim.tick(t0), None);
        assert_eq!(anim.tick(t0 + std::time::Duration::from_millis(10)), Some(1));
        assert_eq!(drain(&rx), vec![AnimationEvent::Redraw { frame_no: 1 }]);
    }
}
