//! Spring animation for the satellite fan.
//!
//! Transitions are described the way the menu thinks about them (a duration
//! and a bounce) and turned into mass/stiffness/damping for an RK4 spring.

use crate::gui::menu::model::{GlassId, MenuState, Offset, SatelliteFrame};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Largest slice of time integrated in one RK4 step.
const MAX_SUBSTEP: f64 = 1.0 / 120.0;
/// Frame gaps longer than this (window hidden, debugger) are clamped.
const MAX_FRAME_DT: f64 = 0.1;
const SETTLE_EPSILON: f64 = 0.5;
const SETTLE_VELOCITY_EPSILON: f64 = 5.0;
/// Quarter turn of the trigger glyph while expanded.
pub const TRIGGER_TURN_DEG: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Value jumps to its target on the next frame.
    Instant,
    Spring { duration: f64, bounce: f64 },
}

impl Transition {
    /// Applied to everything a toggle changes unless a value brings its own.
    pub const AMBIENT: Self = Self::Spring {
        duration: 0.5,
        bounce: 0.0,
    };

    pub fn spring(duration: f64, bounce: f64) -> Self {
        Self::Spring { duration, bounce }
    }

    pub fn resolve(own: Option<Transition>, ambient: Transition) -> Transition {
        own.unwrap_or(ambient)
    }

    pub fn params(&self) -> Option<SpringParams> {
        match *self {
            Self::Instant => None,
            Self::Spring { duration, .. } if duration <= 0.0 => None,
            Self::Spring { duration, bounce } => {
                Some(SpringParams::from_duration_bounce(duration, bounce))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringParams {
    /// `bounce` of 0 is critically damped, positive values overshoot and
    /// negative values are overdamped.
    pub fn from_duration_bounce(duration: f64, bounce: f64) -> Self {
        let omega = 2.0 * PI / duration;
        let damping = if bounce >= 0.0 {
            4.0 * PI * (1.0 - bounce) / duration
        } else {
            4.0 * PI / (duration * (1.0 + bounce))
        };
        Self {
            stiffness: omega * omega,
            damping,
            mass: 1.0,
        }
    }

    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Spring {
    params: Option<SpringParams>,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    pub fn at_rest(value: f64) -> Self {
        Self {
            params: None,
            value,
            velocity: 0.0,
            target: value,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Keeps position and velocity so an interrupted animation carries on smoothly.
    pub fn retarget(&mut self, target: f64, transition: Transition) {
        self.target = target;
        self.params = transition.params();
        if self.params.is_none() {
            self.value = target;
            self.velocity = 0.0;
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < SETTLE_EPSILON
            && self.velocity.abs() < SETTLE_VELOCITY_EPSILON
    }

    pub fn step(&mut self, dt: f64) {
        let Some(params) = self.params else {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        };
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(&params, self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            &params,
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            &params,
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(&params, self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, params: &SpringParams, x: f64, v: f64) -> f64 {
        let spring_force = -params.stiffness * (x - self.target);
        let damping_force = -params.damping * v;
        (spring_force + damping_force) / params.mass
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OffsetSpring {
    x: Spring,
    y: Spring,
}

impl OffsetSpring {
    pub fn at_rest(offset: Offset) -> Self {
        Self {
            x: Spring::at_rest(offset.dx),
            y: Spring::at_rest(offset.dy),
        }
    }

    pub fn current(&self) -> Offset {
        Offset::new(self.x.value(), self.y.value())
    }

    pub fn retarget(&mut self, target: Offset, transition: Transition) {
        self.x.retarget(target.dx, transition);
        self.y.retarget(target.dy, transition);
    }

    pub fn step(&mut self, dt: f64) {
        self.x.step(dt);
        self.y.step(dt);
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }
}

#[derive(Debug, Clone, Copy)]
struct AnimatedSatellite {
    offset: OffsetSpring,
    opacity: f64,
}

/// Animated values behind each glass element, keyed by identity so a
/// satellite keeps its motion across toggles.
#[derive(Debug, Clone)]
pub struct MenuAnimator {
    satellites: HashMap<GlassId, AnimatedSatellite>,
    turns: HashMap<GlassId, Spring>,
}

impl MenuAnimator {
    pub fn new(state: &MenuState) -> Self {
        let satellites = state
            .frames()
            .into_iter()
            .map(|frame| {
                let animated = AnimatedSatellite {
                    offset: OffsetSpring::at_rest(frame.offset),
                    opacity: frame.opacity,
                };
                (frame.id, animated)
            })
            .collect();

        Self {
            satellites,
            turns: HashMap::from([(
                GlassId::trigger(),
                Spring::at_rest(Self::turn_for(state.is_expanded())),
            )]),
        }
    }

    fn turn_for(expanded: bool) -> f64 {
        if expanded { TRIGGER_TURN_DEG } else { 0.0 }
    }

    /// Retargets every satellite with its own transition and anything
    /// without one with `ambient`.
    pub fn apply(&mut self, frames: &[SatelliteFrame], ambient: Transition, expanded: bool) {
        for frame in frames {
            let animated = self
                .satellites
                .entry(frame.id.clone())
                .or_insert_with(|| AnimatedSatellite {
                    offset: OffsetSpring::at_rest(Offset::ZERO),
                    opacity: 0.0,
                });
            animated.offset.retarget(frame.offset, frame.transition);
            animated.opacity = frame.opacity;
        }
        for turn in self.turns.values_mut() {
            turn.retarget(Self::turn_for(expanded), Transition::resolve(None, ambient));
        }
    }

    /// Advances all springs by `dt` seconds. Returns `true` while anything is still moving.
    pub fn step(&mut self, dt: f64) -> bool {
        let mut remaining = dt.clamp(0.0, MAX_FRAME_DT);
        while remaining > 0.0 {
            let slice = remaining.min(MAX_SUBSTEP);
            for animated in self.satellites.values_mut() {
                animated.offset.step(slice);
            }
            for turn in self.turns.values_mut() {
                turn.step(slice);
            }
            remaining -= slice;
        }
        !self.is_settled()
    }

    pub fn is_settled(&self) -> bool {
        self.turns.values().all(Spring::is_settled)
            && self.satellites.values().all(|s| s.offset.is_settled())
    }

    pub fn offset(&self, id: &GlassId) -> Offset {
        self.satellites
            .get(id)
            .map(|s| s.offset.current())
            .unwrap_or_default()
    }

    pub fn opacity(&self, id: &GlassId) -> f64 {
        self.satellites.get(id).map(|s| s.opacity).unwrap_or(0.0)
    }

    /// Rotation of an element's glyph. Only the trigger turns.
    pub fn turn_deg(&self, id: &GlassId) -> f64 {
        self.turns.get(id).map(Spring::value).unwrap_or(0.0)
    }
}
