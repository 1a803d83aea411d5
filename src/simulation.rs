//! Discrete-time car/obstacle braking model.
//!
//! One call to [`BrakingSimulation::step`] is one frame. A tick that starts
//! braking already decelerates, and a tick that stops already counts down the
//! wait, but the stop check waits for the next tick so that a tick never goes
//! from `Moving` straight to `Waiting`.

use log::debug;

use crate::policy::Policy;
use crate::random::RandomSource;

pub const CAR_WIDTH: f64 = 80.0;
pub const CAR_HEIGHT: f64 = 40.0;
pub const OBSTACLE_WIDTH: f64 = 30.0;
pub const OBSTACLE_HEIGHT: f64 = 30.0;
/// Road-panel y of the lane the car drives in.
pub const LANE_Y: f64 = 118.0;
pub const SAFE_GAP: f64 = 6.0;
pub const WAIT_TIME: i32 = 120;
pub const MAX_SPEED: f64 = 120.0;
pub const ACCELERATION: f64 = 1.0;
pub const DECELERATION: f64 = 3.0;
pub const STOPPING_DIVISOR: f64 = 220.0;
pub const POSITION_PER_SPEED: f64 = 0.02;

pub const START_POSITION: f64 = 50.0;
pub const INITIAL_OBSTACLE_POSITION: f64 = 420.0;
pub const OBSTACLE_MIN: f64 = 300.0;
pub const OBSTACLE_SPREAD: f64 = 160.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Moving,
    Braking,
    Waiting,
}

/// Which pedal the driver is pressing this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pedal {
    #[default]
    None,
    Gas,
    Brake,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    pub car_position: f64,
    pub obstacle_position: f64,
    pub speed: f64,
    pub phase: Phase,
    /// Only meaningful while `Waiting`; allowed to drop below zero.
    pub wait_ticks_remaining: i32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            car_position: START_POSITION,
            obstacle_position: INITIAL_OBSTACLE_POSITION,
            speed: 0.0,
            phase: Phase::Moving,
            wait_ticks_remaining: 0,
        }
    }
}

impl SimulationState {
    pub fn front_of_car(&self) -> f64 {
        self.car_position + CAR_WIDTH
    }

    pub fn gap(&self) -> f64 {
        self.obstacle_position - self.front_of_car()
    }
}

/// Distance the car needs to stop from `speed`, before policy scaling.
pub fn stopping_distance(speed: f64) -> f64 {
    speed * speed / STOPPING_DIVISOR
}

/// Gap at or below which a moving car starts braking under `policy`.
pub fn brake_threshold(policy: &Policy, speed: f64) -> f64 {
    policy.base_offset + stopping_distance(speed) * policy.mode_factor + SAFE_GAP
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub from: Phase,
    pub to: Phase,
    pub pedal: Pedal,
    pub gap: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone)]
pub struct BrakingSimulation {
    state: SimulationState,
}

impl Default for BrakingSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl BrakingSimulation {
    pub fn new() -> Self {
        Self::with_state(SimulationState::default())
    }

    pub fn with_state(mut state: SimulationState) -> Self {
        state.speed = state.speed.clamp(0.0, MAX_SPEED);
        Self { state }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn speed(&self) -> f64 {
        self.state.speed
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn step(&mut self, policy: &Policy, rng: &mut impl RandomSource) -> StepReport {
        let from = self.state.phase;
        let gap = self.state.gap();
        let threshold = brake_threshold(policy, self.state.speed);
        let mut pedal = Pedal::None;

        match self.state.phase {
            Phase::Moving => {
                if gap <= threshold {
                    self.state.phase = Phase::Braking;
                    self.state.speed -= DECELERATION;
                    pedal = Pedal::Brake;
                    debug!(
                        "{} policy braking at gap {:.2} (threshold {:.2}, speed {:.0})",
                        policy.mode, gap, threshold, self.state.speed
                    );
                } else {
                    self.state.speed += ACCELERATION;
                    pedal = Pedal::Gas;
                }
            }
            Phase::Braking => {
                self.state.speed -= DECELERATION;
                pedal = Pedal::Brake;
                // Arrival is checked before the speed test; both stop identically.
                if gap <= 0.0 || self.state.speed <= 0.0 {
                    self.state.speed = 0.0;
                    self.state.phase = Phase::Waiting;
                    // The stop tick is the first tick of the wait.
                    self.state.wait_ticks_remaining = WAIT_TIME - 1;
                    debug!("stopped with gap {:.2}", gap);
                }
            }
            Phase::Waiting => {
                self.state.wait_ticks_remaining -= 1;
                if self.state.wait_ticks_remaining <= 0 {
                    self.reset(rng);
                }
            }
        }

        self.state.speed = self.state.speed.clamp(0.0, MAX_SPEED);
        self.state.car_position += self.state.speed * POSITION_PER_SPEED;

        StepReport {
            from,
            to: self.state.phase,
            pedal,
            gap,
            threshold,
        }
    }

    pub fn reset(&mut self, rng: &mut impl RandomSource) {
        self.state.car_position = START_POSITION;
        self.state.obstacle_position = OBSTACLE_MIN + rng.next_unit() * OBSTACLE_SPREAD;
        self.state.speed = 0.0;
        self.state.phase = Phase::Moving;
        debug!("reset, obstacle at {:.1}", self.state.obstacle_position);
    }
}
