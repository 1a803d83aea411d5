use std::fmt;
use std::str::FromStr;

use crate::config::Color;
use crate::error::SimulatorError;

/// The three driving-risk profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyMode {
    Cautious,
    Risky,
    Timid,
}

impl PolicyMode {
    pub const ALL: [PolicyMode; 3] = [PolicyMode::Cautious, PolicyMode::Risky, PolicyMode::Timid];

    pub const fn name(self) -> &'static str {
        match self {
            PolicyMode::Cautious => "cautious",
            PolicyMode::Risky => "risky",
            PolicyMode::Timid => "timid",
        }
    }
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyMode {
    type Err = SimulatorError;

    /// Accepts the canonical names and the legacy `prudente`/`arriesgada`/`timida` keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cautious" | "prudente" => Ok(PolicyMode::Cautious),
            "risky" | "arriesgada" => Ok(PolicyMode::Risky),
            "timid" | "timida" => Ok(PolicyMode::Timid),
            _ => Err(SimulatorError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Decision boundary `y = slope * x + intercept` plus braking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub mode: PolicyMode,
    pub slope: f64,
    pub intercept: f64,
    /// Minimum braking lead distance.
    pub base_offset: f64,
    /// Multiplier on the speed-squared stopping term.
    pub mode_factor: f64,
    pub color: Color,
}

impl Policy {
    pub fn boundary_y(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

const CAUTIOUS: Policy = Policy {
    mode: PolicyMode::Cautious,
    slope: -4.0,
    intercept: 2.5,
    base_offset: 28.0,
    mode_factor: 1.0,
    color: Color::new(0x00, 0x80, 0x00),
};

const RISKY: Policy = Policy {
    mode: PolicyMode::Risky,
    slope: -0.68,
    intercept: 2.0,
    base_offset: -100.0,
    mode_factor: 0.75,
    color: Color::new(0xff, 0x00, 0x00),
};

const TIMID: Policy = Policy {
    mode: PolicyMode::Timid,
    slope: -1.13,
    intercept: 0.45,
    base_offset: 95.0,
    mode_factor: 1.0,
    color: Color::new(0xff, 0xa5, 0x00),
};

/// Read-only table of the three policies.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyCatalog;

impl PolicyCatalog {
    pub const fn new() -> Self {
        Self
    }

    pub const fn get(&self, mode: PolicyMode) -> Policy {
        match mode {
            PolicyMode::Cautious => CAUTIOUS,
            PolicyMode::Risky => RISKY,
            PolicyMode::Timid => TIMID,
        }
    }

    /// Resolves a raw mode name. Unknown names are an error, never a default.
    pub fn lookup(&self, name: &str) -> Result<Policy, SimulatorError> {
        name.parse::<PolicyMode>().map(|mode| self.get(mode))
    }
}
