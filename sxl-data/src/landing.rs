//! Booster landing classification.

use serde::{Serialize, Serializer};
use std::fmt;

/// How a booster was recovered (or meant to be).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LandingType {
    /// Return to launch site, landing on a ground pad.
    GroundPad,
    /// Autonomous drone ship at sea.
    DroneShip,
    /// Controlled splashdown in the ocean.
    Ocean,
    /// No landing type reported.
    None,
    /// Any other upstream value, kept verbatim.
    Other(String),
}

impl LandingType {
    /// Accepts the upstream codes (`RTLS`, `ASDS`, `Ocean`) as well as the
    /// descriptive spellings (`ground-pad`, `drone-ship`, `ocean`).
    pub fn parse(value: &str) -> LandingType {
        match value.trim() {
            "" => LandingType::None,
            "RTLS" | "ground-pad" => LandingType::GroundPad,
            "ASDS" | "drone-ship" => LandingType::DroneShip,
            "Ocean" | "ocean" => LandingType::Ocean,
            other => LandingType::Other(other.to_string()),
        }
    }

    pub fn from_option(value: Option<&str>) -> LandingType {
        value.map(LandingType::parse).unwrap_or(LandingType::None)
    }

    pub fn label(&self) -> &str {
        match self {
            LandingType::GroundPad => "ground pad",
            LandingType::DroneShip => "drone ship",
            LandingType::Ocean => "ocean",
            LandingType::None => "none",
            LandingType::Other(value) => value.as_str(),
        }
    }
}

impl fmt::Display for LandingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for LandingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The eight landing outcome labels used in landing reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LandingOutcome {
    SuccessGroundPad,
    SuccessDroneShip,
    SuccessOcean,
    SuccessOther,
    FailureGroundPad,
    FailureDroneShip,
    FailureOcean,
    FailureOther,
}

impl LandingOutcome {
    /// Pure function of the success flag and the landing type. Anything that
    /// is not a ground pad, drone ship or ocean landing is "other".
    pub fn classify(landing_success: bool, landing_type: &LandingType) -> LandingOutcome {
        match (landing_success, landing_type) {
            (true, LandingType::GroundPad) => LandingOutcome::SuccessGroundPad,
            (true, LandingType::DroneShip) => LandingOutcome::SuccessDroneShip,
            (true, LandingType::Ocean) => LandingOutcome::SuccessOcean,
            (true, _) => LandingOutcome::SuccessOther,
            (false, LandingType::GroundPad) => LandingOutcome::FailureGroundPad,
            (false, LandingType::DroneShip) => LandingOutcome::FailureDroneShip,
            (false, LandingType::Ocean) => LandingOutcome::FailureOcean,
            (false, _) => LandingOutcome::FailureOther,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            LandingOutcome::SuccessGroundPad
                | LandingOutcome::SuccessDroneShip
                | LandingOutcome::SuccessOcean
                | LandingOutcome::SuccessOther
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            LandingOutcome::SuccessGroundPad => "Success (ground pad)",
            LandingOutcome::SuccessDroneShip => "Success (drone ship)",
            LandingOutcome::SuccessOcean => "Success (ocean)",
            LandingOutcome::SuccessOther => "Success (other)",
            LandingOutcome::FailureGroundPad => "Failure (ground pad)",
            LandingOutcome::FailureDroneShip => "Failure (drone ship)",
            LandingOutcome::FailureOcean => "Failure (ocean)",
            LandingOutcome::FailureOther => "Failure (other)",
        }
    }
}

impl fmt::Display for LandingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for LandingOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classify a landing from its success flag and raw landing type string.
pub fn classify_landing_outcome(landing_success: bool, landing_type: &str) -> LandingOutcome {
    LandingOutcome::classify(landing_success, &LandingType::parse(landing_type))
}
