use serde::{Deserialize, Serialize};

use crate::orient;

/// Planar attitude in degrees: azimuth of the downward-steepest direction and
/// inclination from horizontal.
///
/// A horizontal plane (`dip == 0`) has an undefined dip direction; conversions
/// report whatever `atan2` yields for the degenerate pole.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneAttitude {
    /// Dip direction azimuth in [0, 360)
    pub dip_direction: f64,
    /// Dip angle in [0, 90]
    pub dip: f64,
}

impl PlaneAttitude {
    pub fn new(dip_direction: f64, dip: f64) -> Self {
        Self { dip_direction, dip }
    }

    /// Lower-hemisphere pole (unit normal) of the plane.
    pub fn pole(&self) -> nalgebra::Vector3<f64> {
        orient::plane_to_dcos(self.dip_direction, self.dip)
    }
}

/// Linear attitude in degrees: azimuth and downward angle of a line.
///
/// A vertical line (`plunge == 90`) has an undefined trend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineAttitude {
    /// Trend azimuth in [0, 360)
    pub trend: f64,
    /// Plunge angle in [0, 90]
    pub plunge: f64,
}

impl LineAttitude {
    pub fn new(trend: f64, plunge: f64) -> Self {
        Self { trend, plunge }
    }

    /// Lower-hemisphere unit direction vector of the line.
    pub fn to_dcos(&self) -> nalgebra::Vector3<f64> {
        orient::line_to_dcos(self.trend, self.plunge)
    }
}
