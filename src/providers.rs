//! # Wind and boat-speed provider seams
//!
//! The simulation passes are written against two blocking request/reply
//! collaborators: a [`WindOracle`] answering true wind speed and direction for a
//! time and position, and a [`PolarTable`] answering achievable boat speed and
//! optimal sailing angles for a wind speed. In the host application both are
//! served over a plugin message channel; here they are traits, with in-memory
//! implementations for standalone use and tests.
//!
//! Both collaborators signal "unknown" with `-1` sentinels rather than errors:
//! a failed lookup degrades the affected command, it does not abort a pass.

use hifitime::Epoch;

use crate::constants::{Degree, Knots, UNKNOWN};
use crate::geodesy::Position;

/// One answer from the wind oracle: true wind speed (knots) and true wind
/// direction (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindSample {
    pub tws: Knots,
    pub twd: Degree,
}

impl WindSample {
    /// The sentinel answer for a position/time the oracle cannot resolve.
    pub const UNKNOWN: WindSample = WindSample {
        tws: UNKNOWN,
        twd: UNKNOWN,
    };

    pub fn is_unknown(&self) -> bool {
        self.tws < 0.0
    }
}

/// True wind source, queried once per delayed command and once per track-builder
/// DC boundary.
pub trait WindOracle {
    fn query(&self, at: Epoch, position: Position) -> WindSample;
}

/// Boat polar: achievable speed through water and optimal sailing angles.
///
/// Both methods return `-1` sentinels when the wind speed is out of range of
/// the polar data or itself a sentinel.
pub trait PolarTable {
    /// Speed through water in knots at the given wind speed and (signed) TWA.
    fn speed(&self, tws: Knots, twa: Degree) -> Knots;

    /// Optimal upwind and downwind TWA (degrees, unsigned) at the given wind speed.
    fn optimal_angles(&self, tws: Knots) -> (Degree, Degree);
}

/// A uniform wind field, constant in time and space.
#[derive(Debug, Clone, Copy)]
pub struct ConstantWind {
    pub sample: WindSample,
}

impl ConstantWind {
    pub fn new(tws: Knots, twd: Degree) -> Self {
        ConstantWind {
            sample: WindSample { tws, twd },
        }
    }
}

impl WindOracle for ConstantWind {
    fn query(&self, _at: Epoch, _position: Position) -> WindSample {
        self.sample
    }
}

/// A wind oracle that never resolves, for degraded-mode operation and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableWind;

impl WindOracle for UnavailableWind {
    fn query(&self, _at: Epoch, _position: Position) -> WindSample {
        WindSample::UNKNOWN
    }
}

/// A polar table that never resolves, for degraded-mode operation and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePolar;

impl PolarTable for UnavailablePolar {
    fn speed(&self, _tws: Knots, _twa: Degree) -> Knots {
        UNKNOWN
    }

    fn optimal_angles(&self, _tws: Knots) -> (Degree, Degree) {
        (UNKNOWN, UNKNOWN)
    }
}

/// In-memory boat polar over a TWS × TWA grid, the shape the race metadata
/// delivers (TWS columns, TWA rows 0..=180, symmetric between tacks).
///
/// `speed` interpolates bilinearly; `optimal_angles` maximizes up- and downwind
/// VMG over the interpolated curve at one-degree resolution.
#[derive(Debug, Clone)]
pub struct GridPolar {
    tws_axis: Vec<Knots>,
    twa_axis: Vec<Degree>,
    /// One row of speeds per TWA, one column per TWS.
    speeds: Vec<Vec<Knots>>,
}

impl GridPolar {
    /// Build a polar from its axes and speed rows.
    ///
    /// Arguments
    /// ---------
    /// * `tws_axis`: ascending true wind speeds, knots
    /// * `twa_axis`: ascending unsigned true wind angles in [0, 180], degrees
    /// * `speeds`: `twa_axis.len()` rows of `tws_axis.len()` boat speeds, knots
    pub fn new(tws_axis: Vec<Knots>, twa_axis: Vec<Degree>, speeds: Vec<Vec<Knots>>) -> Self {
        debug_assert_eq!(speeds.len(), twa_axis.len());
        debug_assert!(speeds.iter().all(|row| row.len() == tws_axis.len()));
        GridPolar {
            tws_axis,
            twa_axis,
            speeds,
        }
    }

    /// Fractional index of `value` on an ascending axis, None when out of range.
    fn locate(axis: &[f64], value: f64) -> Option<(usize, f64)> {
        if axis.len() < 2 || value < axis[0] || value > *axis.last().unwrap() {
            return None;
        }
        let i = match axis.iter().position(|&a| a > value) {
            Some(i) => i - 1,
            None => axis.len() - 2,
        };
        let frac = (value - axis[i]) / (axis[i + 1] - axis[i]);
        Some((i, frac))
    }
}

impl PolarTable for GridPolar {
    fn speed(&self, tws: Knots, twa: Degree) -> Knots {
        if tws < 0.0 || twa.is_nan() {
            return UNKNOWN;
        }

        // Symmetric polar: port and starboard tack share the same row
        let twa = twa.abs();
        let (Some((i, fi)), Some((j, fj))) = (
            Self::locate(&self.twa_axis, twa),
            Self::locate(&self.tws_axis, tws),
        ) else {
            return UNKNOWN;
        };

        let row = |r: usize| self.speeds[r][j] * (1.0 - fj) + self.speeds[r][j + 1] * fj;
        row(i) * (1.0 - fi) + row(i + 1) * fi
    }

    fn optimal_angles(&self, tws: Knots) -> (Degree, Degree) {
        if tws < 0.0 || Self::locate(&self.tws_axis, tws).is_none() {
            return (UNKNOWN, UNKNOWN);
        }

        let mut best_up = (UNKNOWN, f64::MIN);
        let mut best_down = (UNKNOWN, f64::MIN);

        for deg in 0..=180 {
            let twa = deg as f64;
            let stw = self.speed(tws, twa);
            if stw < 0.0 {
                continue;
            }
            let vmg = stw * twa.to_radians().cos();
            if vmg > best_up.1 {
                best_up = (twa, vmg);
            }
            if -vmg > best_down.1 {
                best_down = (twa, -vmg);
            }
        }

        (best_up.0, best_down.0)
    }
}
