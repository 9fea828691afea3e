//! # Delayed command records
//!
//! A delayed command (DC) is one scheduled steering event of a race leg: at
//! `timestamp` the boat turns to either a compass course or a true wind angle.
//! Commands are created from a track import (course-anchored, one per digitized
//! segment) or by the maneuver optimizer (TWA-anchored, position left as a
//! placeholder to be derived by the enrichment pass).
//!
//! The remaining fields are derived navigation and performance data filled in
//! by [`enrich`](crate::enrich::enrich); they start out as sentinels.

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Knots, POSITION_PLACEHOLDER, UNKNOWN};
use crate::geodesy::Position;

/// One scheduled steering event.
///
/// # Fields
///
/// * `timestamp` - instant the command takes effect
/// * `lat_start`, `lon_start` - position where the command begins; `-1.0` means "derive from the previous command"
/// * `is_twa` - whether `twa` (true) or `course` (false) is the authoritative target
/// * `course` - compass bearing in degrees [0, 360)
/// * `twa` - true wind angle in degrees [-180, 180], positive on starboard tack
/// * `tws` - true wind speed at this command, knots (derived)
/// * `stw` - speed through water achieved at this command, knots (derived)
/// * `opt_upwind`, `opt_downwind` - optimal TWA for up-/downwind sailing, signed to the current tack (derived)
/// * `perf_begin`, `perf_end` - performance factor in [0, 1] right after this course change and right before the next one (derived)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dc {
    pub timestamp: Epoch,
    pub lat_start: Degree,
    pub lon_start: Degree,
    pub is_twa: bool,
    pub course: Degree,
    pub twa: Degree,
    pub tws: Knots,
    pub stw: Knots,
    pub opt_upwind: Degree,
    pub opt_downwind: Degree,
    pub perf_begin: f64,
    pub perf_end: f64,
}

impl Dc {
    /// Create a new command with the given target.
    ///
    /// Arguments
    /// ---------
    /// * `timestamp`: instant the command takes effect
    /// * `lat_start`, `lon_start`: start position, or `-1.0` placeholders
    /// * `target`: the authoritative value, a TWA if `is_twa` else a course
    /// * `is_twa`: discriminates the target kind
    pub fn new(
        timestamp: Epoch,
        lat_start: Degree,
        lon_start: Degree,
        target: Degree,
        is_twa: bool,
    ) -> Self {
        let mut dc = Dc {
            timestamp,
            lat_start,
            lon_start,
            is_twa,
            course: f64::NAN,
            twa: f64::NAN,
            tws: UNKNOWN,
            stw: UNKNOWN,
            opt_upwind: UNKNOWN,
            opt_downwind: UNKNOWN,
            perf_begin: 1.0,
            perf_end: 1.0,
        };
        if is_twa {
            dc.twa = target;
        } else {
            dc.course = target;
        }
        dc
    }

    /// A synthetic TWA-anchored command with a placeholder position, as the
    /// maneuver optimizer inserts them.
    pub fn synthetic_twa(timestamp: Epoch, twa: Degree) -> Self {
        Dc::new(
            timestamp,
            POSITION_PLACEHOLDER,
            POSITION_PLACEHOLDER,
            twa,
            true,
        )
    }

    /// Whether the start position has been derived yet.
    pub fn has_position(&self) -> bool {
        self.lat_start != POSITION_PLACEHOLDER
    }

    pub fn position(&self) -> Position {
        Position::new(self.lat_start, self.lon_start)
    }

    pub fn set_position(&mut self, position: Position) {
        self.lat_start = position.lat;
        self.lon_start = position.lon;
    }

    /// The authoritative target value of this command.
    pub fn target(&self) -> Degree {
        if self.is_twa {
            self.twa
        } else {
            self.course
        }
    }

    /// The optimal angle relevant to the current point of sail: upwind when
    /// sailing closer than 90 degrees to the wind, downwind otherwise.
    pub fn relevant_optimal_angle(&self) -> Degree {
        if self.twa.abs() < 90.0 {
            self.opt_upwind
        } else {
            self.opt_downwind
        }
    }
}

#[cfg(test)]
mod dc_test {
    use super::*;

    fn t0() -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2026, 3, 1)
    }

    #[test]
    fn new_course_command_leaves_twa_underived() {
        let dc = Dc::new(t0(), 54.0, 10.0, 90.0, false);
        assert!(!dc.is_twa);
        assert_eq!(dc.course, 90.0);
        assert!(dc.twa.is_nan());
        assert!(dc.has_position());
        assert_eq!(dc.target(), 90.0);
    }

    #[test]
    fn synthetic_command_carries_placeholder_position() {
        let dc = Dc::synthetic_twa(t0(), -120.0);
        assert!(dc.is_twa);
        assert_eq!(dc.twa, -120.0);
        assert!(!dc.has_position());
        assert_eq!(dc.target(), -120.0);
    }

    #[test]
    fn relevant_optimal_angle_follows_point_of_sail() {
        let mut dc = Dc::new(t0(), 0.0, 0.0, 45.0, true);
        dc.opt_upwind = 42.0;
        dc.opt_downwind = 150.0;
        assert_eq!(dc.relevant_optimal_angle(), 42.0);

        dc.twa = -130.0;
        assert_eq!(dc.relevant_optimal_angle(), 150.0);
    }
}
