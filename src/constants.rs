//! # Constants and type definitions for solrace
//!
//! This module centralizes the **empirical maneuver constants**, **unit conversions**, and
//! **common type aliases** used throughout the `solrace` library.
//!
//! ## Overview
//!
//! - Merge thresholds for the simplification pass
//! - Performance-model constants (floor, loss-per-degree, recovery step sizes)
//! - Sentinel values used by the external wind and polar providers
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules, including the enrichment, simplification,
//! maneuver-optimization, and track-building passes.

use std::f64::consts::PI;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in an hour, for knots ↔ nautical miles per step conversions
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Arc minutes per degree; one nautical mile is one arc minute of latitude
pub const MINUTES_PER_DEGREE: f64 = 60.0;

// -------------------------------------------------------------------------------------------------
// Simplification thresholds
// -------------------------------------------------------------------------------------------------

/// Course delta below which two consecutive course-anchored commands are merged
pub const COURSE_MERGE_THRESHOLD: Degree = 2.0;

/// TWA delta below which two consecutive TWA-anchored commands are merged
pub const TWA_MERGE_THRESHOLD: Degree = 1.0;

// -------------------------------------------------------------------------------------------------
// Performance model
// -------------------------------------------------------------------------------------------------

/// Performance floor below which a maneuver causes no further loss
pub const PERF_FLOOR: f64 = 0.93;

/// Step size of the discretized performance-recovery integration, in seconds
pub const RECOVERY_JUMP_SECONDS: Seconds = 20.0;

/// Sub-step size of the track-building forward simulation, in seconds
pub const TRACK_STEP_SECONDS: Seconds = 30.0;

/// Extra simulated time past the last delayed command, in seconds
pub const TRACK_TAIL_SECONDS: Seconds = 3600.0;

/// Recovery margin of 4 seconds of performance recovery at 5 kn
pub const MAX_RECOVERY: f64 = 4.0 * 3.0 / (20.0 * 5.0) / 100.0;

/// Course change required to reach the 93% performance floor, plus the recovery
/// margin above. Loss is ca. 0.07% per degree, so this is ca. 102 degrees.
pub const COURSE_CHANGE_FOR_MAX_LOSS: Degree = (0.07 + MAX_RECOVERY) * 180.0 / PI * 25.0;

/// Post-jibe boat speed above which the two-step jibe strategy is always cheaper
/// than a direct jibe (whose loss would then exceed the 7% budget)
pub const JIBE_FAST_STW: Knots = 14.0;

/// Tiny signed TWA used for a tack through head-to-wind, preserving tack direction
pub const HEAD_TO_WIND_TWA: Degree = 0.001;

/// Seconds subtracted from a transition timestamp for a single synthetic command
pub const SYNTHETIC_DC_OFFSET_SECONDS: Seconds = 2.0;

// -------------------------------------------------------------------------------------------------
// Provider sentinels
// -------------------------------------------------------------------------------------------------

/// Sentinel returned by the wind and polar providers when a value is unknown
pub const UNKNOWN: f64 = -1.0;

/// Placeholder for a command position that has not been derived yet
pub const POSITION_PLACEHOLDER: Degree = -1.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Speed in knots
pub type Knots = f64;

/// Distance in nautical miles
pub type NauticalMile = f64;

/// Elapsed time in seconds
pub type Seconds = f64;
