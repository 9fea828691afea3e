//! # Boat performance loss and recovery models
//!
//! After a maneuver the boat does not sail at full polar speed: a *performance
//! factor* in [0, 1] multiplies the theoretical speed through water and
//! recovers over time. This module holds the empirical model:
//!
//! - a pure course change (no tack or jibe) costs ca. 0.07% performance per
//!   degree of TWA change;
//! - a tack or jibe costs half the currently achieved boat speed, in percent;
//! - below a floor of 93% no further maneuver loss is applied;
//! - recovery is a discretized forward integration adding
//!   `step · 3 / (20 · stw) / 100` per step, clamped at 1.0 — a discrete
//!   approximation of an exponential-recovery curve with no assumed closed
//!   form.

use tracing::{debug, warn};

use crate::constants::{Degree, Knots, Seconds, PERF_FLOOR, RECOVERY_JUMP_SECONDS};

/// Performance loss of a tack or jibe: half the boat speed after the maneuver,
/// in percent.
pub fn loss_tack_jibe(stw: Knots) -> f64 {
    0.5 * stw / 100.0
}

/// Performance loss of a course change, ca. 0.07% per degree.
///
/// Assumes that `first_twa` and `next_twa` share the same sign.
pub fn loss_course_change(first_twa: Degree, next_twa: Degree) -> f64 {
    (next_twa - first_twa).abs() / 180.0 * std::f64::consts::PI / 25.0
}

/// Performance remaining after the TWA transition `first_twa` → `next_twa`.
///
/// Arguments
/// ---------
/// * `performance`: current performance factor in [0, 1]
/// * `theoretical_stw`: polar boat speed at full performance, knots
/// * `first_twa`, `next_twa`: signed TWA before and after the transition
///
/// Return
/// ------
/// * the reduced performance factor. Below the 93% floor the input is
///   returned unchanged; the result is not clamped otherwise.
pub fn maneuver_performance(
    performance: f64,
    theoretical_stw: Knots,
    first_twa: Degree,
    next_twa: Degree,
) -> f64 {
    if performance < PERF_FLOOR {
        return performance;
    }

    if first_twa * next_twa > 0.0 {
        // Course change
        performance - loss_course_change(first_twa, next_twa)
    } else {
        // Tack or jibe
        let stw = if theoretical_stw < 0.0 {
            warn!(theoretical_stw, "maneuver loss with unknown boat speed");
            0.0
        } else {
            theoretical_stw
        };
        performance - loss_tack_jibe(stw * performance)
    }
}

/// One recovery step of `step_seconds` at the currently achieved `stw`,
/// clamped at full performance.
pub fn recovery_step(performance: f64, step_seconds: Seconds, stw: Knots) -> f64 {
    (performance + step_seconds * 3.0 / (20.0 * stw) / 100.0).min(1.0)
}

/// Performance after recovering for `time_seconds`.
///
/// Integrates forward in fixed steps of `min(time_seconds,
/// RECOVERY_JUMP_SECONDS)`, refreshing the achieved boat speed
/// `theoretical_stw * performance` after every step, and finishes with a
/// fractional remainder step.
///
/// Return
/// ------
/// * a value in `[performance, 1.0]`; 1.0 immediately if the input is already
///   fully recovered, the input unchanged if the elapsed time or the boat
///   speed is degenerate.
pub fn recover(performance: f64, time_seconds: Seconds, theoretical_stw: Knots) -> f64 {
    if performance >= 1.0 {
        return 1.0;
    }
    if time_seconds <= 0.0 {
        return performance;
    }
    if theoretical_stw <= 0.0 {
        warn!(theoretical_stw, "no recovery without known boat speed");
        return performance;
    }

    debug!(
        performance,
        theoretical_stw, time_seconds, "recovering performance"
    );

    let jump = time_seconds.min(RECOVERY_JUMP_SECONDS);
    let mut current = performance;
    let mut current_stw = theoretical_stw * performance;
    let mut elapsed = 0.0;

    while elapsed + jump <= time_seconds {
        current = recovery_step(current, jump, current_stw);
        if current >= 1.0 {
            return 1.0;
        }
        current_stw = theoretical_stw * current;
        elapsed += jump;
    }

    let remainder = time_seconds - elapsed;
    if remainder > 0.0 {
        current = recovery_step(current, remainder, current_stw);
    }

    current
}

#[cfg(test)]
mod performance_test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn pure_tack_at_eight_knots_costs_four_percent() {
        let result = maneuver_performance(1.0, 8.0, 10.0, -10.0);
        assert_relative_eq!(result, 1.0 - 0.5 * 8.0 / 100.0);
        assert_relative_eq!(result, 0.96);
    }

    #[test]
    fn course_change_costs_per_degree() {
        let result = maneuver_performance(1.0, 8.0, 40.0, 50.0);
        assert_relative_eq!(result, 1.0 - 10.0 / 180.0 * std::f64::consts::PI / 25.0);
    }

    #[test]
    fn no_loss_below_the_floor() {
        assert_eq!(maneuver_performance(0.92, 8.0, 10.0, -10.0), 0.92);
        assert_eq!(maneuver_performance(0.5, 20.0, 40.0, 120.0), 0.5);
    }

    #[test]
    fn tack_loss_scales_with_achieved_speed() {
        // At 93% the boat only makes 93% of 10 kn
        let result = maneuver_performance(0.93, 10.0, 10.0, -10.0);
        assert_relative_eq!(result, 0.93 - 0.5 * 9.3 / 100.0);
    }

    #[test]
    fn sixty_seconds_of_recovery_takes_three_jumps() {
        // Repro by hand: three 20 s steps, each adding 20*3/(20*stw)/100
        let mut expected = 0.96;
        let mut stw = 10.0 * expected;
        for _ in 0..3 {
            expected += 20.0 * 3.0 / (20.0 * stw) / 100.0;
            stw = 10.0 * expected;
        }

        let result = recover(0.96, 60.0, 10.0);
        assert_relative_eq!(result, expected, epsilon = 1e-12);
        assert!(result <= 1.0);
        assert!(result > 0.96);
    }

    #[test]
    fn recovery_is_monotonic_and_bounded() {
        let mut previous = recover(0.9, 10.0, 8.0);
        for seconds in [20.0, 50.0, 130.0, 600.0, 7200.0] {
            let current = recover(0.9, seconds, 8.0);
            assert!(current >= previous, "recovery decreased at {seconds} s");
            assert!(current <= 1.0);
            previous = current;
        }
    }

    #[test]
    fn recovery_applies_the_fractional_remainder() {
        let full_steps_only = {
            let mut perf = 0.95;
            let mut stw = 8.0 * perf;
            for _ in 0..2 {
                perf = recovery_step(perf, 20.0, stw);
                stw = 8.0 * perf;
            }
            perf
        };

        let with_remainder = recover(0.95, 50.0, 8.0);
        assert_relative_eq!(
            with_remainder,
            recovery_step(full_steps_only, 10.0, 8.0 * full_steps_only),
            epsilon = 1e-12
        );
        assert!(with_remainder > full_steps_only);
    }

    #[test]
    fn recovered_boat_stays_recovered() {
        assert_eq!(recover(1.0, 600.0, 8.0), 1.0);
        assert_eq!(recover(1.2, 600.0, 8.0), 1.0);
    }

    #[test]
    fn degenerate_inputs_recover_nothing() {
        assert_eq!(recover(0.95, 0.0, 8.0), 0.95);
        assert_eq!(recover(0.95, 60.0, 0.0), 0.95);
        assert_eq!(recover(0.95, 60.0, -1.0), 0.95);
    }
}
