//! # Maneuver optimizer
//!
//! Walks the command list pairwise by TWA transition and inserts synthetic
//! TWA-anchored commands shortly before expensive transitions, bounding the
//! worst-case performance loss:
//!
//! - a **course change** larger than [`COURSE_CHANGE_FOR_MAX_LOSS`] is split in
//!   two, the synthetic command advancing the TWA by exactly the threshold;
//! - a **jibe** onto a fast point of sail (> 14 kn) is taken in three steps:
//!   harden to just under the 93% floor, bear away to ±180, then complete the
//!   jibe (strategy 1);
//! - a slower **jibe** goes through ±180 only when jibe-plus-course-change is
//!   cheaper than the direct jibe (strategy 2);
//! - a **tack** goes through head-to-wind (TWA ≈ 0, keeping the target tack's
//!   sign) only when that is cheaper than the direct tack.
//!
//! The pass assumes an enriched list (it reads derived `twa` and `tws`), never
//! erases or reorders pre-existing commands, and assumes a symmetric polar. It
//! is **not** idempotent: re-running it duplicates the synthetic commands, so
//! [`Race`](crate::race::Race) guards it with a per-leg flag.

use hifitime::Duration;
use tracing::debug;

use crate::angles::tack_sign;
use crate::command_list::CommandList;
use crate::constants::{
    COURSE_CHANGE_FOR_MAX_LOSS, HEAD_TO_WIND_TWA, JIBE_FAST_STW, SYNTHETIC_DC_OFFSET_SECONDS,
};
use crate::dc::Dc;
use crate::performance::{loss_course_change, loss_tack_jibe};
use crate::providers::PolarTable;
use crate::solrace_errors::RaceError;

/// Insert synthetic commands bounding maneuver losses, in place.
///
/// Must be run at most once per raw command list.
pub fn optimize_maneuvers(list: &mut CommandList, polar: &dyn PolarTable) -> Result<(), RaceError> {
    if list.len() < 2 {
        return Ok(());
    }

    let original_len = list.len();
    let mut inserted = 0;
    let mut first_twa = list.dc(0).twa;

    for original_position in 1..original_len {
        let position = original_position + inserted;
        let current = list.dc(position).clone();
        let next_twa = current.twa;
        let sign = tack_sign(first_twa);
        debug!(
            course = current.course,
            first_twa, next_twa, "checking TWA transition"
        );

        let offset = Duration::from_seconds(SYNTHETIC_DC_OFFSET_SECONDS);

        if first_twa * next_twa > 0.0 {
            // Course change, ca. 0.07% loss per degree
            if (next_twa - first_twa).abs() > COURSE_CHANGE_FOR_MAX_LOSS {
                let toward_next = (next_twa - first_twa).signum();
                list.insert_before(
                    position,
                    Dc::synthetic_twa(
                        current.timestamp - offset,
                        first_twa + toward_next * COURSE_CHANGE_FOR_MAX_LOSS,
                    ),
                )?;
                inserted += 1;
                // ... and the existing command finalizes the change to next_twa
            }
        } else if (first_twa - next_twa).abs() > 180.0 {
            // Jibe. Two candidate strategies:
            // 1. Drive performance just below the 93% floor with two course
            //    changes, then jibe to next_twa free of further loss. Only
            //    worthwhile above 14 kn, where a direct jibe would cost more
            //    than the whole 7% budget.
            // 2. Jibe to TWA 180 first, then harden in to next_twa, when that
            //    sum is cheaper than the direct jibe.
            let stw_before_wind = polar.speed(current.tws, 180.0);
            let next_stw = polar.speed(current.tws, next_twa);
            debug!(stw_before_wind, next_stw, "optimizing jibe");

            if next_stw > JIBE_FAST_STW {
                // Strategy 1: harden upwind by delta1, then bear away to 180,
                // spending exactly the maximum free course change:
                // twa_delta + 2 * delta1 = COURSE_CHANGE_FOR_MAX_LOSS
                let twa_delta = 180.0 - first_twa.abs();
                let delta1 = 0.5 * (COURSE_CHANGE_FOR_MAX_LOSS - twa_delta);

                list.insert_before(
                    position,
                    Dc::synthetic_twa(current.timestamp - offset * 2, first_twa - sign * delta1),
                )?;
                list.insert_before(
                    position + 1,
                    Dc::synthetic_twa(current.timestamp - offset, sign * 180.0),
                )?;
                inserted += 2;
            } else {
                // Strategy 2
                let direct = loss_tack_jibe(next_stw);
                let via_stern = loss_tack_jibe(stw_before_wind)
                    + loss_course_change(180.0, next_twa.abs());
                if via_stern < direct {
                    list.insert_before(
                        position,
                        Dc::synthetic_twa(current.timestamp - offset, sign * 180.0),
                    )?;
                    inserted += 1;
                }
            }
        } else {
            // Tack: going through head-to-wind loses nothing on the tack
            // itself, only the course change from 0 to next_twa
            let next_stw = polar.speed(current.tws, next_twa);
            let direct = loss_tack_jibe(next_stw);
            let via_zero = loss_course_change(0.0, next_twa);
            debug!(next_stw, direct, via_zero, "optimizing tack");

            if direct > via_zero {
                list.insert_before(
                    position,
                    Dc::synthetic_twa(current.timestamp - offset, -sign * HEAD_TO_WIND_TWA),
                )?;
                inserted += 1;
            }
        }

        first_twa = next_twa;
    }

    Ok(())
}
