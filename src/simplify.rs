//! # Simplification pass
//!
//! Collapses consecutive delayed commands whose target differs negligibly from
//! the current leg's anchor command: less than 2 degrees of course for a
//! course-anchored leg, less than 1 degree of TWA for a TWA-anchored one.
//! Absorbed commands are erased; when a leg closes, the anchor's TWA is blended
//! with the last absorbed command's (arithmetic mean) and its course is
//! recomputed geodesically from the anchor's position toward the last absorbed
//! command's.
//!
//! The walk keeps three cursors over the order vector: the *anchor* (start of
//! the current leg), the *last investigated* command (always the position right
//! before the candidate, kept implicit), and the *candidate* under test. A list
//! shorter than two commands is a no-op.

use tracing::debug;

use crate::angles::wrap_delta;
use crate::command_list::CommandList;
use crate::constants::{COURSE_MERGE_THRESHOLD, TWA_MERGE_THRESHOLD};
use crate::geodesy::Geodesy;

/// Merge negligible course/TWA changes, in place.
pub fn simplify(list: &mut CommandList, geodesy: &dyn Geodesy) {
    if list.len() < 2 {
        return;
    }

    let mut anchor = 0;
    let mut candidate = 1;

    while candidate < list.len() {
        // The most recent command folded into the anchor sits right before the
        // candidate; erasing it keeps that invariant.
        let last = candidate - 1;
        let fresh_leg = anchor == last;

        let diff_course = wrap_delta(list.dc(candidate).course, list.dc(anchor).course);
        let diff_twa = wrap_delta(list.dc(candidate).twa, list.dc(anchor).twa);
        debug!(
            anchor_course = list.dc(anchor).course,
            anchor_twa = list.dc(anchor).twa,
            candidate_course = list.dc(candidate).course,
            candidate_twa = list.dc(candidate).twa,
            "investigating candidate"
        );

        if diff_course < COURSE_MERGE_THRESHOLD && (!list.dc(anchor).is_twa || fresh_leg) {
            debug!("continuing current leg because of minimal course change");
            list.dc_mut(anchor).is_twa = false;
            if fresh_leg {
                candidate += 1;
            } else {
                list.remove(last);
            }
        } else if diff_twa < TWA_MERGE_THRESHOLD && (list.dc(anchor).is_twa || fresh_leg) {
            debug!("continuing current leg because of minimal twa change");
            list.dc_mut(anchor).is_twa = true;
            if fresh_leg {
                candidate += 1;
            } else {
                list.remove(last);
            }
        } else if fresh_leg {
            // Nothing was folded into the anchor; open the next leg at the candidate
            anchor = candidate;
            candidate += 1;
        } else {
            // Close the leg: blend the anchor's target with the last absorbed
            // command's, then re-investigate the candidate against a fresh leg
            let blended_twa = 0.5 * (list.dc(anchor).twa + list.dc(last).twa);
            let (course, _) =
                geodesy.bearing_distance(list.dc(anchor).position(), list.dc(last).position());

            let dc = list.dc_mut(anchor);
            dc.twa = blended_twa;
            dc.course = course;
            debug!(course = dc.course, twa = dc.twa, "closed leg");

            anchor = last;
        }
    }
}
