//! # Enrichment pass
//!
//! Fills the derived navigation and performance fields of every delayed
//! command, in temporal order: placeholder positions are projected from the
//! previous command, wind is queried per command, course and TWA are derived
//! from one another via the true wind direction, and the performance factors
//! immediately after this maneuver (`perf_begin`) and immediately before the
//! next one (`perf_end`) are computed from the loss and recovery models.
//!
//! Oracle failures degrade the affected command to sentinel/NaN fields and are
//! logged; the pass never aborts. Re-running the pass with unchanged oracle
//! answers reproduces identical fields.

use tracing::warn;

use crate::angles::{normalize_course, normalize_twa, tack_sign};
use crate::command_list::CommandList;
use crate::constants::SECONDS_PER_HOUR;
use crate::geodesy::Geodesy;
use crate::performance::{maneuver_performance, recover};
use crate::providers::{PolarTable, WindOracle};

/// Derive all computed fields of the command list, in place.
pub fn enrich(
    list: &mut CommandList,
    wind: &dyn WindOracle,
    polar: &dyn PolarTable,
    geodesy: &dyn Geodesy,
) {
    for position in 0..list.len() {
        // Synthetic commands from the maneuver optimizer carry no position yet
        if position > 0 && !list.dc(position).has_position() {
            let previous = list.dc(position - 1).clone();
            let elapsed = (list.dc(position).timestamp - previous.timestamp).to_seconds();

            let derived = if previous.stw >= 0.0 {
                let distance = previous.stw * elapsed / SECONDS_PER_HOUR;
                geodesy.project(previous.position(), previous.course, distance)
            } else {
                warn!(
                    position,
                    "previous boat speed unknown, holding position for placeholder command"
                );
                previous.position()
            };
            list.dc_mut(position).set_position(derived);
        }

        let current = list.dc(position).clone();
        let sample = wind.query(current.timestamp, current.position());
        if sample.is_unknown() {
            warn!(position, "wind oracle answered with sentinel");
        }

        // Resolve the non-authoritative target from the wind direction
        let (course, twa) = if current.is_twa {
            (normalize_course(sample.twd - current.twa), current.twa)
        } else if sample.is_unknown() {
            // Without wind the TWA stays undefined rather than fabricated
            (current.course, f64::NAN)
        } else {
            // Positive sign: starboard tack
            (current.course, normalize_twa(sample.twd - current.course))
        };

        let stw = polar.speed(sample.tws, twa);
        let (mut opt_up, mut opt_down) = polar.optimal_angles(sample.tws);
        if opt_up > 180.0 {
            opt_up = 360.0 - opt_up;
        }
        if opt_down > 180.0 {
            opt_down = 360.0 - opt_down;
        }
        let sign = tack_sign(twa);

        let perf_begin = match position {
            0 => 1.0,
            _ => {
                let previous = list.dc(position - 1);
                if previous.twa == 0.0 {
                    1.0
                } else {
                    maneuver_performance(previous.perf_end, stw, previous.twa, twa)
                }
            }
        };

        let perf_end = if position + 1 == list.len() {
            1.0
        } else {
            let pause = (list.dc(position + 1).timestamp - current.timestamp).to_seconds();
            recover(perf_begin, pause, stw)
        };

        let dc = list.dc_mut(position);
        dc.tws = sample.tws;
        dc.course = course;
        dc.twa = twa;
        dc.stw = stw;
        dc.opt_upwind = opt_up * sign;
        dc.opt_downwind = opt_down * sign;
        dc.perf_begin = perf_begin;
        dc.perf_end = perf_end;
    }
}
