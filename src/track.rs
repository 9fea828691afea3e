//! # Track builder
//!
//! Replays an (optimized) command list through the fixed-step physical
//! simulation and produces the resulting geographic track. One waypoint is
//! emitted per delayed command, at the position where that command takes
//! effect — not one per simulation sub-step. The simulation continues for one
//! extra hour past the last command.
//!
//! For TWA-anchored commands the boat follows a course derived from the wind
//! at each boundary and the position is advanced every sub-step; for
//! course-anchored commands the accumulated distance is applied as a single
//! projection at the end of the command's duration, matching the host
//! application's track rendering.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::angles::{normalize_course, normalize_twa};
use crate::command_list::CommandList;
use crate::constants::{Degree, SECONDS_PER_HOUR, TRACK_STEP_SECONDS, TRACK_TAIL_SECONDS};
use crate::geodesy::Geodesy;
use crate::performance::{maneuver_performance, recovery_step};
use crate::providers::{PolarTable, WindOracle};
use crate::solrace_errors::RaceError;
use hifitime::Epoch;

/// One simulated position of the boat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub timestamp: Epoch,
    pub lat: Degree,
    pub lon: Degree,
}

/// The simulated route of a race leg: one waypoint per delayed command, plus
/// the performance factor at the end of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub points: Vec<TrackPoint>,
    pub final_performance: f64,
}

/// Forward-simulate the command list into a track.
///
/// Arguments
/// ---------
/// * `list`: the enriched and optimized command list
/// * `wind`, `polar`, `geodesy`: the external collaborators
/// * `name`: name of the produced track
///
/// Return
/// ------
/// * the simulated [`Track`], or [`RaceError::UnderivedPosition`] if the first
///   command still carries a placeholder position. An empty list yields an
///   empty track.
pub fn build_track(
    list: &CommandList,
    wind: &dyn WindOracle,
    polar: &dyn PolarTable,
    geodesy: &dyn Geodesy,
    name: String,
) -> Result<Track, RaceError> {
    let Some(first) = list.first() else {
        return Ok(Track {
            name,
            points: Vec::new(),
            final_performance: 1.0,
        });
    };
    if !first.has_position() {
        return Err(RaceError::UnderivedPosition(first.timestamp));
    }

    let mut points = Vec::with_capacity(list.len());
    let mut current_pos = first.position();
    let mut performance = 1.0;
    let mut previous_twa = first.twa;

    for position in 0..list.len() {
        let dc = list.dc(position);
        points.push(TrackPoint {
            timestamp: dc.timestamp,
            lat: current_pos.lat,
            lon: current_pos.lon,
        });

        let sample = wind.query(dc.timestamp, current_pos);
        let (twa, course) = if dc.is_twa {
            (
                normalize_twa(dc.twa),
                normalize_course(sample.twd - dc.twa),
            )
        } else {
            // Positive sign: starboard tack
            (normalize_twa(sample.twd - dc.course), dc.course)
        };

        let mut theoretical_stw = polar.speed(sample.tws, twa);
        if theoretical_stw < 0.0 {
            warn!(position, "boat speed unknown, boat holds position");
            theoretical_stw = 0.0;
        }

        // Performance loss for the initial course change of this command
        performance = maneuver_performance(performance, theoretical_stw, previous_twa, twa);

        let time_seconds = if position + 1 < list.len() {
            (list.dc(position + 1).timestamp - dc.timestamp).to_seconds()
        } else {
            // Go on for one more hour after the last command
            TRACK_TAIL_SECONDS
        };

        let jump = time_seconds.min(TRACK_STEP_SECONDS);
        let mut current_stw = theoretical_stw * performance;
        let mut total_dist = 0.0;
        let mut elapsed = 0.0;

        // A becalmed boat cannot recover; the step term would divide by zero
        if theoretical_stw <= 0.0 && performance < 1.0 {
            warn!(theoretical_stw, "no recovery without known boat speed");
        }

        if jump > 0.0 {
            while elapsed + jump <= time_seconds {
                if performance < 1.0 && current_stw > 0.0 {
                    performance = recovery_step(performance, jump, current_stw);
                    current_stw = theoretical_stw * performance;
                }

                let dist = current_stw * jump / SECONDS_PER_HOUR;
                if dc.is_twa {
                    current_pos = geodesy.project(current_pos, course, dist);
                }
                total_dist += dist;
                elapsed += jump;
            }

            let remainder = time_seconds - elapsed;
            if remainder > 0.0 {
                if performance < 1.0 && current_stw > 0.0 {
                    performance = recovery_step(performance, remainder, current_stw);
                }
                let dist = theoretical_stw * performance * remainder / SECONDS_PER_HOUR;
                if dc.is_twa {
                    current_pos = geodesy.project(current_pos, course, dist);
                }
                total_dist += dist;
            }
        }

        if !dc.is_twa {
            current_pos = geodesy.project(current_pos, dc.course, total_dist);
        }

        previous_twa = twa;
    }

    Ok(Track {
        name,
        points,
        final_performance: performance,
    })
}

#[cfg(test)]
mod track_test {
    use approx::assert_relative_eq;
    use hifitime::Duration;

    use super::*;
    use crate::dc::Dc;
    use crate::enrich::enrich;
    use crate::geodesy::MercatorGeodesy;
    use crate::providers::{ConstantWind, GridPolar};

    fn t(seconds: f64) -> Epoch {
        Epoch::from_gregorian_utc_at_midnight(2026, 3, 1) + Duration::from_seconds(seconds)
    }

    fn polar() -> GridPolar {
        GridPolar::new(
            vec![0.0, 10.0, 20.0, 30.0],
            vec![0.0, 45.0, 90.0, 135.0, 180.0],
            vec![
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 6.0, 9.0, 11.0],
                vec![0.0, 8.0, 12.0, 15.0],
                vec![0.0, 7.0, 11.0, 14.0],
                vec![0.0, 5.0, 9.0, 12.0],
            ],
        )
    }

    #[test]
    fn empty_list_yields_an_empty_track() {
        let track = build_track(
            &CommandList::new(),
            &ConstantWind::new(10.0, 0.0),
            &polar(),
            &MercatorGeodesy,
            "empty".into(),
        )
        .unwrap();
        assert!(track.points.is_empty());
        assert_eq!(track.final_performance, 1.0);
    }

    #[test]
    fn underived_first_position_fails_fast() {
        let mut list = CommandList::new();
        list.push_back(Dc::synthetic_twa(t(0.0), 45.0));

        let err = build_track(
            &list,
            &ConstantWind::new(10.0, 0.0),
            &polar(),
            &MercatorGeodesy,
            "broken".into(),
        )
        .unwrap_err();
        assert_eq!(err, RaceError::UnderivedPosition(t(0.0)));
    }

    #[test]
    fn single_command_emits_one_waypoint_at_the_start() {
        let wind = ConstantWind::new(10.0, 0.0);
        let geodesy = MercatorGeodesy;
        let mut list = CommandList::new();
        list.push_back(Dc::new(t(0.0), 0.0, 0.0, 90.0, false));
        enrich(&mut list, &wind, &polar(), &geodesy);

        let track = build_track(&list, &wind, &polar(), &geodesy, "one".into()).unwrap();

        assert_eq!(track.points.len(), 1);
        assert_eq!(track.points[0].timestamp, t(0.0));
        assert_relative_eq!(track.points[0].lat, 0.0);
        assert_relative_eq!(track.points[0].lon, 0.0);
        assert_eq!(track.final_performance, 1.0);
    }

    #[test]
    fn course_command_advances_the_boat_between_waypoints() {
        // Due east at 8 kn for half an hour: the second waypoint sits 4 nm east
        let wind = ConstantWind::new(10.0, 0.0);
        let geodesy = MercatorGeodesy;
        let mut list = CommandList::new();
        list.push_back(Dc::new(t(0.0), 0.0, 0.0, 90.0, false));
        list.push_back(Dc::new(t(1800.0), -1.0, -1.0, 90.0, false));
        enrich(&mut list, &wind, &polar(), &geodesy);

        let track = build_track(&list, &wind, &polar(), &geodesy, "east".into()).unwrap();

        assert_eq!(track.points.len(), 2);
        assert_relative_eq!(track.points[1].lat, 0.0, epsilon = 1e-9);
        assert_relative_eq!(track.points[1].lon, 4.0 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn twa_command_tracks_the_derived_course() {
        // TWA -90 in a northerly: course 90, so the boat still goes east
        let wind = ConstantWind::new(10.0, 0.0);
        let geodesy = MercatorGeodesy;
        let mut list = CommandList::new();
        list.push_back(Dc::new(t(0.0), 0.0, 0.0, -90.0, true));
        list.push_back(Dc::new(t(1800.0), -1.0, -1.0, -90.0, true));
        enrich(&mut list, &wind, &polar(), &geodesy);

        let track = build_track(&list, &wind, &polar(), &geodesy, "twa east".into()).unwrap();

        assert_eq!(track.points.len(), 2);
        assert_relative_eq!(track.points[1].lat, 0.0, epsilon = 1e-7);
        assert_relative_eq!(track.points[1].lon, 4.0 / 60.0, epsilon = 1e-4);
    }

    #[test]
    fn a_tack_costs_performance_and_the_tail_hour_recovers_it() {
        let wind = ConstantWind::new(10.0, 0.0);
        let geodesy = MercatorGeodesy;
        let mut list = CommandList::new();
        list.push_back(Dc::new(t(0.0), 0.0, 0.0, -45.0, true));
        list.push_back(Dc::new(t(60.0), -1.0, -1.0, 45.0, true));
        enrich(&mut list, &wind, &polar(), &geodesy);

        let track = build_track(&list, &wind, &polar(), &geodesy, "tack".into()).unwrap();

        // An hour of recovery at ~6 kn brings the boat back to full speed
        assert_eq!(track.points.len(), 2);
        assert_eq!(track.final_performance, 1.0);
    }

    #[test]
    fn zero_boat_speed_never_recovers_performance() {
        // Tack, then luff head to wind where the polar answers 0 kn: the
        // performance lost in the tack must stay lost through the tail hour
        let wind = ConstantWind::new(10.0, 0.0);
        let geodesy = MercatorGeodesy;
        let mut list = CommandList::new();
        list.push_back(Dc::new(t(0.0), 0.0, 0.0, -45.0, true));
        list.push_back(Dc::new(t(60.0), 0.0, 0.01, 45.0, true));
        list.push_back(Dc::new(t(120.0), 0.0, 0.02, 0.0, true));

        let track = build_track(&list, &wind, &polar(), &geodesy, "luffing".into()).unwrap();

        assert_eq!(track.points.len(), 3);
        assert!(
            track.final_performance < 1.0,
            "recovered at 0 kn: {}",
            track.final_performance
        );
        // Two 30 s recovery steps after the tack, nothing afterwards
        let mut expected = maneuver_performance(1.0, 6.0, -45.0, 45.0);
        for _ in 0..2 {
            expected = recovery_step(expected, 30.0, 6.0 * expected);
        }
        assert_relative_eq!(track.final_performance, expected, epsilon = 1e-12);
    }

    #[test]
    fn unknown_wind_keeps_the_boat_in_place() {
        let geodesy = MercatorGeodesy;
        let wind = crate::providers::UnavailableWind;
        let mut list = CommandList::new();
        list.push_back(Dc::new(t(0.0), 10.0, 20.0, 90.0, false));
        enrich(&mut list, &wind, &polar(), &geodesy);

        let track = build_track(&list, &wind, &polar(), &geodesy, "becalmed".into()).unwrap();

        assert_eq!(track.points.len(), 1);
        assert_relative_eq!(track.points[0].lat, 10.0);
        assert_relative_eq!(track.points[0].lon, 20.0);
        assert_eq!(track.final_performance, 1.0);
    }
}
