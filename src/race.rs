//! # Race: one leg and its collaborators
//!
//! This module defines the [`Race`] struct, the central façade that wires together:
//!
//! 1. **The command list** — the ordered delayed commands of one race leg,
//!    exclusively owned by the race.
//! 2. **The external collaborators** — wind oracle, boat polar, and chart
//!    projection, injected behind their trait seams.
//! 3. **The simulation passes** — enrichment, simplification, maneuver
//!    optimization, and track building, exposed as methods.
//!
//! The passes are single-threaded and synchronous: every oracle query blocks
//! until answered (or answered with a sentinel) before the pass proceeds, and
//! no pass may run concurrently on the same leg.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use hifitime::Epoch;
//! use solrace::geodesy::{MercatorGeodesy, Position};
//! use solrace::providers::{ConstantWind, GridPolar};
//! use solrace::race::Race;
//!
//! # let polar = GridPolar::new(vec![0.0, 30.0], vec![0.0, 180.0], vec![vec![0.0, 0.0], vec![0.0, 20.0]]);
//! let mut race = Race::new(
//!     "1967",
//!     "Round the island",
//!     Box::new(ConstantWind::new(12.0, 270.0)),
//!     Box::new(polar),
//!     Box::new(MercatorGeodesy),
//! );
//!
//! let points = vec![
//!     (Epoch::from_gregorian_utc_at_midnight(2026, 3, 1), Position::new(54.0, 10.0)),
//!     (Epoch::from_gregorian_utc_at_midnight(2026, 3, 2), Position::new(54.5, 10.5)),
//! ];
//! race.set_dcs_from_track(&points).unwrap();
//! race.replan().unwrap();
//! let track = race.make_track().unwrap();
//! ```
//!
//! ## Notes
//!
//! - The maneuver optimizer must not run twice on the same raw list (it would
//!   duplicate its synthetic TWA commands), so the race tracks a per-leg
//!   `maneuvers_optimized` flag and [`Race::optimize_maneuvers`] fails with
//!   [`RaceError::AlreadyOptimized`] on a second call. Importing a new track
//!   resets the flag.

use hifitime::Epoch;

use crate::command_list::CommandList;
use crate::enrich::enrich;
use crate::geodesy::{Geodesy, Position};
use crate::optimize::optimize_maneuvers;
use crate::providers::{PolarTable, WindOracle};
use crate::simplify::simplify;
use crate::solrace_errors::RaceError;
use crate::track::{build_track, Track};

pub struct Race {
    pub id: String,
    pub name: String,
    dcs: CommandList,
    wind: Box<dyn WindOracle>,
    polar: Box<dyn PolarTable>,
    geodesy: Box<dyn Geodesy>,
    maneuvers_optimized: bool,
}

impl Race {
    /// Construct a race leg around its external collaborators.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        wind: Box<dyn WindOracle>,
        polar: Box<dyn PolarTable>,
        geodesy: Box<dyn Geodesy>,
    ) -> Self {
        Race {
            id: id.into(),
            name: name.into(),
            dcs: CommandList::new(),
            wind,
            polar,
            geodesy,
            maneuvers_optimized: false,
        }
    }

    pub fn dcs(&self) -> &CommandList {
        &self.dcs
    }

    pub fn dcs_mut(&mut self) -> &mut CommandList {
        &mut self.dcs
    }

    /// Whether the maneuver optimizer already ran on the current list.
    pub fn maneuvers_optimized(&self) -> bool {
        self.maneuvers_optimized
    }

    /// Replace the command list with one imported from a digitized track,
    /// one course-anchored command per segment.
    pub fn set_dcs_from_track(&mut self, points: &[(Epoch, Position)]) -> Result<(), RaceError> {
        self.dcs = CommandList::from_track(points, self.geodesy.as_ref())?;
        self.maneuvers_optimized = false;
        Ok(())
    }

    /// Enrich the command list with derived values for diagnostic purposes.
    pub fn enrich_dcs(&mut self) {
        enrich(
            &mut self.dcs,
            self.wind.as_ref(),
            self.polar.as_ref(),
            self.geodesy.as_ref(),
        );
    }

    /// Try to shorten the command list by joining legs with almost identical
    /// courses.
    pub fn simplify_dcs(&mut self) {
        simplify(&mut self.dcs, self.geodesy.as_ref());
    }

    /// Try to minimize performance loss when tacking and jibing.
    ///
    /// Return
    /// ------
    /// * [`RaceError::AlreadyOptimized`] if the pass already ran on this list;
    ///   the list is untouched in that case.
    pub fn optimize_maneuvers(&mut self) -> Result<(), RaceError> {
        if self.maneuvers_optimized {
            return Err(RaceError::AlreadyOptimized);
        }
        optimize_maneuvers(&mut self.dcs, self.polar.as_ref())?;
        self.maneuvers_optimized = true;
        Ok(())
    }

    /// Run the whole planning pipeline: enrich, simplify, optimize maneuvers,
    /// then enrich again so the synthetic commands carry derived fields too.
    pub fn replan(&mut self) -> Result<(), RaceError> {
        self.dcs.validate()?;
        self.enrich_dcs();
        self.simplify_dcs();
        self.optimize_maneuvers()?;
        self.enrich_dcs();
        Ok(())
    }

    /// Recalculate the track from the delayed commands as precisely as possible.
    pub fn make_track(&self) -> Result<Track, RaceError> {
        build_track(
            &self.dcs,
            self.wind.as_ref(),
            self.polar.as_ref(),
            self.geodesy.as_ref(),
            format!("SOL {}", self.id),
        )
    }

    /// Render the command list as the text format used for exchanging delayed
    /// commands: one `timestamp <twa|cc> <target>` line per command.
    pub fn format_dcs(&self) -> String {
        let mut out = String::new();
        for dc in self.dcs.iter() {
            let (y, m, d, h, min, s, _) = dc.timestamp.to_gregorian_utc();
            let kind = if dc.is_twa { "twa" } else { "cc" };
            out.push_str(&format!(
                "{y:04}/{m:02}/{d:02} {h:02}:{min:02}:{s:02} {kind} {:03.3}\n",
                dc.target()
            ));
        }
        out
    }
}
