//! # Arena-backed command list
//!
//! The ordered sequence of delayed commands of one race leg. Commands live in a
//! stable arena and the temporal order is a separate index vector, so the
//! simplification pass can erase and the maneuver optimizer can insert without
//! moving, reordering, or invalidating references to untouched commands.
//!
//! `position` arguments below are order positions (0 = earliest command), not
//! arena slots.

use hifitime::Epoch;
use itertools::Itertools;

use crate::dc::Dc;
use crate::geodesy::{Geodesy, Position};
use crate::solrace_errors::RaceError;

#[derive(Debug, Clone, Default)]
pub struct CommandList {
    arena: Vec<Dc>,
    order: Vec<usize>,
}

impl CommandList {
    pub fn new() -> Self {
        CommandList::default()
    }

    /// Convert an imported track into course-anchored commands, one per
    /// digitized segment start, with the bearing toward the next point.
    ///
    /// Arguments
    /// ---------
    /// * `points`: ordered `(timestamp, position)` track points
    /// * `geodesy`: chart projection used for the segment bearings
    ///
    /// Return
    /// ------
    /// * a command list of `points.len() - 1` commands, or
    ///   [`RaceError::TrackTooShort`] for fewer than two points
    pub fn from_track(
        points: &[(Epoch, Position)],
        geodesy: &dyn Geodesy,
    ) -> Result<Self, RaceError> {
        if points.len() < 2 {
            return Err(RaceError::TrackTooShort(points.len()));
        }

        let mut list = CommandList::new();
        for ((timestamp, start), (_, end)) in points.iter().tuple_windows() {
            let (bearing, _) = geodesy.bearing_distance(*start, *end);
            list.push_back(Dc::new(*timestamp, start.lat, start.lon, bearing, false));
        }

        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn first(&self) -> Option<&Dc> {
        self.order.first().map(|&slot| &self.arena[slot])
    }

    pub fn last(&self) -> Option<&Dc> {
        self.order.last().map(|&slot| &self.arena[slot])
    }

    pub fn dc(&self, position: usize) -> &Dc {
        &self.arena[self.order[position]]
    }

    pub fn dc_mut(&mut self, position: usize) -> &mut Dc {
        &mut self.arena[self.order[position]]
    }

    /// Append a command at the end of the list.
    pub fn push_back(&mut self, dc: Dc) {
        self.arena.push(dc);
        self.order.push(self.arena.len() - 1);
    }

    /// Insert a command before `position`, shifting later positions by one.
    /// Arena slots of existing commands are untouched.
    pub fn insert_before(&mut self, position: usize, dc: Dc) -> Result<(), RaceError> {
        if position > self.order.len() {
            return Err(RaceError::InvalidPosition {
                position,
                len: self.order.len(),
            });
        }
        self.arena.push(dc);
        self.order.insert(position, self.arena.len() - 1);
        Ok(())
    }

    /// Remove the command at `position` from the order. Its arena slot is
    /// abandoned, never reused, so other positions stay valid.
    pub fn remove(&mut self, position: usize) {
        self.order.remove(position);
    }

    /// In-order iteration over the commands.
    pub fn iter(&self) -> impl Iterator<Item = &Dc> {
        self.order.iter().map(|&slot| &self.arena[slot])
    }

    /// Fail fast on violated list invariants: non-increasing timestamps or a
    /// command whose authoritative target is unset.
    pub fn validate(&self) -> Result<(), RaceError> {
        for (a, b) in self.iter().tuple_windows() {
            if b.timestamp <= a.timestamp {
                return Err(RaceError::UnorderedTimestamps(a.timestamp, b.timestamp));
            }
        }

        for dc in self.iter() {
            if dc.is_twa && dc.twa.is_nan() {
                return Err(RaceError::MissingTwaTarget(dc.timestamp));
            }
            if !dc.is_twa && dc.course.is_nan() {
                return Err(RaceError::MissingCourseTarget(dc.timestamp));
            }
        }

        Ok(())
    }
}
