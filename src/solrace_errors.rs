use hifitime::Epoch;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RaceError {
    #[error("Command list is not temporally ordered: {1} does not follow {0}")]
    UnorderedTimestamps(Epoch, Epoch),

    #[error("Delayed command at {0} is TWA-anchored but carries no TWA target")]
    MissingTwaTarget(Epoch),

    #[error("Delayed command at {0} is course-anchored but carries no course target")]
    MissingCourseTarget(Epoch),

    #[error("Delayed command at {0} reached the track builder with an underived position")]
    UnderivedPosition(Epoch),

    #[error("Maneuver optimization was already run on this leg")]
    AlreadyOptimized,

    #[error("Track import needs at least two points, got {0}")]
    TrackTooShort(usize),

    #[error("Invalid insertion position {position} for a list of {len} commands")]
    InvalidPosition { position: usize, len: usize },
}
