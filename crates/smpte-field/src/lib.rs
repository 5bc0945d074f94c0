use thiserror::Error;

mod timecode;
pub use timecode::*;
mod field;
pub use field::*;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("malformed timecode pattern: {0:?}")]
    MalformedPattern(String),
    #[error("{0} out of range: {1}")]
    OutOfRange(&'static str, u32),
    #[error("frame {1:02} is dropped at minute {0:02}")]
    DroppedFrame(u32, u32),
}

/// Frames per second modeled by the field. Frame values run 0..FRAME_RATE.
pub const FRAME_RATE: u32 = 30;
