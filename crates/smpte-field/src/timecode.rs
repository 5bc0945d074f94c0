/// SMPTE timecode value and masked display formatting with drop-frame support

use crate::{TimecodeError, FRAME_RATE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timecode display format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimecodeFormat {
    /// Non-drop frame (HH:MM:SS:FF)
    NonDropFrame,
    /// Drop frame (HH:MM:SS;FF)
    DropFrame,
}

impl Default for TimecodeFormat {
    fn default() -> Self {
        Self::NonDropFrame
    }
}

/// Length of a fully filled display buffer: four two-digit groups, three separators.
pub const DISPLAY_LEN: usize = 11;

/// Buffer index of the seconds/frames separator, the only format-dependent cell.
pub(crate) const FRAME_SEP_IDX: usize = 8;

impl TimecodeFormat {
    /// Separator between the seconds and frames groups.
    pub fn separator(&self) -> char {
        match self {
            Self::NonDropFrame => ':',
            Self::DropFrame => ';',
        }
    }

    /// All-zero display mask for this format.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::NonDropFrame => "00:00:00:00",
            Self::DropFrame => "00:00:00;00",
        }
    }

    /// Separator this format expects at a buffer index, or None for digit cells.
    pub(crate) fn separator_at(&self, idx: usize) -> Option<char> {
        match idx {
            2 | 5 => Some(':'),
            FRAME_SEP_IDX => Some(self.separator()),
            _ => None,
        }
    }
}

/// Timecode representation
///
/// Holds hours, minutes, seconds and frames that are in range simultaneously;
/// values only come out of [`Timecode::new`] or [`Timecode::parse`], so an
/// out-of-range or dropped-frame combination never exists at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timecode {
    hours: u32,
    minutes: u32,
    seconds: u32,
    frames: u32,
    format: TimecodeFormat,
}

impl Timecode {
    /// Create a timecode, checking every field bound and the drop-frame rule.
    pub fn new(
        hours: u32,
        minutes: u32,
        seconds: u32,
        frames: u32,
        format: TimecodeFormat,
    ) -> Result<Self, TimecodeError> {
        if hours > 23 {
            return Err(TimecodeError::OutOfRange("hours", hours));
        }
        if minutes > 59 {
            return Err(TimecodeError::OutOfRange("minutes", minutes));
        }
        if seconds > 59 {
            return Err(TimecodeError::OutOfRange("seconds", seconds));
        }
        if frames >= FRAME_RATE {
            return Err(TimecodeError::OutOfRange("frames", frames));
        }
        if format == TimecodeFormat::DropFrame && is_dropped_frame(minutes, seconds, frames) {
            return Err(TimecodeError::DroppedFrame(minutes, frames));
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
            frames,
            format,
        })
    }

    /// The all-zero timecode, valid in both formats.
    pub fn zero(format: TimecodeFormat) -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            frames: 0,
            format,
        }
    }

    /// Parse a fully filled display buffer (HH:MM:SS:FF or HH:MM:SS;FF).
    ///
    /// The buffer must match the mask exactly: digits in the group cells and
    /// the format's separator in the separator cells.
    pub fn parse(text: &str, format: TimecodeFormat) -> Result<Self, TimecodeError> {
        if text.len() != DISPLAY_LEN || !text.is_ascii() {
            return Err(TimecodeError::MalformedPattern(text.to_string()));
        }
        let bytes = text.as_bytes();
        for (idx, &b) in bytes.iter().enumerate() {
            let ok = match format.separator_at(idx) {
                Some(sep) => b as char == sep,
                None => b.is_ascii_digit(),
            };
            if !ok {
                return Err(TimecodeError::MalformedPattern(text.to_string()));
            }
        }
        let group = |start: usize| (bytes[start] - b'0') as u32 * 10 + (bytes[start + 1] - b'0') as u32;
        Self::new(group(0), group(3), group(6), group(9), format)
    }

    /// Render the 11-character display buffer for this value's format.
    pub fn to_display(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours,
            self.minutes,
            self.seconds,
            self.format.separator(),
            self.frames
        )
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn format(&self) -> TimecodeFormat {
        self.format
    }

    /// Same field values under another format, if they survive its rules.
    pub fn with_format(&self, format: TimecodeFormat) -> Result<Self, TimecodeError> {
        Self::new(self.hours, self.minutes, self.seconds, self.frames, format)
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display())
    }
}

/// NTSC drop-frame rule: frames 00 and 01 do not exist at the start of any
/// minute except every tenth minute.
pub fn is_dropped_frame(minutes: u32, seconds: u32, frames: u32) -> bool {
    seconds == 0 && frames < 2 && minutes % 10 != 0
}

/// Replace the seconds/frames separator in a display buffer, full or partial.
///
/// Partial buffers that have not yet reached the separator cell are returned
/// unchanged; the fixed `:` separators at the other cells are never touched.
/// Safe to re-run on every keystroke, applying it twice is a no-op.
pub fn swap_separator(buffer: &str, to: TimecodeFormat) -> String {
    let mut out = buffer.to_string();
    if buffer.len() > FRAME_SEP_IDX && buffer.as_bytes()[FRAME_SEP_IDX].is_ascii() {
        out.replace_range(
            FRAME_SEP_IDX..FRAME_SEP_IDX + 1,
            to.separator().encode_utf8(&mut [0u8; 4]),
        );
    }
    out
}
