/// Live-edit state machine for a masked SMPTE timecode field
///
/// The field owns the display buffer, the caret and the active format, and
/// mediates every edit event so the buffer is always a satisfiable prefix of
/// the HH:MM:SS:FF / HH:MM:SS;FF mask. Bad keystrokes are refused without
/// touching the buffer; errors never cross this API.

use crate::{swap_separator, Timecode, TimecodeFormat, DISPLAY_LEN, FRAME_RATE};

/// Editing state reported to the host control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Nothing typed yet
    Empty,
    /// Incomplete, or filled but not currently parseable
    Partial,
    /// Fully filled and parseable
    Valid,
}

/// Outcome of a single edit event: whether it applied and where the caret lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub accepted: bool,
    pub cursor: usize,
}

/// One editable timecode field. Two on-screen fields are two independent values.
#[derive(Debug, Clone)]
pub struct TimecodeField {
    format: TimecodeFormat,
    buffer: String,
    cursor: usize,
    last_valid: Option<String>,
}

impl TimecodeField {
    pub fn new(format: TimecodeFormat) -> Self {
        Self {
            format,
            buffer: String::new(),
            cursor: 0,
            last_valid: None,
        }
    }

    /// Current display string for the host control.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Current caret offset for the host control.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn format(&self) -> TimecodeFormat {
        self.format
    }

    /// The parsed value, if the buffer is fully filled and in range.
    pub fn value(&self) -> Option<Timecode> {
        Timecode::parse(&self.buffer, self.format).ok()
    }

    pub fn is_valid(&self) -> bool {
        self.value().is_some()
    }

    pub fn state(&self) -> FieldState {
        if self.buffer.is_empty() {
            FieldState::Empty
        } else if self.is_valid() {
            FieldState::Valid
        } else {
            FieldState::Partial
        }
    }

    /// Handle one typed character at the given caret offset.
    ///
    /// Digits overwrite the digit cell under the caret, or extend the buffer
    /// at its end; group separators are appended automatically as typing
    /// crosses them and can never be overwritten. A keystroke that leaves any
    /// field unable to reach a legal value is refused on the spot, and the
    /// keystroke that fills the last cell is refused unless the whole buffer
    /// parses.
    pub fn insert_char(&mut self, ch: char, cursor: usize) -> EditOutcome {
        self.cursor = cursor.min(self.buffer.len());

        if !ch.is_ascii_digit() {
            // typing the mask's own separator just advances over it
            if self.cursor < self.buffer.len() && self.format.separator_at(self.cursor) == Some(ch)
            {
                self.cursor += 1;
                return EditOutcome {
                    accepted: true,
                    cursor: self.cursor,
                };
            }
            tracing::debug!(%ch, cursor = self.cursor, "refused non-digit input");
            return self.reject();
        }

        // digits never land in a separator cell
        let mut pos = self.cursor;
        while pos < self.buffer.len() && self.format.separator_at(pos).is_some() {
            pos += 1;
        }
        if pos >= DISPLAY_LEN {
            return self.reject();
        }

        let mut proposed = self.buffer.clone();
        if pos < proposed.len() {
            proposed.replace_range(pos..pos + 1, ch.encode_utf8(&mut [0u8; 4]));
        } else {
            proposed.push(ch);
            // group separators belong to the mask, not to the typed input
            if let Some(sep) = self.format.separator_at(proposed.len()) {
                proposed.push(sep);
            }
        }

        if !prefix_satisfiable(&proposed, self.format) {
            tracing::debug!(buffer = %proposed, "refused unsatisfiable prefix");
            return self.reject();
        }
        if proposed.len() == DISPLAY_LEN {
            // the dropped-frame rule is the one check the prefix bounds miss
            if let Err(err) = Timecode::parse(&proposed, self.format) {
                tracing::debug!(%err, buffer = %proposed, "refused filling keystroke");
                return self.reject();
            }
        }

        self.buffer = proposed;
        let mut next = pos + 1;
        while next < self.buffer.len() && self.format.separator_at(next).is_some() {
            next += 1;
        }
        self.cursor = next;
        if self.buffer.len() == DISPLAY_LEN {
            self.last_valid = Some(self.buffer.clone());
        }
        EditOutcome {
            accepted: true,
            cursor: self.cursor,
        }
    }

    /// Delete the digit before the caret, stepping back over separator cells.
    ///
    /// Only accepted at the end of the buffer: removing an interior digit
    /// would shift the tail across separator cells and break the mask.
    pub fn backspace(&mut self, cursor: usize) -> EditOutcome {
        self.cursor = cursor.min(self.buffer.len());
        let mut pos = self.cursor;
        while pos > 0 && self.format.separator_at(pos - 1).is_some() {
            pos -= 1;
        }
        if pos == 0 {
            return self.reject();
        }
        if self.buffer[pos..].bytes().any(|b| b.is_ascii_digit()) {
            tracing::debug!(cursor = self.cursor, "refused mid-buffer deletion");
            return self.reject();
        }
        self.buffer.truncate(pos - 1);
        self.cursor = pos - 1;
        EditOutcome {
            accepted: true,
            cursor: self.cursor,
        }
    }

    /// Incomplete or unparseable content reverts to the last fully valid
    /// display string, or to the format's zero pattern if none exists yet.
    pub fn focus_lost(&mut self) {
        if self.buffer.len() == DISPLAY_LEN && self.is_valid() {
            return;
        }
        self.buffer = self
            .last_valid
            .clone()
            .unwrap_or_else(|| self.format.pattern().to_string());
        self.cursor = self.cursor.min(self.buffer.len());
        tracing::debug!(buffer = %self.buffer, "reverted field on focus loss");
    }

    /// Switch between drop-frame and non-drop-frame in place.
    ///
    /// Swaps the seconds/frames separator inside the live buffer (full or
    /// partial) without losing the caret, then re-derives validity under the
    /// new format: the numeric cells are untouched, but a full value that the
    /// new format's dropped-frame rule forbids stops reporting as valid, and
    /// a remembered revert target that no longer parses is forgotten.
    pub fn set_format(&mut self, format: TimecodeFormat) {
        if format == self.format {
            return;
        }
        self.format = format;
        self.buffer = swap_separator(&self.buffer, format);
        if let Some(prev) = self.last_valid.take() {
            let swapped = swap_separator(&prev, format);
            if Timecode::parse(&swapped, format).is_ok() {
                self.last_valid = Some(swapped);
            } else {
                tracing::debug!(buffer = %swapped, "remembered value dropped by format change");
            }
        }
    }

    fn reject(&self) -> EditOutcome {
        EditOutcome {
            accepted: false,
            cursor: self.cursor,
        }
    }
}

impl Default for TimecodeField {
    fn default() -> Self {
        Self::new(TimecodeFormat::default())
    }
}

/// Can this buffer still be completed into an in-range timecode?
///
/// Checks mask shape plus the per-cell bounds that are already decided:
/// hours tens digit at most 2 (and the pair at most 23), minutes and seconds
/// tens digits at most 5, frames tens digit below FRAME_RATE / 10.
fn prefix_satisfiable(buffer: &str, format: TimecodeFormat) -> bool {
    if buffer.len() > DISPLAY_LEN {
        return false;
    }
    let bytes = buffer.as_bytes();
    for (idx, &b) in bytes.iter().enumerate() {
        let ok = match format.separator_at(idx) {
            Some(sep) => b as char == sep,
            None => b.is_ascii_digit(),
        };
        if !ok {
            return false;
        }
    }
    let digit = |idx: usize| (bytes[idx] - b'0') as u32;
    if !bytes.is_empty() && digit(0) > 2 {
        return false;
    }
    if bytes.len() > 1 && digit(0) * 10 + digit(1) > 23 {
        return false;
    }
    if bytes.len() > 3 && digit(3) > 5 {
        return false;
    }
    if bytes.len() > 6 && digit(6) > 5 {
        return false;
    }
    if bytes.len() > 9 && digit(9) * 10 >= FRAME_RATE {
        return false;
    }
    true
}
