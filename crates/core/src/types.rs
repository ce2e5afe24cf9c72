use serde::{Deserialize, Serialize};

/// What a single track message does, reduced to the fields charting needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8, velocity: u8 },
    /// Meta, sysex, controller and every other event. Still advances time.
    Other,
}

/// One timed message of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Ticks since the previous message
    pub delta: u32,
    pub kind: MessageKind,
}

impl Message {
    pub fn note_on(delta: u32, note: u8, velocity: u8) -> Self {
        Self { delta, kind: MessageKind::NoteOn { note, velocity } }
    }

    pub fn note_off(delta: u32, note: u8) -> Self {
        Self { delta, kind: MessageKind::NoteOff { note, velocity: 0 } }
    }

    pub fn other(delta: u32) -> Self {
        Self { delta, kind: MessageKind::Other }
    }

    /// The note number if this message starts a note (note-on with nonzero velocity).
    pub fn activation(&self) -> Option<u8> {
        match self.kind {
            MessageKind::NoteOn { note, velocity } if velocity > 0 => Some(note),
            _ => None,
        }
    }
}

/// One difficulty track: its position in the source file plus its messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// 0-based position in the file's track list
    pub index: usize,
    pub messages: Vec<Message>,
}

/// A loaded chart file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFile {
    /// Ticks per quarter note, when the header uses metrical timing
    pub ticks_per_beat: Option<u16>,
    pub tracks: Vec<Track>,
}

/// A note onset projected onto a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Absolute time in ticks
    pub time: u64,
    /// Lane index in `[0, lane_count)`
    pub lane: usize,
}
