//! Turn a track's relative-delta messages into absolute, lane-indexed note onsets.

use std::num::NonZeroUsize;

use crate::types::{Message, NoteEvent};

/// Lazy iterator of note onsets over a track's messages.
///
/// Borrows the messages, so it can be cloned before consumption and walked
/// again from the same point.
#[derive(Debug, Clone)]
pub struct NoteEvents<'a> {
    messages: std::slice::Iter<'a, Message>,
    lane_count: NonZeroUsize,
    current_time: u64,
}

/// Walk `messages`, accumulating deltas into absolute time and yielding one
/// [`NoteEvent`] per note-on with nonzero velocity.
///
/// Note-offs and zero-velocity note-ons are skipped; only onsets are kept.
pub fn extract_notes(messages: &[Message], lane_count: NonZeroUsize) -> NoteEvents<'_> {
    NoteEvents {
        messages: messages.iter(),
        lane_count,
        current_time: 0,
    }
}

impl Iterator for NoteEvents<'_> {
    type Item = NoteEvent;

    fn next(&mut self) -> Option<NoteEvent> {
        for msg in self.messages.by_ref() {
            self.current_time += u64::from(msg.delta);
            if let Some(note) = msg.activation() {
                return Some(NoteEvent {
                    time: self.current_time,
                    lane: usize::from(note) % self.lane_count.get(),
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.messages.size_hint().1)
    }
}

impl std::iter::FusedIterator for NoteEvents<'_> {}
