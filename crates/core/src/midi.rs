//! Load Standard MIDI Files into per-track message lists.

use std::path::Path;

use midly::{MidiMessage, Timing, TrackEventKind};

use crate::error::ChartError;
use crate::types::{ChartFile, Message, MessageKind, Track};

/// Read and parse a chart file.
pub fn load_chart(path: &Path) -> Result<ChartFile, ChartError> {
    let data = std::fs::read(path).map_err(|e| ChartError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_chart(&data).map_err(|e| match e {
        ChartError::Unreadable { reason, .. } => ChartError::Unreadable {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Parse chart bytes.
///
/// Tracks are decoded lazily one at a time; the first track or event that
/// fails to decode rejects the whole file.
pub fn parse_chart(data: &[u8]) -> Result<ChartFile, ChartError> {
    let (header, track_iter) = midly::parse(data).map_err(|e| ChartError::Unreadable {
        path: Default::default(),
        reason: format!("not a MIDI file: {}", e),
    })?;

    let ticks_per_beat = match header.timing {
        Timing::Metrical(tpb) => Some(tpb.as_int()),
        Timing::Timecode(..) => None,
    };

    let mut tracks = Vec::new();
    for (index, events) in track_iter.enumerate() {
        let events = events.map_err(|e| ChartError::MalformedTrack {
            track: index,
            event: 0,
            reason: e.to_string(),
        })?;

        let mut messages = Vec::new();
        for (n, event) in events.enumerate() {
            let event = event.map_err(|e| ChartError::MalformedTrack {
                track: index,
                event: n,
                reason: e.to_string(),
            })?;
            messages.push(Message {
                delta: event.delta.as_int(),
                kind: message_kind(event.kind),
            });
        }
        tracks.push(Track { index, messages });
    }

    log::debug!("Total tracks in chart file: {}", tracks.len());

    Ok(ChartFile { ticks_per_beat, tracks })
}

fn message_kind(kind: TrackEventKind<'_>) -> MessageKind {
    match kind {
        TrackEventKind::Midi { message, .. } => match message {
            MidiMessage::NoteOn { key, vel } => MessageKind::NoteOn {
                note: key.as_int(),
                velocity: vel.as_int(),
            },
            MidiMessage::NoteOff { key, vel } => MessageKind::NoteOff {
                note: key.as_int(),
                velocity: vel.as_int(),
            },
            _ => MessageKind::Other,
        },
        _ => MessageKind::Other,
    }
}

/// Build SMF bytes from message lists, one track per list. Test fixture helper.
#[cfg(test)]
pub(crate) fn smf_bytes(tracks: &[Vec<Message>]) -> Vec<u8> {
    use midly::num::{u15, u4, u7, u28};
    use midly::{Format, Header, MetaMessage, Smf, TrackEvent};

    let tracks = tracks
        .iter()
        .map(|messages| {
            let mut events: Vec<TrackEvent<'static>> = messages
                .iter()
                .map(|m| {
                    let kind = match m.kind {
                        MessageKind::NoteOn { note, velocity } => TrackEventKind::Midi {
                            channel: u4::new(0),
                            message: MidiMessage::NoteOn {
                                key: u7::new(note),
                                vel: u7::new(velocity),
                            },
                        },
                        MessageKind::NoteOff { note, velocity } => TrackEventKind::Midi {
                            channel: u4::new(0),
                            message: MidiMessage::NoteOff {
                                key: u7::new(note),
                                vel: u7::new(velocity),
                            },
                        },
                        MessageKind::Other => TrackEventKind::Midi {
                            channel: u4::new(0),
                            message: MidiMessage::Controller {
                                controller: u7::new(7),
                                value: u7::new(100),
                            },
                        },
                    };
                    TrackEvent { delta: u28::new(m.delta), kind }
                })
                .collect();
            events.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
            });
            events
        })
        .collect();

    let smf = Smf {
        header: Header {
            format: Format::Parallel,
            timing: Timing::Metrical(u15::new(480)),
        },
        tracks,
    };
    let mut buf = Vec::new();
    smf.write(&mut buf).unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_chart_nonexistent() {
        let result = load_chart(Path::new("/nonexistent/chart.mid"));
        match result {
            Err(ChartError::Unreadable { path, .. }) => {
                assert_eq!(path, Path::new("/nonexistent/chart.mid"));
            }
            other => panic!("expected Unreadable, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_rejects_garbage() {
        let result = parse_chart(b"definitely not a midi file");
        assert!(matches!(result, Err(ChartError::Unreadable { .. })));
    }

    #[test]
    fn test_parse_chart_tracks_and_messages() {
        let bytes = smf_bytes(&[
            vec![Message::other(0)],
            vec![
                Message::note_on(0, 36, 10),
                Message::note_on(10, 36, 0),
                Message::note_on(5, 41, 20),
            ],
        ]);
        let chart = parse_chart(&bytes).unwrap();

        assert_eq!(chart.ticks_per_beat, Some(480));
        assert_eq!(chart.tracks.len(), 2);
        assert_eq!(chart.tracks[1].index, 1);

        // Each track also carries its end-of-track meta event.
        let notes = &chart.tracks[1].messages;
        assert_eq!(notes.len(), 4);
        assert_eq!(notes[0], Message::note_on(0, 36, 10));
        assert_eq!(notes[1], Message::note_on(10, 36, 0));
        assert_eq!(notes[2], Message::note_on(5, 41, 20));
        assert_eq!(notes[3].kind, MessageKind::Other);
    }

    #[test]
    fn test_truncated_track_is_malformed() {
        let bytes = smf_bytes(&[
            vec![Message::other(0)],
            vec![
                Message::note_on(0, 60, 100),
                Message::note_on(120, 62, 100),
                Message::note_on(120, 64, 100),
                Message::note_on(120, 65, 100),
            ],
        ]);
        assert!(parse_chart(&bytes).is_ok());

        for cut in 1..=11 {
            let result = parse_chart(&bytes[..bytes.len() - cut]);
            assert!(
                matches!(result, Err(ChartError::MalformedTrack { track: 1, .. })),
                "cut {cut}: {:?}",
                result
            );
        }
    }

    #[test]
    fn test_garbled_event_reports_position() {
        let mut bytes = b"MThd\x00\x00\x00\x06\x00\x01\x00\x01\x01\xe0".to_vec();
        // Second note-on is missing its velocity byte.
        bytes.extend_from_slice(b"MTrk\x00\x00\x00\x07\x00\x90\x3c\x64\x00\x90\x3c");

        match parse_chart(&bytes) {
            Err(ChartError::MalformedTrack { track, event, .. }) => {
                assert_eq!(track, 0);
                assert_eq!(event, 1);
            }
            other => panic!("expected MalformedTrack, got {:?}", other),
        }
    }

    #[test]
    fn test_load_chart_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mid");
        std::fs::write(&path, smf_bytes(&[vec![Message::note_on(120, 60, 90)]])).unwrap();

        let chart = load_chart(&path).unwrap();
        assert_eq!(chart.tracks.len(), 1);
        assert_eq!(chart.tracks[0].messages[0], Message::note_on(120, 60, 90));
    }
}
