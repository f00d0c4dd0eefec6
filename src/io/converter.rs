use crate::io::midi::MidiEvent;
use crate::synth::message::SynthMessage;

/// All-notes-off controller number from the MIDI channel-mode range.
const CC_ALL_NOTES_OFF: u8 = 123;

/// Translate a MIDI event on the given channel into a synth message.
///
/// Note-on with velocity zero is treated as note-off (running-status
/// convention). Events on other channels, and events the engine has no use
/// for, come back as `None`.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: u8) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => {
            if velocity == 0 {
                Some(SynthMessage::NoteOff { note: key })
            } else {
                Some(SynthMessage::NoteOn {
                    note: key,
                    velocity: velocity as f32 / 127.0,
                })
            }
        }
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            Some(SynthMessage::NoteOff { note: key })
        }
        MidiEvent::ControlChange {
            channel,
            controller,
            ..
        } if channel == channel_filter && controller == CC_ALL_NOTES_OFF => {
            Some(SynthMessage::AllNotesOff)
        }
        _ => None,
    }
}

/// Convert a MIDI note number to its equal-tempered frequency.
/// A4 = 440 Hz = MIDI note 69.
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}
