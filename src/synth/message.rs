use crate::synth::engine::FmEngine;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Control-thread events funneled into the audio thread.
///
/// The engine itself defines no locking; the surrounding system serializes
/// note events and parameter changes against `process`. The supported way is
/// this message type pushed through a wait-free SPSC ring and drained at the
/// top of each audio block.
#[derive(Debug, Copy, Clone)]
pub enum SynthMessage {
    NoteOn { note: u8, velocity: f32 },
    NoteOff { note: u8 },
    PitchBend { note: u8, cents: f32 },
    AllNotesOff,
}

/// Anything the audio thread can pop pending messages from.
pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Translate one message into the matching engine call.
pub fn apply_message(engine: &mut FmEngine, message: SynthMessage) {
    match message {
        SynthMessage::NoteOn { note, velocity } => engine.note_on(note, velocity),
        SynthMessage::NoteOff { note } => engine.note_off(note),
        SynthMessage::PitchBend { note, cents } => engine.set_voice_bend(note, cents),
        SynthMessage::AllNotesOff => engine.all_notes_off(),
    }
}

/// Drain every pending message before rendering a block.
pub fn drain_messages<R: MessageReceiver>(engine: &mut FmEngine, rx: &mut R) {
    while let Some(message) = rx.pop() {
        apply_message(engine, message);
    }
}
