//! Tracker-style keyboard layout: the bottom letter row is the white keys
//! starting at C, the row above it the sharps; `q2w3...` repeats the same
//! shape one octave up.

/// Map a key to a semitone offset from the C of the current base octave.
/// Returns `None` for keys that are not part of the note grid.
pub fn semitone_for(key: char) -> Option<i16> {
    let offset = match key.to_ascii_lowercase() {
        'z' => 0,
        's' => 1,
        'x' => 2,
        'd' => 3,
        'c' => 4,
        'v' => 5,
        'g' => 6,
        'b' => 7,
        'h' => 8,
        'n' => 9,
        'j' => 10,
        'm' => 11,
        ',' => 12,

        'q' => 12,
        '2' => 13,
        'w' => 14,
        '3' => 15,
        'e' => 16,
        'r' => 17,
        '5' => 18,
        't' => 19,
        '6' => 20,
        'y' => 21,
        '7' => 22,
        'u' => 23,
        'i' => 24,
        _ => return None,
    };
    Some(offset)
}

/// Resolve a key against the current octave to a MIDI note, if it lands in
/// the 0..=127 range.
pub fn note_for(key: char, octave: i16) -> Option<u8> {
    let semitone = semitone_for(key)?;
    let note = (octave + 1) * 12 + semitone;
    if (0..=127).contains(&note) {
        Some(note as u8)
    } else {
        None
    }
}

/// Display name for a MIDI note ("A4", "F#2", ...).
pub fn note_name(note: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let octave = (note as i16) / 12 - 1;
    format!("{}{}", NAMES[(note % 12) as usize], octave)
}
