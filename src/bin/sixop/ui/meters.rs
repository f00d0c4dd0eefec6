//! Voice pool meters: one cell per slot showing the note it holds and its
//! envelope level.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use sixop_dsp::NUM_VOICES;

use crate::keys::note_name;
use crate::state::EngineSnapshot;

const LEVEL_BLOCKS: [char; 9] = [' ', '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}'];

fn level_block(level: f32) -> char {
    let index = (level.clamp(0.0, 1.0) * (LEVEL_BLOCKS.len() - 1) as f32).round() as usize;
    LEVEL_BLOCKS[index.min(LEVEL_BLOCKS.len() - 1)]
}

pub fn render_voices(frame: &mut Frame, area: Rect, snapshot: &EngineSnapshot) {
    let row = |slots: &[usize]| {
        let mut spans = Vec::with_capacity(slots.len());
        for &i in slots {
            let voice = snapshot.voices[i];
            let (text, style) = if voice.active {
                (
                    format!(" {:>3}{} ", note_name(voice.note), level_block(voice.level)),
                    Style::default().fg(Color::Green),
                )
            } else {
                ("  --  ".to_string(), Style::default().fg(Color::DarkGray))
            };
            spans.push(Span::styled(text, style));
        }
        Line::from(spans)
    };

    let top: Vec<usize> = (0..NUM_VOICES / 2).collect();
    let bottom: Vec<usize> = (NUM_VOICES / 2..NUM_VOICES).collect();

    let paragraph = Paragraph::new(vec![row(&top), row(&bottom)]).block(
        Block::default()
            .title(format!(" Voices {}/{} ", snapshot.active_voices, NUM_VOICES))
            .borders(Borders::ALL),
    );
    frame.render_widget(paragraph, area);
}
