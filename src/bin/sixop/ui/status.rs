//! Status bar: preset, algorithm, octave, bend, and output levels.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::EngineSnapshot;

pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self {
                peak: 0.0,
                rms: 0.0,
            };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms =
            (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    snapshot: &EngineSnapshot,
    preset_name: &str,
    octave: i16,
    bend_cents: f32,
    stats: &AudioStats,
) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {preset_name}  "),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Algo {}  ", snapshot.algorithm + 1),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Oct {octave}  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Bend {bend_cents:+.0}c  "),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("Vol {:.2}  ", snapshot.master_volume),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak {:.2}  RMS {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph =
        Paragraph::new(line).block(Block::default().title(" sixop ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
