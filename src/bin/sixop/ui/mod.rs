//! Terminal UI: a playable keyboard with meters, a spectrum view, and an
//! oscilloscope over the live engine output.

mod meters;
mod spectrum;
mod status;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use sixop_dsp::synth::message::SynthMessage;
use sixop_dsp::NUM_ALGORITHMS;

use crate::keys;
use crate::state::{ControlMessage, EngineSnapshot};
use spectrum::SpectrumAnalyzer;
use status::AudioStats;

/// Samples kept for the scope and spectrum views.
const VIS_BUFFER_SIZE: usize = 1024;

/// How long a struck key sounds before its note-off is sent.
const KEY_GATE: Duration = Duration::from_millis(450);

/// Cents added per bend keypress.
const BEND_STEP: f32 = 25.0;

pub struct UiApp {
    control_tx: Producer<ControlMessage>,
    audio_rx: Consumer<f32>,
    snapshot_rx: Consumer<EngineSnapshot>,

    snapshot: EngineSnapshot,
    audio_buffer: Vec<f32>,
    analyzer: SpectrumAnalyzer,
    preset_names: Vec<String>,

    preset: usize,
    octave: i16,
    last_note: Option<u8>,
    bend_cents: f32,
    pending_releases: Vec<(Instant, u8)>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        control_tx: Producer<ControlMessage>,
        audio_rx: Consumer<f32>,
        snapshot_rx: Consumer<EngineSnapshot>,
        preset_names: Vec<String>,
        sample_rate: f32,
    ) -> Self {
        Self {
            control_tx,
            audio_rx,
            snapshot_rx,
            snapshot: EngineSnapshot::default(),
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            analyzer: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            preset_names,
            preset: 0,
            octave: 4,
            last_note: None,
            bend_cents: 0.0,
            pending_releases: Vec::new(),
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_snapshots();
            self.release_due_notes();

            terminal.draw(|frame| self.render(frame))?;

            // Keyboard at ~60 fps; only key presses matter.
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut fresh = Vec::new();
        while let Ok(sample) = self.audio_rx.pop() {
            fresh.push(sample);
        }
        if fresh.is_empty() {
            return;
        }

        self.audio_buffer.extend(fresh);
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(..excess);
        }
        self.analyzer.update(&self.audio_buffer);
    }

    fn poll_snapshots(&mut self) {
        while let Ok(snapshot) = self.snapshot_rx.pop() {
            self.snapshot = snapshot;
        }
    }

    fn release_due_notes(&mut self) {
        let now = Instant::now();
        let mut index = 0;
        while index < self.pending_releases.len() {
            if self.pending_releases[index].0 <= now {
                let (_, note) = self.pending_releases.swap_remove(index);
                self.send(ControlMessage::Synth(SynthMessage::NoteOff { note }));
            } else {
                index += 1;
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.should_quit = true,

            KeyCode::Backspace => {
                self.pending_releases.clear();
                self.last_note = None;
                self.send(ControlMessage::Synth(SynthMessage::AllNotesOff));
            }

            KeyCode::Tab => self.cycle_preset(1),
            KeyCode::BackTab => self.cycle_preset(-1),

            KeyCode::F(n) if (1..=NUM_ALGORITHMS as u8).contains(&n) => {
                self.send(ControlMessage::Algorithm((n - 1) as usize));
            }

            KeyCode::Left => self.bend_last_note(-BEND_STEP),
            KeyCode::Right => self.bend_last_note(BEND_STEP),

            KeyCode::Char('[') => self.octave = (self.octave - 1).max(0),
            KeyCode::Char(']') => self.octave = (self.octave + 1).min(8),

            KeyCode::Char(c) => {
                if let Some(note) = keys::note_for(c, self.octave) {
                    self.strike(note);
                }
            }

            _ => {}
        }
    }

    fn strike(&mut self, note: u8) {
        self.send(ControlMessage::Synth(SynthMessage::NoteOn {
            note,
            velocity: 0.8,
        }));
        self.pending_releases.push((Instant::now() + KEY_GATE, note));
        self.last_note = Some(note);
        self.bend_cents = 0.0;
    }

    fn bend_last_note(&mut self, delta_cents: f32) {
        if let Some(note) = self.last_note {
            self.bend_cents += delta_cents;
            let cents = self.bend_cents;
            self.send(ControlMessage::Synth(SynthMessage::PitchBend {
                note,
                cents,
            }));
        }
    }

    fn cycle_preset(&mut self, step: i32) {
        let count = self.preset_names.len() as i32;
        if count == 0 {
            return;
        }
        self.preset = ((self.preset as i32 + step).rem_euclid(count)) as usize;
        let preset = self.preset;
        self.send(ControlMessage::Preset(preset));
    }

    fn send(&mut self, message: ControlMessage) {
        // A full ring means the audio thread is hopelessly behind; dropping
        // the event is the realtime-safe option.
        let _ = self.control_tx.push(message);
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // status
                Constraint::Length(4), // voice meters
                Constraint::Min(8),    // spectrum
                Constraint::Length(8), // scope
                Constraint::Length(1), // help
            ])
            .split(frame.area());

        let preset_name = self
            .preset_names
            .get(self.snapshot.preset as usize)
            .map(String::as_str)
            .unwrap_or("-");
        let stats = AudioStats::from_buffer(&self.audio_buffer);

        status::render_status(
            frame,
            chunks[0],
            &self.snapshot,
            preset_name,
            self.octave,
            self.bend_cents,
            &stats,
        );
        meters::render_voices(frame, chunks[1], &self.snapshot);
        spectrum::render_spectrum(frame, chunks[2], self.analyzer.bins());
        waveform::render_scope(frame, chunks[3], &self.audio_buffer);

        let help = Paragraph::new(
            " [z-m / q-i] play  [ [ ] ] octave  [Tab] preset  [F1-F8] algorithm  [\u{2190}\u{2192}] bend  [Bksp] panic  [Esc] quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
