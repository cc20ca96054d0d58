//! Terminal pad: the mouse is the hand.
//!
//! Horizontal position inside the pad is the pitch control, vertical
//! position the volume (top is loud). Every mouse move is one control tick.

use std::io::stdout;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use handsynth::mapping::Voicing;
use handsynth::synth::velocity;
use handsynth::{PlayMode, SoundOutput, Synth};

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// Modulation change per key press
const MOD_STEP: f32 = 0.1;

/// Take over the terminal and play until the user quits
pub fn run<O: SoundOutput>(
    synth: Synth<O>,
    scope: Option<Consumer<f32>>,
    title: Option<String>,
) -> EyreResult<()> {
    let mut app = PadApp::new(synth, scope, title);
    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;

    let result = app.run(&mut terminal);

    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

struct PadApp<O: SoundOutput> {
    synth: Synth<O>,
    /// Rendered audio, absent when playing through MIDI
    audio_rx: Option<Consumer<f32>>,
    audio_buffer: Vec<f32>,
    title: String,
    /// Last control values sent
    pitch: f32,
    volume: f32,
    modulation: f32,
    /// Where the pad was drawn last frame, for mapping mouse positions
    pad: Rect,
    should_quit: bool,
}

impl<O: SoundOutput> PadApp<O> {
    fn new(synth: Synth<O>, audio_rx: Option<Consumer<f32>>, title: Option<String>) -> Self {
        Self {
            synth,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            title: title.unwrap_or_else(|| "handsynth".to_string()),
            pitch: 0.0,
            volume: 0.0,
            modulation: 0.0,
            pad: Rect::default(),
            should_quit: false,
        }
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Keep the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let Some(rx) = self.audio_rx.as_mut() else {
            return;
        };
        while let Ok(sample) = rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('m') => {
                let next = match self.synth.mode() {
                    PlayMode::Notes => PlayMode::Chords,
                    PlayMode::Chords => PlayMode::Notes,
                };
                self.synth.all_notes_off();
                self.synth.set_mode(next);
            }
            KeyCode::Char('[') => self.set_modulation(self.modulation - MOD_STEP),
            KeyCode::Char(']') => self.set_modulation(self.modulation + MOD_STEP),
            KeyCode::Char(' ') => self.synth.all_notes_off(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_)
        ) {
            return;
        }
        if let Some((pitch, volume)) = control_at(self.pad, mouse.column, mouse.row) {
            self.pitch = pitch;
            self.volume = volume;
            self.synth.send(pitch, volume);
        }
    }

    fn set_modulation(&mut self, value: f32) {
        self.modulation = value.clamp(0.0, 1.0);
        self.synth.mod_wheel(self.modulation);
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: status, pad, waveform, help
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(6),    // Pad
                Constraint::Length(8), // Waveform
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        self.render_status(frame, chunks[0]);

        let pad_block = Block::default().title(" Pad ").borders(Borders::ALL);
        self.pad = pad_block.inner(chunks[1]);
        frame.render_widget(pad_block, chunks[1]);
        self.render_cursor(frame);

        render_waveform(frame, chunks[2], &self.audio_buffer);

        let help = Paragraph::new(" [Mouse] Play  [M] Notes/Chords  [ [ ] ] Mod  [Space] Silence  [Q] Quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL);

        let (mode, playing) = match self.synth.mode() {
            PlayMode::Notes => ("Notes", self.synth.notes().current().map(|n| n.to_string())),
            PlayMode::Chords => ("Chords", self.synth.chords().current().map(describe_pitches)),
        };

        let line = Line::from(vec![
            Span::styled(format!(" {mode}  "), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{:<14}", playing.unwrap_or_else(|| "-".to_string())),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!("vel {:>3}  ", velocity(self.volume)),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!("mod {:.1}", self.modulation),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_cursor(&self, frame: &mut Frame) {
        let pad = self.pad;
        if pad.width == 0 || pad.height == 0 {
            return;
        }
        let x = pad.x + (self.pitch * (pad.width - 1) as f32).round() as u16;
        let y = pad.y + ((1.0 - self.volume) * (pad.height - 1) as f32).round() as u16;
        frame
            .buffer_mut()
            .set_string(x, y, "●", Style::default().fg(Color::Yellow));
    }
}

/// Control values for a mouse position, None outside the pad
fn control_at(pad: Rect, column: u16, row: u16) -> Option<(f32, f32)> {
    if !pad.contains(Position::new(column, row)) {
        return None;
    }
    let span_x = pad.width.saturating_sub(1).max(1) as f32;
    let span_y = pad.height.saturating_sub(1).max(1) as f32;

    let pitch = (column - pad.x) as f32 / span_x;
    let volume = 1.0 - (row - pad.y) as f32 / span_y;
    Some((pitch, volume))
}

fn describe_pitches<V: Voicing>(voicing: &V) -> String {
    voicing
        .pitches()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let block = Block::default().title(" Waveform ").borders(Borders::ALL);

    let data: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / audio_buffer.len() as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
