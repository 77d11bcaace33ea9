use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glyphfall_config::Config;
use glyphfall_core::Variant;
use glyphfall_field::Field;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
};
use tracing::{debug, info};

mod cli;
mod logging;

use cli::Args;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    if let Some(path) = logging::init()? {
        info!(path = %path.display(), "logging enabled");
    }

    let config = args.resolve_config()?;
    if args.save_config {
        let path = args.save(&config)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let terminal = ratatui::init();
    let result = App::new(config).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Is the animation frozen?
    paused: bool,
    /// Effective settings.
    config: Config,
    /// Variant currently on screen.
    variant: Variant,
    /// Seed the current field was built from.
    seed: u64,
    /// Field sized to the last seen terminal area; built on first draw.
    field: Option<Field>,
    /// Terminal area the field was built for.
    field_area: Rect,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            running: false,
            paused: false,
            variant: config.variant,
            seed,
            config,
            field: None,
            field_area: Rect::default(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        info!(variant = %self.variant, seed = self.seed, frame_ms = self.config.frame_ms, "starting");
        let frame_time = Duration::from_millis(self.config.frame_ms);
        let mut next_frame = Instant::now();
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            // A slow frame pushes the schedule back instead of bursting.
            next_frame = (next_frame + frame_time).max(Instant::now());
            self.handle_crossterm_events(next_frame)?;
        }
        Ok(())
    }

    /// Renders the field, plus a key legend while paused.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if self.field.is_none() || area != self.field_area {
            self.rebuild_field(area);
        }
        if let Some(field) = self.field.as_mut() {
            glyphfall_field::render(field, frame, self.paused);
        }

        if self.paused {
            let [_, legend] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            let help = Line::from(vec![
                "space".bold().green(),
                " resume  ".dark_gray(),
                "v".bold().green(),
                format!(" variant ({})  ", self.variant).dark_gray(),
                "r".bold().green(),
                " reseed  ".dark_gray(),
                "q".bold().green(),
                " quit".dark_gray(),
            ])
            .centered();
            frame.render_widget(help, legend);
        }
    }

    /// Build a fresh field for `area` from the current variant and seed.
    fn rebuild_field(&mut self, area: Rect) {
        let mut config = self.config.field_config(self.variant, 0, 0);
        config.fit_terminal(area.width, area.height);
        let field = Field::new(config, self.seed);
        debug!(
            variant = %self.variant,
            cols = area.width,
            rows = area.height,
            entities = field.glyphs().len(),
            "field rebuilt"
        );
        self.field = Some(field);
        self.field_area = area;
    }

    /// Reads the crossterm events until the next frame is due.
    fn handle_crossterm_events(&mut self, deadline: Instant) -> color_eyre::Result<()> {
        while self.running {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                // Resizes are picked up by the size check on the next draw.
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('v')) => self.cycle_variant(),
            (_, KeyCode::Char('r')) => self.reseed(),
            _ => {}
        }
    }

    /// Freeze or resume the animation.
    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Switch to the next variant; the field is rebuilt on the next draw.
    fn cycle_variant(&mut self) {
        self.variant = self.variant.next();
        self.field = None;
        info!(variant = %self.variant, "variant changed");
    }

    /// Draw a new seed; the field is rebuilt on the next draw.
    fn reseed(&mut self) {
        self.seed = rand::random();
        self.field = None;
        info!(seed = self.seed, "reseeded");
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
