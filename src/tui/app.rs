//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (form → result)
//! - Input event handling
//! - Synchronous inference on submit
//!
//! Each submit blocks the UI loop until inference completes; the model
//! evaluates a single row, so there is no background worker.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{artifact, LogisticModel};
use crate::application::PredictorService;

use super::ui::{
    form::{render_form, PredictorFormState},
    render_disclaimer,
    result::{render_result, ResultState},
};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Prediction service (immutable after construction)
    predictor: PredictorService<LogisticModel>,

    /// Form state
    form_state: PredictorFormState,

    /// Result state
    result_state: ResultState,
}

impl App {
    /// Create a new application instance, loading the model artifacts.
    ///
    /// The model directory defaults to `models` and can be overridden
    /// via `CARDIOSCOPE_MODEL_DIR`.
    ///
    /// # Errors
    /// Returns error if the artifacts are missing or malformed; the
    /// application refuses to start without a usable model.
    pub fn new() -> Result<Self> {
        let model_path =
            std::env::var("CARDIOSCOPE_MODEL_DIR").unwrap_or_else(|_| "models".to_string());
        let model_dir = std::path::Path::new(&model_path);

        if !model_dir.exists() {
            return Err(anyhow!(
                "Model path not found at {:?}. Set CARDIOSCOPE_MODEL_DIR to a directory containing model.json and scaler.json.",
                model_dir
            ));
        }

        let bundle = artifact::load_bundle(model_dir)
            .map_err(|e| anyhow!("Failed to load model from {:?}: {}", model_dir, e))?;

        let predictor = PredictorService::new(Arc::new(bundle.classifier), bundle.scaler);

        Ok(Self::with_predictor(predictor))
    }

    /// Create an application with an injected prediction service
    /// (Composition Root pattern).
    ///
    /// This allows `main.rs` or tests to construct the service
    /// externally, e.g. with a mock model.
    #[must_use]
    pub fn with_predictor(predictor: PredictorService<LogisticModel>) -> Self {
        Self {
            screen: Screen::Form,
            should_quit: false,
            predictor,
            form_state: PredictorFormState::default(),
            result_state: ResultState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(area);

                match self.screen {
                    Screen::Form => render_form(f, chunks[0], &self.form_state),
                    Screen::Result => render_result(f, chunks[0], &self.result_state),
                }

                render_disclaimer(f, chunks[1]);
            })?;

            // Handle input (short poll to stay responsive)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Left => {
                self.form_state.cycle_prev();
            }
            KeyCode::Right => {
                self.form_state.cycle_next();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.form_state.load_sample_data();
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.form_state.delete_char();
            }
            KeyCode::Delete => {
                self.form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form_state = PredictorFormState::default();
                self.result_state = ResultState::Idle;
                self.screen = Screen::Form;
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let record = match self.form_state.to_record() {
            Ok(record) => record,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        if let Err(errors) = record.validate() {
            self.form_state.error_message = Some(errors.join(", "));
            return;
        }

        // Synchronous inference: one row, one call; blocks until done.
        match self.predictor.assess(&record) {
            Ok(assessment) => {
                self.result_state = ResultState::Complete { assessment };
            }
            Err(e) => {
                tracing::error!("Inference failed: {}", e);
                self.result_state = ResultState::Error {
                    message: e.to_string(),
                };
            }
        }
        self.screen = Screen::Result;

        // Clear raw input buffers from the UI immediately.
        self.form_state.clear_sensitive();
    }
}
