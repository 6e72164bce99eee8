//! The interactive chat loop: terminal lifecycle, event polling, and
//! keyboard dispatch.

use std::error::Error;
use std::io;
use std::path::Path;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste,
        EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tracing::debug;

use crate::core::composer::{ComposerAction, ComposerState};
use crate::core::config::Config;
use crate::core::drafts::DraftAttachment;
use crate::core::transcript::ChatStore;
use crate::render::LinkPolicy;
use crate::ui::layout;
use crate::utils::logging::LoggingState;

const DEFAULT_REACTION: &str = "👍";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compose,
    /// Collecting a file path for Alt+A; Enter stages, Esc cancels.
    AttachPrompt,
    /// Collecting a log file path for Alt+L when no log is configured;
    /// Enter enables logging, Esc cancels.
    LogPrompt,
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct ChatApp {
    pub store: ChatStore,
    pub composer: ComposerState,
    pub logging: LoggingState,
    pub config: Config,
    pub link_policy: LinkPolicy,
    /// Index of the message carrying the selection gutter.
    pub selected: Option<usize>,
    /// Scroll distance up from the transcript's bottom; 0 follows new
    /// messages.
    pub scroll_from_bottom: u16,
    pub status: Option<String>,
    pub mode: Mode,
    /// Shared input buffer for the attach and log-file prompts.
    pub prompt_input: String,
}

impl ChatApp {
    pub fn new(config: Config, log_file: Option<String>) -> Self {
        let link_policy = if config.strict_links.unwrap_or(false) {
            LinkPolicy::Strict
        } else {
            LinkPolicy::Lenient
        };
        Self {
            store: ChatStore::with_seed(),
            composer: ComposerState::new(),
            logging: LoggingState::new(log_file),
            config,
            link_policy,
            selected: None,
            scroll_from_bottom: 0,
            status: None,
            mode: Mode::Compose,
            prompt_input: String::new(),
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    fn send(&mut self) {
        let Some((text, drafts)) = self.composer.take_send() else {
            return;
        };
        if let Some(id) = self.store.send_message(&text, drafts) {
            self.scroll_from_bottom = 0;
            self.selected = None;
            self.status = None;
            if let Some(message) = self.store.get(id) {
                if let Err(e) = self.logging.log_message(message, self.config.user_label()) {
                    self.set_status(format!("Log write failed: {e}"));
                }
            }
        }
    }

    fn stage_attachment(&mut self) {
        let path = self.prompt_input.trim().to_string();
        self.prompt_input.clear();
        self.mode = Mode::Compose;
        if path.is_empty() {
            return;
        }
        match DraftAttachment::stage_file(Path::new(&path)) {
            Ok(draft) => {
                self.set_status(format!("Attached {}", draft.name));
                self.composer.stage_draft(draft);
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn enable_logging(&mut self) {
        let path = self.prompt_input.trim().to_string();
        self.prompt_input.clear();
        self.mode = Mode::Compose;
        if path.is_empty() {
            return;
        }
        match self.logging.set_log_file(path) {
            Ok(status) => self.set_status(status),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn discard_last_draft(&mut self) {
        match self.composer.discard_last_draft() {
            Ok(Some(name)) => self.set_status(format!("Discarded {name}")),
            Ok(None) => self.set_status("No drafts to discard"),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn move_selection(&mut self, up: bool) {
        if self.store.is_empty() {
            return;
        }
        let last = self.store.len() - 1;
        self.selected = Some(match (self.selected, up) {
            (None, _) => last,
            (Some(i), true) => i.saturating_sub(1),
            (Some(i), false) => (i + 1).min(last),
        });
    }

    fn toggle_selected_reaction(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let index = self.selected.unwrap_or(self.store.len() - 1);
        let id = self.store.messages()[index].id;
        self.store.toggle_reaction(id, DEFAULT_REACTION);
    }

    fn toggle_logging(&mut self) {
        match self.logging.toggle_logging() {
            Ok(status) => self.set_status(status),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn scroll_up(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines);
    }

    fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    fn handle_event(&mut self, ev: Event) -> Flow {
        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => {
                self.composer.apply(ComposerAction::Paste(text));
                Flow::Continue
            }
            Event::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp => self.scroll_up(3),
                    MouseEventKind::ScrollDown => self.scroll_down(3),
                    _ => {}
                }
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return Flow::Quit,
                KeyCode::Char('u') if self.mode == Mode::Compose => {
                    self.composer.apply(ComposerAction::ClearAll);
                    return Flow::Continue;
                }
                _ => {}
            }
        }

        if self.mode != Mode::Compose {
            match key.code {
                KeyCode::Esc => {
                    self.prompt_input.clear();
                    self.mode = Mode::Compose;
                }
                KeyCode::Enter if self.mode == Mode::AttachPrompt => self.stage_attachment(),
                KeyCode::Enter => self.enable_logging(),
                KeyCode::Backspace => {
                    self.prompt_input.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                    self.prompt_input.push(c);
                }
                _ => {}
            }
            return Flow::Continue;
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            match key.code {
                KeyCode::Enter => self.composer.apply(ComposerAction::Newline),
                KeyCode::Char('b') => self.composer.apply(ComposerAction::Bold),
                KeyCode::Char('i') => self.composer.apply(ComposerAction::Italic),
                KeyCode::Char('s') => self.composer.apply(ComposerAction::Strikethrough),
                KeyCode::Char('c') => self.composer.apply(ComposerAction::CodeInline),
                KeyCode::Char('k') => self.composer.apply(ComposerAction::Link),
                KeyCode::Char('u') => self.composer.apply(ComposerAction::BulletList),
                KeyCode::Char('o') => self.composer.apply(ComposerAction::NumberedList),
                KeyCode::Char('q') => self.composer.apply(ComposerAction::Quote),
                KeyCode::Char('1') => self.composer.apply(ComposerAction::Heading1),
                KeyCode::Char('2') => self.composer.apply(ComposerAction::Heading2),
                KeyCode::Char('a') => self.mode = Mode::AttachPrompt,
                KeyCode::Char('x') => self.discard_last_draft(),
                KeyCode::Char('r') => self.toggle_selected_reaction(),
                KeyCode::Char('l') => {
                    if self.logging.is_configured() {
                        self.toggle_logging();
                    } else {
                        self.mode = Mode::LogPrompt;
                    }
                }
                KeyCode::Up => self.move_selection(true),
                KeyCode::Down => self.move_selection(false),
                _ => {}
            }
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Enter => self.send(),
            KeyCode::Esc => {
                self.selected = None;
                self.status = None;
            }
            KeyCode::Backspace => self.composer.apply(ComposerAction::Backspace),
            KeyCode::Delete => self.composer.apply(ComposerAction::Delete),
            KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.composer.apply(ComposerAction::SelectLeft)
            }
            KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.composer.apply(ComposerAction::SelectRight)
            }
            KeyCode::Left => self.composer.apply(ComposerAction::MoveLeft),
            KeyCode::Right => self.composer.apply(ComposerAction::MoveRight),
            KeyCode::Home => self.composer.apply(ComposerAction::MoveHome),
            KeyCode::End => self.composer.apply(ComposerAction::MoveEnd),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::Char(c) => self.composer.apply(ComposerAction::Insert(c)),
            _ => {}
        }
        Flow::Continue
    }
}

/// Run the full-screen chat interface until the user quits.
pub async fn run_chat(log_file: Option<String>, config: Config) -> Result<(), Box<dyn Error>> {
    let mut app = ChatApp::new(config, log_file);
    debug!(seed_messages = app.store.len(), "starting chat session");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChatApp,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| layout::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if app.handle_event(event::read()?) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ChatApp {
        ChatApp::new(Config::default(), None)
    }

    fn press(app: &mut ChatApp, code: KeyCode, modifiers: KeyModifiers) {
        let _ = app.handle_key(KeyEvent::new(code, modifiers));
    }

    fn type_text(app: &mut ChatApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn typing_and_enter_sends_a_message() {
        let mut app = app();
        let before = app.store.len();
        type_text(&mut app, "hello");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.store.len(), before + 1);
        assert_eq!(app.store.messages().last().unwrap().text, "hello");
        assert_eq!(app.composer.text(), "");
    }

    #[test]
    fn enter_with_empty_composer_sends_nothing() {
        let mut app = app();
        let before = app.store.len();
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.store.len(), before);
    }

    #[test]
    fn alt_enter_inserts_a_newline_instead_of_sending() {
        let mut app = app();
        type_text(&mut app, "one");
        press(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        type_text(&mut app, "two");
        assert_eq!(app.composer.text(), "one\ntwo");
    }

    #[test]
    fn alt_b_wraps_in_bold_markers() {
        let mut app = app();
        type_text(&mut app, "word");
        for _ in 0..4 {
            press(&mut app, KeyCode::Left, KeyModifiers::SHIFT);
        }
        press(&mut app, KeyCode::Char('b'), KeyModifiers::ALT);
        assert_eq!(app.composer.text(), "**word**");
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = app();
        let flow = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(flow == Flow::Quit);
    }

    #[test]
    fn alt_r_toggles_a_reaction_on_the_last_message() {
        let mut app = app();
        press(&mut app, KeyCode::Char('r'), KeyModifiers::ALT);
        let last = app.store.messages().last().unwrap();
        assert_eq!(last.reactions.len(), 1);
        press(&mut app, KeyCode::Char('r'), KeyModifiers::ALT);
        let last = app.store.messages().last().unwrap();
        assert!(last.reactions.is_empty());
    }

    #[test]
    fn selection_moves_with_alt_arrows_and_clamps() {
        let mut app = app();
        let last = app.store.len() - 1;
        press(&mut app, KeyCode::Up, KeyModifiers::ALT);
        assert_eq!(app.selected, Some(last));
        press(&mut app, KeyCode::Down, KeyModifiers::ALT);
        assert_eq!(app.selected, Some(last));
        for _ in 0..20 {
            press(&mut app, KeyCode::Up, KeyModifiers::ALT);
        }
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn attach_prompt_collects_a_path_and_cancels_cleanly() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'), KeyModifiers::ALT);
        assert_eq!(app.mode, Mode::AttachPrompt);
        type_text(&mut app, "/tmp/x");
        assert_eq!(app.prompt_input, "/tmp/x");
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.mode, Mode::Compose);
        assert!(app.prompt_input.is_empty());
        assert!(app.composer.drafts().is_empty());
    }

    #[test]
    fn ctrl_u_clears_the_composer() {
        let mut app = app();
        type_text(&mut app, "half a tho");
        press(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(app.composer.text(), "");
        assert_eq!(app.composer.cursor(), 0);
    }

    #[test]
    fn alt_l_without_a_log_file_prompts_and_enables_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");

        let mut app = app();
        press(&mut app, KeyCode::Char('l'), KeyModifiers::ALT);
        assert_eq!(app.mode, Mode::LogPrompt);
        type_text(&mut app, &path.to_string_lossy());
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.mode, Mode::Compose);
        assert!(app.status.as_deref().unwrap().starts_with("Logging enabled"));
        assert!(app.logging.is_configured());

        type_text(&mut app, "logged line");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(std::fs::read_to_string(&path).unwrap().contains("logged line"));
    }

    #[test]
    fn alt_l_with_a_log_file_toggles_pause() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");
        let mut app = ChatApp::new(
            Config::default(),
            Some(path.to_string_lossy().into_owned()),
        );
        assert!(app.logging.get_status_string().starts_with("active"));

        press(&mut app, KeyCode::Char('l'), KeyModifiers::ALT);
        assert!(app.status.as_deref().unwrap().starts_with("Logging paused"));
        assert!(app.logging.get_status_string().starts_with("paused"));

        press(&mut app, KeyCode::Char('l'), KeyModifiers::ALT);
        assert!(app.logging.get_status_string().starts_with("active"));
    }

    #[test]
    fn staging_a_missing_file_reports_status_instead_of_failing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'), KeyModifiers::ALT);
        type_text(&mut app, "/no/such/file.bin");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.mode, Mode::Compose);
        assert!(app.status.as_deref().unwrap_or("").contains("file.bin"));
        assert!(app.composer.drafts().is_empty());
    }

    #[test]
    fn scrolling_up_leaves_follow_mode_and_down_returns() {
        let mut app = app();
        press(&mut app, KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(app.scroll_from_bottom, 10);
        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.scroll_from_bottom, 0);
    }
}
