use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use reporting::{ExportFormat, ReportKind};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
    view_model::{AccountsViewModel, LoadOutcome, Phase},
};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    Users,
    Providers,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Overview, Section::Users, Section::Providers];

    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Users => "Users",
            Self::Providers => "Providers",
        }
    }

    /// Partition listed by this section, if it lists one.
    pub fn kind(self) -> Option<ReportKind> {
        match self {
            Self::Overview => None,
            Self::Users => Some(ReportKind::Users),
            Self::Providers => Some(ReportKind::Providers),
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Overview => Self::Users,
            Self::Users => Self::Providers,
            Self::Providers => Self::Overview,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub mode: InputMode,
    pub query: String,
    pub selected: usize,
    pub toast: Option<ToastState>,
    pub base_url: String,
    manual_refresh: bool,
}

impl AppState {
    fn new(base_url: &str) -> Self {
        Self {
            section: Section::Overview,
            mode: InputMode::Normal,
            query: String::new(),
            selected: 0,
            toast: None,
            base_url: base_url.to_string(),
            manual_refresh: false,
        }
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.toast = None;
        }
    }

    fn switch_to(&mut self, section: Section) {
        if self.section != section {
            self.section = section;
            self.selected = 0;
        }
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

pub struct App {
    vm: AccountsViewModel,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(vm: AccountsViewModel, config: &AppConfig) -> Self {
        Self {
            vm,
            state: AppState::new(&config.base_url),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.vm.refresh();
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            if let Some(outcome) = self.vm.poll() {
                self.on_loaded(outcome);
            }
            self.state.expire_toast(Instant::now());
            let visible = self.visible_len();
            self.state.clamp_selection(visible);

            terminal
                .draw(|frame| ui::render(frame, &self.state, self.vm.view()))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn on_loaded(&mut self, outcome: LoadOutcome) {
        let manual = std::mem::take(&mut self.state.manual_refresh);
        match outcome {
            LoadOutcome::Applied if manual => {
                self.state.toast(ToastLevel::Success, "Accounts refreshed.");
            }
            LoadOutcome::Failed if self.vm.view().phase == Phase::Ready => {
                let message = self
                    .vm
                    .view()
                    .error
                    .clone()
                    .unwrap_or_else(|| "Refresh failed.".to_string());
                self.state.toast(ToastLevel::Error, message);
            }
            _ => {}
        }
    }

    fn visible_len(&self) -> usize {
        match self.state.section.kind() {
            Some(kind) => self.vm.filtered(kind, &self.state.query).len(),
            None => 0,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.state.mode {
            InputMode::Normal => self.handle_normal(map_key(key, InputMode::Normal)),
            InputMode::Search => self.handle_search(map_key(key, InputMode::Search)),
        }
    }

    fn handle_normal(&mut self, action: AppAction) {
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::NextSection => self.state.switch_to(self.state.section.next()),
            AppAction::Cancel => {
                self.state.query.clear();
                self.state.selected = 0;
            }
            AppAction::Up => self.state.select_prev(),
            AppAction::Down => {
                let len = self.visible_len();
                self.state.select_next(len);
            }
            AppAction::Input(ch) => self.handle_command(ch),
            AppAction::Submit | AppAction::Backspace | AppAction::None => {}
        }
    }

    fn handle_command(&mut self, ch: char) {
        match ch {
            '1' | 'o' | 'O' => self.state.switch_to(Section::Overview),
            '2' | 'u' | 'U' => self.state.switch_to(Section::Users),
            '3' | 'p' | 'P' => self.state.switch_to(Section::Providers),
            '/' => {
                if self.state.section == Section::Overview {
                    self.state.switch_to(Section::Users);
                }
                self.state.mode = InputMode::Search;
            }
            'r' | 'R' => self.refresh(),
            'e' | 'E' => self.export(ExportFormat::Xlsx),
            'c' | 'C' => self.export(ExportFormat::Csv),
            'j' => {
                let len = self.visible_len();
                self.state.select_next(len);
            }
            'k' => self.state.select_prev(),
            _ => {}
        }
    }

    fn handle_search(&mut self, action: AppAction) {
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::Input(ch) => {
                self.state.query.push(ch);
                self.state.selected = 0;
            }
            AppAction::Backspace => {
                self.state.query.pop();
                self.state.selected = 0;
            }
            AppAction::Submit => self.state.mode = InputMode::Normal,
            AppAction::Cancel => {
                self.state.query.clear();
                self.state.selected = 0;
                self.state.mode = InputMode::Normal;
            }
            AppAction::Up => self.state.select_prev(),
            AppAction::Down => {
                let len = self.visible_len();
                self.state.select_next(len);
            }
            AppAction::NextSection | AppAction::None => {}
        }
    }

    fn refresh(&mut self) {
        if self.vm.refresh() {
            self.state.manual_refresh = true;
        } else {
            self.state.toast(ToastLevel::Info, "Refresh already in progress.");
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(kind) = self.state.section.kind() else {
            self.state.toast(
                ToastLevel::Info,
                "Open the Users or Providers tab to export.",
            );
            return;
        };
        if self.vm.view().phase == Phase::Loading {
            self.state.toast(ToastLevel::Info, "Nothing to export yet.");
            return;
        }

        match self.vm.export(kind, &self.state.query, format) {
            Ok(path) => {
                self.state
                    .toast(ToastLevel::Success, format!("Saved {}", path.display()));
            }
            Err(err) => {
                self.state
                    .toast(ToastLevel::Error, format!("Export failed: {err}"));
            }
        }
    }
}
