use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{debug, error, info};

use brewdex_core::{
    catalog::{scroll_hit_threshold, CatalogStore, Pager, Selection, StatusFilter, SyncEvent, SORT_CYCLE},
    config::{AppConfig, DataSource},
    i18n::{TranslationDir, Translations},
    models::{Availability, Game, Status, SystemId},
    prefs::{Preferences, PrefsStore, ThemeKind, DEFAULT_LANGUAGE},
    remote::RemoteCatalog,
    route::{Route, RouteHistory},
};

const TICK_RATE: Duration = Duration::from_millis(250);
const PAGE_LOAD_DELAY: Duration = Duration::from_millis(800);
const MAX_ROUTE_LEN: usize = 64;
const CARD_HEIGHT: usize = 3;

#[derive(Debug, Clone)]
struct Theme {
    bg: Color,
    fg: Color,
    accent: Color,
    accent_alt: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Theme {
    fn dark() -> Self {
        Self {
            bg: Color::Rgb(13, 16, 23),
            fg: Color::Rgb(222, 229, 238),
            accent: Color::Rgb(94, 196, 188),
            accent_alt: Color::Rgb(120, 150, 235),
            muted: Color::Rgb(120, 132, 148),
            selection_bg: Color::Rgb(38, 48, 62),
            selection_fg: Color::Rgb(235, 240, 247),
            success: Color::Rgb(128, 200, 125),
            warning: Color::Rgb(224, 180, 100),
            danger: Color::Rgb(222, 110, 110),
        }
    }

    fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 246, 248),
            fg: Color::Rgb(28, 33, 41),
            accent: Color::Rgb(16, 122, 115),
            accent_alt: Color::Rgb(58, 88, 190),
            muted: Color::Rgb(110, 120, 134),
            selection_bg: Color::Rgb(214, 224, 235),
            selection_fg: Color::Rgb(18, 22, 28),
            success: Color::Rgb(38, 128, 62),
            warning: Color::Rgb(160, 112, 24),
            danger: Color::Rgb(176, 48, 48),
        }
    }

    fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Home,
    Games,
}

#[derive(Debug, Clone)]
struct GotoPrompt {
    input: String,
    cursor: usize,
}

impl GotoPrompt {
    fn new() -> Self {
        Self {
            input: "#".to_string(),
            cursor: 1,
        }
    }

    fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_ROUTE_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            self.input.insert(self.cursor, ch);
            self.cursor += ch.len_utf8();
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        let next = (self.cursor as isize + delta).clamp(0, len);
        self.cursor = next as usize;
    }

    fn value(&self) -> String {
        self.input.trim().to_string()
    }
}

enum AppEvent {
    Input(Event),
    Tick,
    PageReady { generation: u64 },
    TranslationsLoaded { translations: Translations },
}

/// High-level application state for the terminal catalog browser.
pub struct BrewdexApp {
    config: AppConfig,
    store: CatalogStore,
    prefs_store: PrefsStore,
    prefs: Preferences,
    translation_dir: TranslationDir,
    translations: Translations,
    theme: Theme,
    screen: Screen,
    history: RouteHistory,
    pager: Pager,
    rendered: Vec<Game>,
    cursor: usize,
    offset: usize,
    list_height: usize,
    home_cursor: usize,
    status: String,
    should_quit: bool,
    goto_prompt: Option<GotoPrompt>,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    sync_rx: Option<mpsc::Receiver<SyncEvent>>,
}

impl BrewdexApp {
    pub fn new(
        config: AppConfig,
        store: CatalogStore,
        prefs_store: PrefsStore,
        prefs: Preferences,
        translation_dir: TranslationDir,
        translations: Translations,
    ) -> Self {
        let theme = Theme::for_kind(prefs.theme);
        Self {
            config,
            store,
            prefs_store,
            prefs,
            translation_dir,
            translations,
            theme,
            screen: Screen::Home,
            history: RouteHistory::default(),
            pager: Pager::new(),
            rendered: Vec::new(),
            cursor: 0,
            offset: 0,
            list_height: 1,
            home_cursor: 0,
            status: "Ready".to_string(),
            should_quit: false,
            goto_prompt: None,
            event_tx: None,
            sync_rx: None,
        }
    }

    pub fn attach_sync(&mut self, receiver: mpsc::Receiver<SyncEvent>) {
        self.sync_rx = Some(receiver);
    }

    pub async fn run(&mut self, initial_route: &str) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx.clone());

        self.status = format!("Loaded {} games", self.store.total_len());
        if !initial_route.is_empty() {
            self.navigate_to(initial_route);
        }

        let mut sync_rx = self.sync_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            if sync_rx.is_some() {
                let mut sync_closed = false;
                let rx = sync_rx.as_mut().unwrap();
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_sync = rx.recv() => {
                        match maybe_sync {
                            Some(event) => self.handle_sync_event(event),
                            None => sync_closed = true,
                        }
                    }
                }
                if sync_closed {
                    sync_rx = None;
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }

            if self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Event::Key(key) = event {
                    let result = if self.goto_prompt.is_some() {
                        self.handle_prompt_key(key)
                    } else {
                        self.handle_key(key)
                    };
                    if let Err(err) = result {
                        self.status = format!("Error: {err}");
                    }
                }
            }
            Some(AppEvent::Tick) => {}
            Some(AppEvent::PageReady { generation }) => self.handle_page_ready(generation),
            Some(AppEvent::TranslationsLoaded { translations }) => {
                info!(keys = translations.len(), "Translations loaded");
                self.translations = translations;
            }
            None => return false,
        }
        true
    }

    fn handle_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Refreshed { catalog } => {
                info!(total = catalog.len(), "Catalog replaced");
                self.store.replace(catalog);
                if self.screen == Screen::Games {
                    self.refresh_games_list();
                }
                self.status = "Catalog refreshed".to_string();
            }
            SyncEvent::Error(err) => {
                error!(?err, "Catalog refresh failed");
                self.status = format!("Refresh failed: {err}");
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('g') => self.goto_prompt = Some(GotoPrompt::new()),
            KeyCode::Char('t') => self.toggle_theme()?,
            KeyCode::Char('l') => self.cycle_language()?,
            KeyCode::Char('s') => self.cycle_sort()?,
            KeyCode::Char('[') => self.go_back(),
            KeyCode::Char(']') => self.go_forward(),
            KeyCode::Esc | KeyCode::Char('h') => {
                if self.screen == Screen::Games {
                    self.navigate_to("");
                }
            }
            _ => match self.screen {
                Screen::Home => self.handle_home_key(key),
                Screen::Games => self.handle_games_key(key),
            },
        }
        Ok(())
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        let total = SystemId::ALL.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.home_cursor = (self.home_cursor + 1).min(total - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.home_cursor = self.home_cursor.saturating_sub(1);
            }
            KeyCode::Home => self.home_cursor = 0,
            KeyCode::End => self.home_cursor = total - 1,
            KeyCode::Enter => {
                let system = SystemId::ALL[self.home_cursor];
                self.navigate_to(&format!("#{}", system.as_str()));
            }
            _ => {}
        }
    }

    fn handle_games_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::PageDown => self.move_cursor(self.list_height.max(1) as isize),
            KeyCode::PageUp => self.move_cursor(-(self.list_height.max(1) as isize)),
            KeyCode::Home => {
                self.cursor = 0;
                self.ensure_cursor_visible();
            }
            KeyCode::End => {
                if !self.rendered.is_empty() {
                    self.cursor = self.rendered.len() - 1;
                    self.ensure_cursor_visible();
                    self.maybe_request_page();
                }
            }
            KeyCode::Char('a') => {
                let mut selection = self.store.selection();
                selection.filter = StatusFilter::all();
                self.store.select(selection);
                self.refresh_games_list();
            }
            KeyCode::Char(digit @ '1'..='4') => {
                let index = digit as usize - '1' as usize;
                let status = Status::ALL[index];
                let mut selection = self.store.selection();
                selection.filter.toggle(status);
                self.store.select(selection);
                self.refresh_games_list();
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.goto_prompt = None;
            }
            KeyCode::Enter => {
                if let Some(prompt) = self.goto_prompt.take() {
                    self.navigate_to(&prompt.value());
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.goto_prompt.as_mut() {
                    prompt.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(prompt) = self.goto_prompt.as_mut() {
                    prompt.delete();
                }
            }
            KeyCode::Left => {
                if let Some(prompt) = self.goto_prompt.as_mut() {
                    prompt.move_cursor(-1);
                }
            }
            KeyCode::Right => {
                if let Some(prompt) = self.goto_prompt.as_mut() {
                    prompt.move_cursor(1);
                }
            }
            KeyCode::Char(ch) => {
                if let Some(prompt) = self.goto_prompt.as_mut() {
                    prompt.insert(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Programmatic navigation: record the route, then transition.
    fn navigate_to(&mut self, raw: &str) {
        let Some(route) = Route::parse(raw) else {
            debug!(route = raw, "Ignoring malformed route");
            self.status = format!("Unknown route: {raw}");
            return;
        };
        self.history.push(&route.as_string());
        self.apply_route(&route);
    }

    /// History traversal resolves through the same transition as
    /// programmatic navigation, without recording a new entry.
    fn resolve_route(&mut self, raw: &str) {
        match Route::parse(raw) {
            Some(route) => self.apply_route(&route),
            None => debug!(route = raw, "Ignoring malformed history entry"),
        }
    }

    fn go_back(&mut self) {
        let route = self.history.back().map(str::to_string);
        if let Some(route) = route {
            self.resolve_route(&route);
        }
    }

    fn go_forward(&mut self) {
        let route = self.history.forward().map(str::to_string);
        if let Some(route) = route {
            self.resolve_route(&route);
        }
    }

    fn apply_route(&mut self, route: &Route) {
        match route {
            Route::Home => {
                self.screen = Screen::Home;
                self.store.select(Selection::home());
                self.rendered.clear();
                self.pager.reset();
                self.cursor = 0;
                self.offset = 0;
                self.status = format!("Loaded {} games", self.store.total_len());
            }
            Route::System { system, .. } => {
                self.screen = Screen::Games;
                if let Some(pos) = SystemId::ALL.iter().position(|s| s == system) {
                    self.home_cursor = pos;
                }
                self.store.select(route.selection());
                self.refresh_games_list();
            }
        }
    }

    /// Full view refresh: recompute happened in the store; reset the
    /// cursor and request the first page.
    fn refresh_games_list(&mut self) {
        self.rendered.clear();
        self.cursor = 0;
        self.offset = 0;
        self.pager.reset();
        self.status = format!("{} games", self.store.filtered_len());
        self.request_page();
    }

    fn request_page(&mut self) {
        let Some(generation) = self.pager.try_begin() else {
            return;
        };
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        spawn(async move {
            tokio::time::sleep(PAGE_LOAD_DELAY).await;
            let _ = tx.send(AppEvent::PageReady { generation }).await;
        });
    }

    fn maybe_request_page(&mut self) {
        if self.screen == Screen::Games && scroll_hit_threshold(self.cursor, self.rendered.len()) {
            self.request_page();
        }
    }

    fn handle_page_ready(&mut self, generation: u64) {
        let total = self.store.filtered_len();
        let Some(range) = self
            .pager
            .complete(generation, total, self.config.page_size)
        else {
            debug!(generation, "Dropping stale page completion");
            return;
        };

        let page = self.store.page(range);
        if !page.is_empty() {
            self.rendered.extend(page);
            self.maybe_request_page();
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rendered.is_empty() {
            return;
        }
        let len = self.rendered.len() as isize;
        let next = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = next as usize;
        self.ensure_cursor_visible();
        self.maybe_request_page();
    }

    fn ensure_cursor_visible(&mut self) {
        if self.rendered.is_empty() || self.list_height == 0 {
            self.offset = 0;
            return;
        }
        let height = self.list_height;
        let max_offset = self.rendered.len().saturating_sub(height);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        if self.offset > max_offset {
            self.offset = max_offset;
        }
    }

    fn toggle_theme(&mut self) -> Result<()> {
        self.prefs.toggle_theme();
        self.theme = Theme::for_kind(self.prefs.theme);
        self.prefs_store.save(&self.prefs)?;
        self.status = format!("Theme: {}", self.prefs.theme.as_str());
        Ok(())
    }

    fn cycle_sort(&mut self) -> Result<()> {
        let next = SORT_CYCLE
            .iter()
            .position(|raw| *raw == self.prefs.sort)
            .map(|pos| SORT_CYCLE[(pos + 1) % SORT_CYCLE.len()])
            .unwrap_or(SORT_CYCLE[0]);
        self.prefs.sort = next.to_string();
        self.prefs_store.save(&self.prefs)?;
        self.store.set_sort(&self.prefs.sort);
        self.status = format!("Sort: {}", sort_label(&self.prefs.sort));
        if self.screen == Screen::Games {
            self.refresh_games_list();
        }
        Ok(())
    }

    fn cycle_language(&mut self) -> Result<()> {
        let languages = self.translation_dir.available_languages();
        if languages.is_empty() {
            return Ok(());
        }
        let next = languages
            .iter()
            .position(|lang| *lang == self.prefs.language)
            .map(|pos| languages[(pos + 1) % languages.len()].clone())
            .unwrap_or_else(|| languages[0].clone());

        if !self.prefs.set_language(&next) {
            return Ok(());
        }
        self.prefs_store.save(&self.prefs)?;
        self.status = format!("Language: {}", self.prefs.language);
        self.reload_translations();
        Ok(())
    }

    fn reload_translations(&mut self) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        let language = self.prefs.language.clone();

        match self.config.data_source {
            DataSource::Local => {
                let dir = self.translation_dir.clone();
                spawn(async move {
                    match tokio::task::spawn_blocking(move || dir.load(&language)).await {
                        Ok(translations) => {
                            let _ = tx.send(AppEvent::TranslationsLoaded { translations }).await;
                        }
                        Err(err) => error!("Translation reload task failed: {err}"),
                    }
                });
            }
            DataSource::Remote => {
                let mirror = RemoteCatalog::new(self.config.mirror());
                spawn(async move {
                    let translations = match mirror.fetch_translations(&language).await {
                        Ok(translations) => translations,
                        Err(err) => {
                            tracing::warn!("Failed to fetch {language} translations: {err:#}");
                            match mirror.fetch_translations(DEFAULT_LANGUAGE).await {
                                Ok(translations) => translations,
                                Err(fallback_err) => {
                                    tracing::warn!(
                                        "Failed to fetch fallback translations: {fallback_err:#}"
                                    );
                                    Translations::empty()
                                }
                            }
                        }
                    };
                    let _ = tx.send(AppEvent::TranslationsLoaded { translations }).await;
                });
            }
        }
    }

    fn t<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.translations.get(key, default)
    }

    fn base_style(&self) -> Style {
        Style::default().bg(self.theme.bg).fg(self.theme.fg)
    }

    fn draw(&mut self, frame: &mut Frame) {
        let background = Block::default().style(self.base_style());
        frame.render_widget(background, frame.size());

        match self.screen {
            Screen::Home => self.draw_home(frame),
            Screen::Games => self.draw_games(frame),
        }
        if let Some(prompt) = self.goto_prompt.clone() {
            self.render_goto_prompt(frame, &prompt);
        }
    }

    fn draw_home(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        let title = self.t("site-title", "Homebrew Games");
        let subtitle = self.t("site-subtitle", "New games for classic systems");
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                subtitle.to_string(),
                Style::default().fg(self.theme.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().style(self.base_style()));
        frame.render_widget(header, chunks[0]);

        let counts = self.store.counts_by_system();
        let items: Vec<ListItem> = counts
            .iter()
            .enumerate()
            .map(|(idx, (system, count))| {
                let marker = if idx == self.home_cursor {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                let name_style = if idx == self.home_cursor {
                    Style::default()
                        .fg(self.theme.selection_fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.fg)
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(format!("{:<18}", system.display_name()), name_style),
                    Span::styled(
                        format!("{count} {}", self.t("games-total", "games")),
                        Style::default().fg(self.theme.muted),
                    ),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.home_cursor));
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.t("nav-systems", "Systems").to_string())
                    .style(self.base_style()),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, centered_rect(44, chunks[1].height, chunks[1]), &mut list_state);

        self.render_status(frame, chunks[2], "↑/↓ select · Enter open · g goto · t theme · l language · q quit");
    }

    fn draw_games(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_games_header(frame, chunks[0]);

        let list_area = chunks[1];
        self.list_height = (list_area.height.saturating_sub(2) as usize / CARD_HEIGHT).max(1);
        self.ensure_cursor_visible();
        self.render_game_cards(frame, list_area);

        self.render_status(
            frame,
            chunks[2],
            "1-4 filters · a all · s sort · [ ] history · Esc home · q quit",
        );
    }

    fn render_games_header(&self, frame: &mut Frame, area: Rect) {
        let selection = self.store.selection();
        let system_name = selection
            .system
            .map(|system| system.display_name().to_string())
            .unwrap_or_default();

        let mut filter_spans = vec![Span::styled(
            format!("[{}] ", self.t("filter-all", "All")),
            if selection.filter.is_all() {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            },
        )];
        for (idx, status) in Status::ALL.into_iter().enumerate() {
            let label = self.t(status.filter_key(), filter_default_label(status));
            let style = if selection.filter.contains(status) {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted)
            };
            filter_spans.push(Span::styled(format!("[{} {label}] ", idx + 1), style));
        }

        let count_line = format!(
            "{} {} · {}: {}",
            self.store.filtered_len(),
            self.t("games-total", "games"),
            self.t("sort-by", "Sort"),
            sort_label(&self.prefs.sort),
        );

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                system_name,
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(filter_spans),
            Line::from(Span::styled(
                count_line,
                Style::default().fg(self.theme.muted),
            )),
        ])
        .block(Block::default().style(self.base_style()));
        frame.render_widget(header, area);
    }

    fn render_game_cards(&mut self, frame: &mut Frame, area: Rect) {
        let total = self.rendered.len();
        let visible = self.list_height.max(1);
        let end = cmp::min(self.offset + visible, total);

        let items: Vec<ListItem> = if total == 0 {
            let placeholder = if self.pager.is_loading() {
                self.t("loading-text", "Loading more games...")
            } else {
                self.t("no-games", "No games here yet")
            };
            vec![ListItem::new(Line::from(Span::styled(
                format!("  {placeholder}"),
                Style::default().fg(self.theme.muted),
            )))]
        } else {
            self.rendered[self.offset..end]
                .iter()
                .enumerate()
                .map(|(idx, game)| {
                    let absolute_idx = self.offset + idx;
                    self.game_card(game, absolute_idx == self.cursor)
                })
                .collect()
        };

        let mut list_state = ListState::default();
        if total > 0 {
            list_state.select(Some(self.cursor.saturating_sub(self.offset)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{}/{}", self.rendered.len(), self.store.filtered_len()))
            .style(self.base_style());
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn game_card(&self, game: &Game, selected: bool) -> ListItem<'static> {
        let marker = if selected {
            Span::styled("▶ ", Style::default().fg(self.theme.accent))
        } else {
            Span::raw("  ")
        };

        let title_style = if selected {
            Style::default()
                .fg(self.theme.selection_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD)
        };

        let status_chip = if game.availability() == Availability::Free {
            self.t("free-game", "Free").to_string()
        } else {
            game.status.display_name().to_string()
        };
        let chip_style = Style::default().fg(match game.status {
            Status::NewGames => self.theme.success,
            Status::Ports => self.theme.accent_alt,
            Status::ReReleases => self.theme.warning,
            Status::InDevelopment => self.theme.danger,
        });

        let year = game
            .year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "n/a".to_string());

        let (action, action_style) = match game.availability() {
            Availability::Free => (
                self.t("download-free", "Download Free"),
                Style::default().fg(self.theme.success),
            ),
            Availability::Paid => (
                self.t("buy-now", "Buy Now"),
                Style::default().fg(self.theme.accent),
            ),
            Availability::Unavailable => (
                self.t("not-available", "Not Available"),
                Style::default().fg(self.theme.muted),
            ),
        };

        let title_line = Line::from(vec![
            marker,
            Span::styled(game.title.clone(), title_style),
            Span::styled(
                format!("  ({year})  "),
                Style::default().fg(self.theme.muted),
            ),
            Span::styled(format!("[{status_chip}]"), chip_style),
        ]);
        let detail_line = Line::from(vec![
            Span::raw("    "),
            Span::styled(game.developer.clone(), Style::default().fg(self.theme.muted)),
            Span::raw("  ·  "),
            Span::styled(action.to_string(), action_style),
        ]);

        ListItem::new(vec![title_line, detail_line, Line::from("")])
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, hints: &str) {
        let mut left = self.status.clone();
        if self.screen == Screen::Games {
            if self.pager.is_loading() {
                left = self.t("loading-text", "Loading more games...").to_string();
            } else if !self.pager.has_more() {
                left = self.t("no-more-games", "No more games to load").to_string();
            }
        }

        let status = Paragraph::new(vec![
            Line::from(Span::styled(left, Style::default().fg(self.theme.fg))),
            Line::from(Span::styled(
                hints.to_string(),
                Style::default().fg(self.theme.muted),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::TOP)
                .style(self.base_style()),
        );
        frame.render_widget(status, area);
    }

    fn render_goto_prompt(&self, frame: &mut Frame, prompt: &GotoPrompt) {
        let area = centered_rect(46, 5, frame.size());
        frame.render_widget(Clear, area);

        let before = &prompt.input[..prompt.cursor];
        let at = prompt.input[prompt.cursor..].chars().next();
        let after: String = prompt
            .input[prompt.cursor..]
            .chars()
            .skip(1)
            .collect();

        let input_line = Line::from(vec![
            Span::styled(before.to_string(), Style::default().fg(self.theme.fg)),
            Span::styled(
                at.map(String::from).unwrap_or_else(|| " ".to_string()),
                Style::default()
                    .bg(self.theme.accent)
                    .fg(self.theme.bg),
            ),
            Span::styled(after, Style::default().fg(self.theme.fg)),
        ]);

        let body = Paragraph::new(vec![
            input_line,
            Line::from(Span::styled(
                "Enter go · Esc cancel · e.g. #nes/ports",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Go to route")
                .style(self.base_style()),
        );
        frame.render_widget(body, area);
    }
}

fn filter_default_label(status: Status) -> &'static str {
    match status {
        Status::NewGames => "New Games",
        Status::Ports => "Ports",
        Status::ReReleases => "Re-Releases",
        Status::InDevelopment => "In Development",
    }
}

fn sort_label(raw: &str) -> &str {
    match raw {
        "title-asc" => "Title A-Z",
        "title-desc" => "Title Z-A",
        "title-num-asc" => "Title 0-9",
        "title-num-desc" => "Title 9-0",
        "developer-asc" => "Developer A-Z",
        "developer-desc" => "Developer Z-A",
        "developer-num-asc" => "Developer 0-9",
        "developer-num-desc" => "Developer 9-0",
        "year-asc" => "Year, oldest first",
        "year-desc" => "Year, newest first",
        other => other,
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
