use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState, Wrap}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use nourrise::application::{advisor::Advisor, day_service::{DayReport, DayService, DayServiceImpl}, task_service::{TaskService, TaskServiceImpl}};
use nourrise::config::{prepare_sqlite_file, Config};
use nourrise::domain::{error::EngineError, history::HistoryStats, ordering::{visible_neighbour_slot, StatusFilter}, summary::DATE_FORMAT, task::{CreateTask, Importance, Task, TaskStatus, UpdateTask}};
use nourrise::infrastructure::sqlite_repo::SqliteStore;

type Tasks = TaskServiceImpl<SqliteStore>;
type Days = DayServiceImpl<SqliteStore, SqliteStore>;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    prepare_sqlite_file(&config.database_url)?;
    let store = SqliteStore::connect(&config.database_url).await?;
    store.init_all().await?;
    let tasks = TaskServiceImpl::new(store.clone());
    let days = DayServiceImpl::new(store.clone(), store, Arc::new(Advisor::new(config.advice_seed)));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, tasks, days, config.database_url).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create, Rename }

struct App {
    tasks: Tasks,
    days: Days,
    database_url: String,
    items: Vec<Task>,
    selected: usize,
    last_tick: Instant,
    mode: Mode,
    list_state: ListState,
    filter: StatusFilter,
    draft_name: String,
    draft_importance: Importance,
    report: Option<DayReport>,
    stats: HistoryStats,
    flash: String,
}

impl App {
    /// Reloads the filtered list and the day/history figures.
    async fn load(&mut self) -> Result<()> {
        self.items = self.tasks.list(self.filter).await?;
        self.report = Some(self.days.today().await?);
        self.stats = self.days.stats().await?.stats;
        let len = self.items.len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
        Ok(())
    }

    fn current(&self) -> Option<&Task> { self.items.get(self.selected) }

    fn reset_draft(&mut self) {
        self.mode = Mode::View;
        self.draft_name.clear();
        self.draft_importance = Importance::default();
    }

    /// Swaps the selected task with its visible neighbour, jumping over tasks
    /// hidden by the current filter.
    async fn shift(&mut self, up: bool) -> Result<()> {
        let Some(id) = self.current().map(|t| t.id) else { return Ok(()) };
        let all = self.tasks.list(StatusFilter::All).await?;
        let Some(target) = visible_neighbour_slot(&all, self.filter, id, up) else { return Ok(()) };
        self.tasks.move_to(id, target).await?;
        self.load().await?;
        if let Some(idx) = self.items.iter().position(|t| t.id == id) { self.selected = idx; }
        Ok(())
    }

    async fn validate_today(&mut self) -> Result<()> {
        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        self.flash = match self.days.finalize(&today).await {
            Ok(summary) => format!("{} validated: {}% / {:.1} of 20", summary.date, summary.completion_rate, summary.score),
            Err(err) => match err.downcast_ref::<EngineError>() {
                Some(engine) => engine.to_string(),
                None => return Err(err),
            },
        };
        self.load().await
    }
}

fn status_mark(status: TaskStatus) -> &'static str {
    match status { TaskStatus::NotStarted => "[ ]", TaskStatus::InProgress => "[~]", TaskStatus::Done => "[x]" }
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, tasks: Tasks, days: Days, database_url: String) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App { tasks, days, database_url, items: vec![], selected: 0, last_tick: Instant::now(), mode: Mode::View, list_state: ListState::default(), filter: StatusFilter::All, draft_name: String::new(), draft_importance: Importance::default(), report: None, stats: HistoryStats::default(), flash: String::new() };
    app.load().await?;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let header = Paragraph::new("Enter: status, i: importance, K/J: move, n: new, e: rename, d: delete, f: filter, v: validate day, q: quit")
                .block(Block::default().borders(Borders::ALL).title("nourrise"));
            f.render_widget(header, chunks[0]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            let list_items: Vec<ListItem> = app.items.iter().map(|t| {
                ListItem::new(format!("{} {} (x{})", status_mark(t.status), t.name, u8::from(t.importance)))
            }).collect();
            if app.items.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(format!("tasks [{}]", app.filter.label())))
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, middle[0], &mut app.list_state);

            let today = match &app.report {
                Some(r) => format!(
                    "Tasks: {}\nCompletion: {}%\nScore: {:.1} / 20\nPerformance: {}\n\n{}\n\n\"{}\"",
                    r.task_count, r.completion_rate, r.score, r.performance.label(), r.advice, r.quote
                ),
                None => String::new(),
            };
            let history = format!(
                "\n\nValidated days: {}\nAverage score: {:.1}\nStreak: {} day(s)",
                app.stats.days, app.stats.average_score, app.stats.current_streak
            );
            let details = Paragraph::new(today + &history)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("today"));
            f.render_widget(details, middle[1]);

            let footer_text = match app.mode {
                Mode::View if !app.flash.is_empty() => app.flash.clone(),
                Mode::View => format!("DATABASE_URL={}  |  Filter=[{}]", app.database_url, app.filter.label()),
                Mode::Create => format!("New: {}_  [importance {}]  |  (Tab: importance, Enter: save, Esc: cancel)", app.draft_name, app.draft_importance.label()),
                Mode::Rename => format!("Rename: {}_  |  (Enter: save, Esc: cancel)", app.draft_name),
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title(match app.mode { Mode::View => "info", Mode::Create => "create", Mode::Rename => "rename" }));
            f.render_widget(footer, chunks[2]);
        })?;

        let timeout = tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only act on key presses; ignore repeats and releases to prevent duplicate input
                if key.kind != KeyEventKind::Press { continue; }
                match app.mode {
                    Mode::View => {
                        app.flash.clear();
                        match key.code {
                            KeyCode::Char('q') => break,
                            KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                            KeyCode::Down => { if app.selected + 1 < app.items.len() { app.selected += 1; } }
                            KeyCode::Enter | KeyCode::Char(' ') => {
                                if let Some(task) = app.current() {
                                    let (id, status) = (task.id, task.status.cycle());
                                    app.tasks.set_status(id, status).await?;
                                    app.load().await?;
                                }
                            }
                            KeyCode::Char('i') => {
                                if let Some(task) = app.current() {
                                    let (id, importance) = (task.id, task.importance.next());
                                    app.tasks.update(id, UpdateTask { importance: Some(importance), ..UpdateTask::default() }).await?;
                                    app.load().await?;
                                }
                            }
                            KeyCode::Char('K') => app.shift(true).await?,
                            KeyCode::Char('J') => app.shift(false).await?,
                            KeyCode::Char('n') => {
                                app.reset_draft();
                                app.mode = Mode::Create;
                            }
                            KeyCode::Char('e') => {
                                if let Some(name) = app.current().map(|t| t.name.clone()) {
                                    app.draft_name = name;
                                    app.mode = Mode::Rename;
                                }
                            }
                            KeyCode::Char('d') => {
                                if let Some(id) = app.current().map(|t| t.id) {
                                    app.tasks.delete(id).await?;
                                    if app.selected > 0 { app.selected -= 1; }
                                    app.load().await?;
                                }
                            }
                            KeyCode::Char('f') => {
                                app.filter = app.filter.next();
                                app.selected = 0;
                                app.load().await?;
                            }
                            KeyCode::Char('v') => app.validate_today().await?,
                            _ => {}
                        }
                    }
                    Mode::Create => match key.code {
                        KeyCode::Esc => app.reset_draft(),
                        KeyCode::Enter => {
                            if !app.draft_name.trim().is_empty() {
                                let input = CreateTask { name: app.draft_name.clone(), importance: app.draft_importance };
                                app.tasks.create(input).await?;
                            }
                            app.reset_draft();
                            app.load().await?;
                        }
                        KeyCode::Tab => app.draft_importance = app.draft_importance.next(),
                        KeyCode::Backspace => { app.draft_name.pop(); }
                        KeyCode::Char(c) => app.draft_name.push(c),
                        _ => {}
                    },
                    Mode::Rename => match key.code {
                        KeyCode::Esc => app.reset_draft(),
                        KeyCode::Enter => {
                            if let Some(id) = app.current().map(|t| t.id) {
                                if !app.draft_name.trim().is_empty() {
                                    app.tasks.update(id, UpdateTask { name: Some(app.draft_name.clone()), ..UpdateTask::default() }).await?;
                                }
                            }
                            app.reset_draft();
                            app.load().await?;
                        }
                        KeyCode::Backspace => { app.draft_name.pop(); }
                        KeyCode::Char(c) => app.draft_name.push(c),
                        _ => {}
                    },
                }
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            app.last_tick = Instant::now();
        }
    }
    Ok(())
}
