mod app;
mod event;
mod telemetry;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use citedr::config::Config;
use citedr::content::Catalog;
use citedr::content::ranks::{next_rank, rank_progress};
use citedr::store::{JsonStore, ProgressTracker, SaveStatus};

use app::{App, AppScreen};
use event::{AppEvent, EventSource};
use ui::components::case_file::CaseFilePanel;
use ui::components::level_complete::LevelComplete;
use ui::components::level_select::LevelSelect;
use ui::components::progress_bar::ProgressBar;
use ui::components::question_view::QuestionView;
use ui::components::welcome::Welcome;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "citedr", version, about = "Terminal legal-citation tutor with level progression")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Directory for progress and logs")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Discard all progress and start from the first level")]
    reset: bool,

    #[arg(long, value_name = "PATH", help = "Write progress and config to a JSON file and exit")]
    export: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Replace progress with an exported JSON file and exit")]
    import: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let themes = Theme::available_themes();
    let theme_names: Vec<&str> = themes.iter().map(String::as_str).collect();
    config.validate(&theme_names);

    if let Err(e) = telemetry::init_tracing(&config.data_dir) {
        eprintln!("Logging disabled: {e:#}");
    }

    let catalog = Catalog::builtin().context("loading built-in catalog")?;

    if let Some(path) = cli.export {
        let store = JsonStore::new(&config.data_dir);
        store.write_export(&config, &path)?;
        println!("Exported progress to {}", path.display());
        return Ok(());
    }

    if let Some(path) = cli.import {
        let data = JsonStore::read_export(&path)?;
        let store = JsonStore::new(&config.data_dir);
        store.import_all(&data)?;
        tracing::info!(path = %path.display(), "progress imported");
        println!("Imported progress from {}", path.display());
        return Ok(());
    }

    if cli.reset {
        let store = JsonStore::new(&config.data_dir);
        let mut tracker = ProgressTracker::load(store, &catalog, citedr::content::DEFAULT_RANKS);
        if let SaveStatus::Failed(reason) = tracker.reset() {
            eprintln!("Could not write fresh progress: {reason}");
        }
    }

    let theme: &'static Theme = Box::leak(Box::new(Theme::load(&config.theme).unwrap_or_default()));
    let mut app = App::new(config, catalog, theme);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventSource::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %format!("{err:#}"), "app loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventSource,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Welcome => handle_welcome_key(app, key),
        AppScreen::LevelSelect => handle_level_select_key(app, key),
        AppScreen::Question => handle_question_key(app, key),
        AppScreen::LevelComplete => handle_complete_key(app, key),
    }
}

fn handle_welcome_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => app.go_to_levels(),
    }
}

fn handle_level_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_level(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_level(),
        KeyCode::Enter | KeyCode::Char(' ') => app.start_level(app.level_selected),
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch as usize - '1' as usize;
            if index < app.catalog.len() {
                app.level_selected = index;
                app.start_level(index);
            }
        }
        _ => {}
    }
}

fn handle_question_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel(),
        KeyCode::Enter => app.confirm(),
        KeyCode::Char(' ') => app.activate(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_build_focus(),
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
            app.move_cursor(false)
        }
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
            app.move_cursor(true)
        }
        _ => {}
    }
}

fn handle_complete_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            if app.next_level_index().is_some() {
                app.start_next_level();
            } else {
                app.go_to_levels();
            }
        }
        KeyCode::Char('r') => app.replay_level(),
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_levels(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Welcome => render_welcome(frame, app),
        AppScreen::LevelSelect => render_level_select(frame, app),
        AppScreen::Question => render_question(frame, app),
        AppScreen::LevelComplete => render_complete(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, title: &str) {
    let colors = &app.theme.colors;
    let progress = app.tracker.progress();
    let info = format!(
        " {} | {} pts | {}/{} levels",
        app.tracker.rank().name,
        progress.score(),
        progress.completed().len().min(app.catalog.len()),
        app.catalog.len(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let mut lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.warning()),
        )));
    }
    for hint in pack_hint_lines(hints, area.width as usize) {
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(colors.text_dim()),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_welcome(frame: &mut ratatui::Frame, app: &App) {
    let area = ui::layout::centered_rect(60, 50, frame.area());
    let welcome = Welcome::new(
        app.tracker.rank().name,
        app.tracker.progress().score(),
        app.theme,
    );
    frame.render_widget(welcome, area);
}

fn render_level_select(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, "citedr");

    let entries = app.tracker.progress().selectable_levels(&app.catalog);
    let list = LevelSelect::new(&entries, app.level_selected, app.theme);

    let score = app.tracker.progress().score();
    let ranks = app.tracker.ranks();
    let rank_caption = match next_rank(ranks, score) {
        Some(next) => format!("{} pts to {}", next.min_score - score, next.name),
        None => "Top rank reached".to_string(),
    };

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(layout.main);
    frame.render_widget(list, main[0]);
    frame.render_widget(
        ProgressBar::new("Rank", rank_progress(ranks, score), app.theme).caption(rank_caption),
        main[1],
    );
    frame.render_widget(
        ProgressBar::new(
            "Course",
            app.tracker.progress().completion_ratio(&app.catalog),
            app.theme,
        ),
        main[2],
    );

    if let Some(sidebar) = layout.sidebar
        && let Some(level) = app.catalog.get(app.level_selected)
    {
        let colors = &app.theme.colors;
        let max = citedr::engine::evaluate::level_max_points(level);
        let mut lines = vec![
            Line::from(Span::styled(
                level.title.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                level.description.as_str(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} questions, up to {max} pts", level.questions.len()),
                Style::default().fg(colors.text_dim()),
            )),
        ];
        if level.required_score > 0 {
            lines.push(Line::from(Span::styled(
                format!("Suggested score: {}", level.required_score),
                Style::default().fg(colors.text_dim()),
            )));
        }
        let panel = Paragraph::new(lines)
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(" Details ")
                    .border_style(Style::default().fg(colors.border())),
            );
        frame.render_widget(panel, sidebar);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &["[Up/Down] Choose", "[Enter] Start", "[1-9] Jump", "[q] Quit"],
    );
}

fn render_question(frame: &mut ratatui::Frame, app: &App) {
    let Some(session) = app.session.as_ref() else {
        return;
    };
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, &session.level().title);

    let case_file = session.question().and_then(|q| match &q.kind {
        citedr::content::QuestionKind::Simulation(sim) => Some(&sim.case_file),
        _ => None,
    });

    let view = QuestionView::new(session, app.cursor, app.theme);
    match (layout.sidebar, case_file) {
        (Some(sidebar), Some(case_file)) => {
            frame.render_widget(view, layout.main);
            frame.render_widget(CaseFilePanel::new(case_file, app.theme), sidebar);
        }
        (None, Some(case_file)) => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(9), Constraint::Min(10)])
                .split(layout.main);
            frame.render_widget(CaseFilePanel::new(case_file, app.theme), split[0]);
            frame.render_widget(view, split[1]);
        }
        (sidebar, None) => {
            frame.render_widget(view, layout.main);
            if let Some(sidebar) = sidebar {
                let bar = ProgressBar::new(
                    "Level points",
                    session.points() as f64 / session.max_points().max(1) as f64,
                    app.theme,
                )
                .caption(format!("{} / {}", session.points(), session.max_points()));
                let area = ratatui::layout::Rect {
                    height: sidebar.height.min(3),
                    ..sidebar
                };
                frame.render_widget(bar, area);
            }
        }
    }

    let hints: &[&str] = match (session.is_active(), session.response()) {
        (false, _) => &["[Enter] Continue", "[Esc] Leave level"],
        (true, Some(citedr::session::Response::Build(_))) => &[
            "[Left/Right] Move",
            "[Space] Place/remove",
            "[Tab] Switch row",
            "[Enter] Submit",
            "[Esc] Leave level",
        ],
        (true, Some(citedr::session::Response::Simulation(_))) => &[
            "[Left/Right] Move",
            "[Space] Open/choose",
            "[Enter] Submit",
            "[Esc] Close/leave",
        ],
        _ => &["[Up/Down] Move", "[Space] Select", "[Enter] Submit", "[Esc] Leave level"],
    };
    render_footer(frame, app, layout.footer, hints);
}

fn render_complete(frame: &mut ratatui::Frame, app: &App) {
    let Some(result) = app.last_result.as_ref() else {
        return;
    };
    let title = app
        .catalog
        .find(&result.level_id)
        .map(|l| l.title.as_str())
        .unwrap_or(result.level_id.as_str());
    let next_level = app
        .next_level_index()
        .and_then(|i| app.catalog.get(i))
        .map(|l| l.title.as_str());

    let area = ui::layout::centered_rect(60, 70, frame.area());
    frame.render_widget(
        LevelComplete {
            title,
            result,
            recorded: app.last_recorded.as_ref(),
            next_level,
            theme: app.theme,
        },
        area,
    );
}
