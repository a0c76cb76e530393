use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use tipster_terminal::advisor::{Confidence, Tip};
use tipster_terminal::config::AppConfig;
use tipster_terminal::feed;
use tipster_terminal::form::TeamForm;
use tipster_terminal::leagues::{LEAGUES, season_label};
use tipster_terminal::logging::init_tracing;
use tipster_terminal::outcome::OutcomeProbs;
use tipster_terminal::state::{
    self, AppState, MatchReport, PickStage, Report, Screen, TEAM_COLUMNS, apply_delta,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<state::ProviderCommand>,
}

impl App {
    fn new(state: AppState, cmd_tx: mpsc::Sender<state::ProviderCommand>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_row_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_row_up(),
            KeyCode::Char('h') | KeyCode::Left => self.state.select_left(),
            KeyCode::Char('l') | KeyCode::Right => self.state.select_right(),
            KeyCode::Enter => self.on_enter(),
            KeyCode::Char('b') | KeyCode::Esc => self.state.back(),
            KeyCode::Char('n') => self.state.new_fixture(),
            KeyCode::Char('L') => {
                if !matches!(self.state.screen, Screen::Loading { .. }) {
                    self.state.screen = Screen::LeaguePicker;
                }
            }
            _ => {}
        }
    }

    fn on_enter(&mut self) {
        match self.state.screen {
            Screen::LeaguePicker => {
                let cmd = self.state.begin_load();
                if self.cmd_tx.send(cmd).is_err() {
                    self.state.push_log("[WARN] Loader unavailable");
                    self.state.screen = Screen::LeaguePicker;
                }
            }
            Screen::TeamPicker => self.state.choose_team(),
            Screen::Report => self.state.new_fixture(),
            Screen::Loading { .. } => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::load();
    let log_path = init_tracing(&cfg.log_dir).ok();
    tracing::info!(season = %cfg.season, data_dir = %cfg.data_dir.display(), "starting");

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(cfg.clone(), tx, cmd_rx);

    let mut state = AppState::new(cfg.form_games);
    if let Some(path) = log_path {
        state.push_log(format!("[INFO] Logging to {}", path.display()));
    }
    if cfg.offline {
        state.push_log("[INFO] Offline mode: using cached or local data");
    }
    let mut app = App::new(state, cmd_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx, &cfg.season);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "ui loop failed");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
    season: &str,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, &app.state, season))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState, season: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state, season))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &state.screen {
        Screen::LeaguePicker => render_league_picker(frame, chunks[1], state),
        Screen::Loading { league } => {
            let text = format!("Loading {} ({}) ...", league.name, league.code);
            let p = Paragraph::new(text)
                .style(Style::default().fg(Color::Green))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(p, chunks[1]);
        }
        Screen::TeamPicker => render_team_picker(frame, chunks[1], state),
        Screen::Report => render_report(frame, chunks[1], state),
    }

    render_console(frame, chunks[2], state);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState, season: &str) -> String {
    match state.league_label() {
        Some(label) => format!(" TIPSTER | {label}"),
        None => format!(" TIPSTER | Season {}", season_label(season)),
    }
}

fn footer_text(state: &AppState) -> &'static str {
    match state.screen {
        Screen::LeaguePicker => "j/k/↑/↓ Move | Enter Load league | ? Help | q Quit",
        Screen::Loading { .. } => "Loading... | q Quit",
        Screen::TeamPicker => {
            "hjkl/arrows Move | Enter Pick | b/Esc Back | L Leagues | ? Help | q Quit"
        }
        Screen::Report => "n/Enter New fixture | b/Esc Back | L Leagues | ? Help | q Quit",
    }
}

fn render_league_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines: Vec<Line> = LEAGUES
        .iter()
        .enumerate()
        .map(|(idx, league)| {
            let text = format!(" {}. {:<30} {}", idx + 1, league.name, league.code);
            if idx == state.league_selected {
                Line::styled(text, Style::default().fg(Color::Black).bg(Color::Yellow))
            } else {
                Line::raw(text)
            }
        })
        .collect();
    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Available leagues")
            .borders(Borders::ALL),
    );
    frame.render_widget(p, area);
}

fn render_team_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = match (&state.stage, &state.home_pick) {
        (PickStage::Away, Some(home)) => format!("Pick AWAY team (home: {home})"),
        _ => "Pick HOME team".to_string(),
    };

    if state.teams.is_empty() {
        let p = Paragraph::new("No teams in this dataset")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
        return;
    }

    let rows: Vec<Row> = state
        .teams
        .chunks(TEAM_COLUMNS)
        .enumerate()
        .map(|(row_idx, chunk)| {
            let cells = chunk.iter().enumerate().map(|(col_idx, team)| {
                let idx = row_idx * TEAM_COLUMNS + col_idx;
                let mut style = Style::default().fg(Color::Cyan);
                if state.home_pick.as_deref() == Some(team.as_str()) {
                    style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                }
                if idx == state.team_selected {
                    style = style.fg(Color::Black).bg(Color::Yellow);
                }
                Cell::from(team.clone()).style(style)
            });
            Row::new(cells)
        })
        .collect();

    let widths = [Constraint::Ratio(1, TEAM_COLUMNS as u32); TEAM_COLUMNS];
    let table = Table::new(rows, widths)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_report(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(report) = state.report.as_ref() else {
        let p = Paragraph::new("No fixture analysed yet")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
        return;
    };

    match report {
        Report::Unavailable { home, away, reason } => {
            let text = vec![
                Line::styled(
                    format!("{home} vs {away}"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled(
                    if reason.is_insufficient_data() {
                        "Insufficient data for analysis.".to_string()
                    } else {
                        "Fixture cannot be analysed.".to_string()
                    },
                    Style::default().fg(Color::Red),
                ),
                Line::raw(reason.to_string()),
            ];
            let p = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
            frame.render_widget(p, area);
        }
        Report::Ready(report) => render_ready_report(frame, area, report),
    }
}

fn render_ready_report(frame: &mut Frame, area: Rect, report: &MatchReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(11), Constraint::Min(4)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(36)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let bundle = &report.suggestion.bundle;
    let home = bundle.home_team.as_str();
    let away = bundle.away_team.as_str();
    let sec = &bundle.secondary;

    let stat_rows = vec![
        Row::new(vec![
            "Attack strength".to_string(),
            format!("{:.2}", bundle.home_strength.attack_home),
            format!("{:.2}", bundle.away_strength.attack_away),
        ]),
        Row::new(vec![
            "Defense strength".to_string(),
            format!("{:.2}", bundle.home_strength.defense_home),
            format!("{:.2}", bundle.away_strength.defense_away),
        ]),
        Row::new(vec![
            "xG (expected goals)".to_string(),
            format!("{:.2}", bundle.lambda_home),
            format!("{:.2}", bundle.lambda_away),
        ]),
        Row::new(vec![
            "Corners avg".to_string(),
            format!("{:.2}", sec.corners_home),
            format!("{:.2}", sec.corners_away),
        ]),
        Row::new(vec![
            "Cards avg".to_string(),
            format!("{:.2}", sec.cards_home),
            format!("{:.2}", sec.cards_away),
        ]),
        Row::new(vec![
            "Fixture corners".to_string(),
            format!("{:.2}", sec.corners_total),
            String::new(),
        ])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Row::new(vec![
            "Fixture cards".to_string(),
            format!("{:.2}", sec.cards_total),
            String::new(),
        ])
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    ];
    let header = Row::new(vec!["Metric".to_string(), home.to_string(), away.to_string()])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(
        stat_rows,
        [
            Constraint::Length(20),
            Constraint::Min(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(report.suggestion.title())
            .borders(Borders::ALL),
    );
    frame.render_widget(table, top[0]);

    render_outcomes(frame, top[1], &bundle.outcomes, home, away);
    render_tips(frame, bottom[0], &report.suggestion.tips);
    render_form(frame, bottom[1], report, bundle.matrix.most_likely_score());
}

fn render_outcomes(frame: &mut Frame, area: Rect, probs: &OutcomeProbs, home: &str, away: &str) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    let chart = outcome_bar_chart(probs)
        .block(Block::default().title("Result").borders(Borders::ALL));
    frame.render_widget(chart, sections[0]);

    let lines = vec![
        Line::styled(format!("{home}: {:.1}%", probs.home), Style::default().fg(Color::Green)),
        Line::styled(format!("Draw: {:.1}%", probs.draw), Style::default().fg(Color::Yellow)),
        Line::styled(format!("{away}: {:.1}%", probs.away), Style::default().fg(Color::Red)),
    ];
    frame.render_widget(Paragraph::new(lines), sections[1]);
}

fn outcome_bar_chart(probs: &OutcomeProbs) -> BarChart<'static> {
    let bar = |label: &'static str, value: f64, color: Color| {
        Bar::default()
            .label(label.into())
            .value(value.round().max(0.0) as u64)
            .text_value(format!("{value:.1}%"))
            .style(Style::default().fg(color))
    };
    let bars = [
        bar("H", probs.home, Color::Green),
        bar("D", probs.draw, Color::Yellow),
        bar("A", probs.away, Color::Red),
    ];
    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(100)
}

fn render_tips(frame: &mut Frame, area: Rect, tips: &[Tip]) {
    let block = Block::default().title("Tips").borders(Borders::ALL);
    if tips.is_empty() {
        let p = Paragraph::new("No clear opportunities.")
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC))
            .block(block);
        frame.render_widget(p, area);
        return;
    }

    let mut lines = Vec::new();
    for tip in tips {
        let color = confidence_color(tip.confidence);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}: ", tip.market.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(tip.selection.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::raw(format!("  Prob: {} | Fair odds: ", tip.probability)),
            Span::styled(
                tip.fair_odds.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | Confidence: "),
            Span::styled(tip.confidence.label(), Style::default().fg(color)),
        ]));
    }
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(p, area);
}

fn confidence_color(c: Confidence) -> Color {
    match c {
        Confidence::High => Color::Green,
        Confidence::Medium => Color::Yellow,
        Confidence::Low => Color::Magenta,
    }
}

fn render_form(frame: &mut Frame, area: Rect, report: &MatchReport, likely: (usize, usize, f64)) {
    let form_line = |form: Option<&TeamForm>, fallback: &str| match form {
        Some(f) => vec![
            Line::styled(f.team.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Line::raw(f.summary()),
        ],
        None => vec![Line::raw(format!("{fallback}: no recent matches"))],
    };

    let bundle = &report.suggestion.bundle;
    let mut lines = form_line(report.home_form.as_ref(), &bundle.home_team);
    lines.extend(form_line(report.away_form.as_ref(), &bundle.away_team));
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!(
        "Most likely score: {}-{} ({:.1}%)",
        likely.0,
        likely.1,
        likely.2 * 100.0
    )));
    if let Some(reason) = bundle.secondary_fallback.as_ref() {
        lines.push(Line::styled(
            format!("Corners/cards unavailable: {reason}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Recent form").borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.logs.len().saturating_sub(visible);
    let lines: Vec<Line> = state
        .logs
        .iter()
        .skip(skip)
        .map(|msg| {
            let style = if msg.starts_with("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::styled(msg.clone(), style)
        })
        .collect();
    let p = Paragraph::new(lines).block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Tipster - Help",
        "",
        "Leagues:",
        "  j/k or ↑/↓   Move",
        "  Enter        Load league",
        "",
        "Teams:",
        "  hjkl/arrows  Move in grid",
        "  Enter        Pick home, then away",
        "  b / Esc      Undo home pick / back",
        "",
        "Report:",
        "  n / Enter    New fixture, same league",
        "  L            Choose another league",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
