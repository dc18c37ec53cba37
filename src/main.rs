use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchday::board::{Board, FeedKind, MatchCard, View};
use matchday::config::{ClientConfig, load_dotenv};
use matchday::feed::spawn_provider;
use matchday::state::{AppState, Delta, ProviderCommand, apply_delta, feed_status_label};

struct App {
    state: AppState,
    board: Board,
    board_dirty: bool,
    board_day: NaiveDate,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            board: Board::Loading,
            board_dirty: true,
            board_day: Local::now().date_naive(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Char('1') => self.switch_view(View::Live),
            KeyCode::Char('f') | KeyCode::Char('2') => self.switch_view(View::Finished),
            KeyCode::Char('t') | KeyCode::Char('3') => self.switch_view(View::Today),
            KeyCode::Char('c') => {
                self.state.cycle_competition(true);
                self.board_dirty = true;
            }
            KeyCode::Char('C') => {
                self.state.cycle_competition(false);
                self.board_dirty = true;
            }
            KeyCode::Char('a') => {
                if self.state.reset_competition() {
                    self.board_dirty = true;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_refresh(true),
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.select_next(self.board.cards().len())
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(self.board.cards().len()),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn switch_view(&mut self, view: View) {
        if self.state.set_view(view) {
            self.board_dirty = true;
        }
    }

    fn request_refresh(&mut self, announce: bool) {
        let Some(tx) = &self.cmd_tx else {
            if announce {
                self.state.push_log("[INFO] Fixture fetch unavailable");
            }
            return;
        };
        let generation = self.state.begin_refresh();
        for feed in [FeedKind::Live, FeedKind::Scheduled] {
            if tx.send(ProviderCommand::Fetch { feed, generation }).is_err() {
                self.state.push_log("[WARN] Fixture request failed");
            }
        }
        if announce {
            self.state.push_log("[INFO] Refresh requested");
        }
        self.board_dirty = true;
    }

    fn rebuild_board_if_needed(&mut self) {
        let now = Local::now();
        // "Today" is relative to the wall clock.
        if now.date_naive() != self.board_day {
            self.board_day = now.date_naive();
            self.board_dirty = true;
        }
        if !self.board_dirty {
            return;
        }
        self.board = self.state.board(&now);
        let total = self.board.cards().len();
        if self.state.selected >= total {
            self.state.selected = total.saturating_sub(1);
        }
        self.board_dirty = false;
    }
}

fn main() -> io::Result<()> {
    load_dotenv();
    let cfg = ClientConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx, cfg.clone());

    let mut app = App::new(Some(cmd_tx));
    app.state
        .push_log(format!("[INFO] Proxy: {}", cfg.proxy_url));
    app.request_refresh(false);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            if apply_delta(&mut app.state, delta) {
                app.board_dirty = true;
            }
        }

        app.rebuild_board_if_needed();
        terminal.draw(|f| ui(f, app))?;

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

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_board(frame, chunks[1], app);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let state = &app.state;
    let line1 = format!(
        "MATCHDAY | {} | {}",
        state.selection.view.label(),
        state.selection.competition.label()
    );
    let line2 = format!(
        "Live: {} | Scheduled: {} | Showing: {}",
        feed_status_label(&state.live),
        feed_status_label(&state.scheduled),
        app.board.cards().len()
    );
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    let hints = "l Live | f Finished | t Today | c/C Competition | a All | r Refresh | j/k Move | ? Help | q Quit";
    let console = console_text(state);
    format!("{hints}\n{console}")
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(2);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_board(frame: &mut Frame, area: Rect, app: &App) {
    let cards = match &app.board {
        Board::Cards(cards) => cards,
        other => {
            let text = other.placeholder().unwrap_or_default();
            let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }
    };
    if area.height < 3 {
        return;
    }

    let rendered: Vec<Vec<Line<'static>>> = cards.iter().map(card_lines).collect();
    let heights: Vec<u16> = rendered
        .iter()
        .map(|lines| (lines.len() as u16).saturating_add(2))
        .collect();
    let start = first_visible(&heights, app.state.selected, area.height);

    let mut y = area.y;
    for idx in start..cards.len() {
        let remaining = area.bottom().saturating_sub(y);
        if remaining < 3 {
            break;
        }
        let height = heights[idx];
        if height > remaining && idx != start {
            break;
        }
        let card_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: height.min(remaining),
        };

        let selected = idx == app.state.selected;
        let border_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let card = Paragraph::new(rendered[idx].clone()).block(block);
        frame.render_widget(card, card_area);

        y = y.saturating_add(card_area.height);
    }
}

fn card_lines(card: &MatchCard) -> Vec<Line<'static>> {
    let league = if card.league.round.is_empty() {
        card.league.name.clone()
    } else {
        format!("{} · {}", card.league.name, card.league.round)
    };
    let teams = format!(
        "{}  {} - {}  {}",
        card.home.name, card.home.score, card.away.score, card.away.name
    );

    let mut lines = vec![
        Line::from(Span::styled(league, Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(
            teams,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} | {}", card.kickoff, card.status)),
        Line::from(Span::styled(
            format!("{} | {}", card.venue, card.referee),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    if !card.events.is_empty() {
        lines.push(Line::from(Span::styled(
            "Events:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for event in &card.events {
            lines.push(Line::from(format!("  {}", event.summary())));
        }
    }
    lines
}

/// First card to draw so that the selected one fits on screen.
fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let selected = selected.min(heights.len() - 1);
    let mut start = selected;
    let mut used = heights[selected];
    while start > 0 {
        let height = heights[start - 1];
        if used.saturating_add(height) > available {
            break;
        }
        used += height;
        start -= 1;
    }
    start
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchday - Help",
        "",
        "Views:",
        "  l / 1        Live matches",
        "  f / 2        Finished (today and yesterday)",
        "  t / 3        Not started, kicking off today",
        "",
        "Competition:",
        "  c / C        Next / previous competition",
        "  a            All competitions",
        "",
        "  r            Refresh fixtures",
        "  j/k or ↑/↓   Move",
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

#[cfg(test)]
mod tests {
    use super::first_visible;

    #[test]
    fn first_visible_keeps_selection_on_screen() {
        let heights = [6, 6, 6, 6];
        assert_eq!(first_visible(&heights, 0, 20), 0);
        assert_eq!(first_visible(&heights, 2, 20), 0);
        assert_eq!(first_visible(&heights, 3, 20), 1);
        assert_eq!(first_visible(&heights, 3, 5), 3);
        assert!(first_visible(&[], 4, 10) == 0);
    }
}
