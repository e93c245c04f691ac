//! Terminal UI rendering with ratatui

use crate::board::Cell;
use crate::game::{Game, GameState};
use crate::store::TopScoreStore;
use crate::tetromino::{HexColor, Orientation, TetrominoType};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const BLOCK: &str = "██";
const EMPTY: &str = "  ";
const MARKER: &str = "▔▔";

/// Width of the side panel
const PANEL_WIDTH: u16 = 18;

/// Controls shown in the help overlay
const HELP_LINES: [&str; 7] = [
    "←/A  →/D   move",
    "↓/S        step down",
    "↑/W        rotate",
    "Space      drop",
    "R          restart",
    "I          this help",
    "Q/Esc      quit",
];

/// Convert a hex token to a terminal color
pub fn to_color(hex: HexColor) -> Color {
    match hex.rgb() {
        Some((r, g, b)) => Color::Rgb(r, g, b),
        None => Color::White,
    }
}

/// Render the whole game screen
pub fn render_game<S: TopScoreStore>(frame: &mut Frame, game: &Game<S>) {
    let area = frame.area();

    let board_width = game.board.width() as u16 * 2 + 2;
    // Board rows, borders and the column marker line
    let board_height = game.board.height() as u16 + 3;
    let game_area = center_rect(area, board_width + PANEL_WIDTH, board_height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(PANEL_WIDTH)])
        .split(game_area);

    let board_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(board_height - 1), Constraint::Length(1)])
        .split(main_layout[0]);

    render_board(frame, board_layout[0], game);
    render_column_marker(frame, board_layout[1], game.touched_columns());

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], game.preview(1).first().copied());
    render_stats(frame, right_layout[1], game);

    if game.show_help {
        render_overlay(frame, area, "CONTROLS", &HELP_LINES);
    } else if game.state == GameState::GameOver {
        render_overlay(frame, area, "GAME OVER", &["Press R to restart"]);
    }
}

/// Center a rect of the given size inside `area`
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_board<S: TopScoreStore>(frame: &mut Frame, area: Rect, game: &Game<S>) {
    let block = Block::default()
        .title(" pivotris ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = game
        .board
        .rows()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Filled(hex) => Span::styled(BLOCK, Style::default().fg(to_color(*hex))),
                    Cell::Empty => Span::raw(EMPTY),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Underline the columns the falling piece occupies
fn render_column_marker(frame: &mut Frame, area: Rect, columns: Option<(i32, i32)>) {
    let Some((first, last)) = columns else {
        return;
    };
    // One cell for the left border
    let pad = " ".repeat(1 + first.max(0) as usize * 2);
    let marks = MARKER.repeat((last - first + 1).max(0) as usize);
    let line = Line::from(vec![
        Span::raw(pad),
        Span::styled(marks, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_next(frame: &mut Frame, area: Rect, next: Option<TetrominoType>) {
    let block = Block::default()
        .title(" NEXT ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(kind) = next else {
        return;
    };
    let pattern = kind.geometry().pattern(Orientation::Top);
    let style = Style::default().fg(to_color(kind.color()));

    let lines: Vec<Line> = (0..pattern.rows())
        .map(|r| {
            let spans: Vec<Span> = (0..pattern.cols())
                .map(|c| {
                    if pattern.mark(r, c).is_solid() {
                        Span::styled(BLOCK, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_stats<S: TopScoreStore>(frame: &mut Frame, area: Rect, game: &Game<S>) {
    let block = Block::default()
        .title(" STATS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let score = &game.score;
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White).bold()),
        ])
    };

    let lines = vec![
        stat("Score ", score.points.to_string()),
        stat("Level ", score.level.to_string()),
        stat("Lines ", score.lines.to_string()),
        Line::raw(""),
        stat("Best  ", score.top_score.to_string()),
        Line::raw(""),
        Line::styled("I for help", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, body: &[&str]) {
    let width = body.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16 + 6;
    let height = body.len() as u16 + 4;
    let overlay = center_rect(area, width.max(title.len() as u16 + 6), height);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let mut lines = vec![Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold())];
    lines.push(Line::raw(""));
    lines.extend(body.iter().map(|line| Line::raw(line.to_string())));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
