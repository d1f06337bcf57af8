use super::{make_rng, option_value, seed_from_env};
use crate::grid::{Color, CycleOutcome, Grid, Palette, PuzzleSession, SessionState};
use crate::terminal::{self, paint_bg, present, Rgb, TerminalGuard};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use rand::Rng;
use std::io::Stdout;
use std::time::{Duration, Instant};

const DEFAULT_SIZE: usize = 5;
const MAX_SIZE: usize = 8;
const DEFAULT_COLORS: usize = 4;
const MIN_COLORS: usize = 2;
const TICK_MS: u64 = 33;

const BOARD_TOP: u16 = 5;
const BOARD_LEFT: u16 = 2;
const CELL_WIDTH: u16 = 4;
const CELL_HEIGHT: u16 = 2;
const GOAL_GAP: usize = 6;

#[derive(Debug, PartialEq, Eq)]
pub struct ColorsConfig
{
    size: usize,
    colors: usize,
    seed: Option<u64>,
}

impl ColorsConfig
{
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self {
            seed: seed_from_env()?,
            ..Self::default()
        };
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = option_value(arg, "size", &mut iter) {
                config.size = parse_bounded(value?, "Size", 1, MAX_SIZE)?;
            } else if let Some(value) = option_value(arg, "colors", &mut iter) {
                config.colors = parse_bounded(value?, "Colors", MIN_COLORS, Color::ALL.len())?;
            } else if let Some(value) = option_value(arg, "seed", &mut iter) {
                config.seed = Some(super::parse_seed(value?)?);
            } else {
                return Err(format!("Unknown colors option '{arg}'"));
            }
        }
        Ok(config)
    }
}

impl Default for ColorsConfig
{
    fn default() -> Self
    {
        Self {
            size: DEFAULT_SIZE,
            colors: DEFAULT_COLORS,
            seed: None,
        }
    }
}

fn parse_bounded(value: &str, label: &str, min: usize, max: usize) -> Result<usize, String>
{
    let parsed = value
        .parse::<usize>()
        .map_err(|_| format!("{label} must be a number"))?;
    if parsed < min || parsed > max {
        return Err(format!("{label} must be between {min} and {max}"));
    }
    Ok(parsed)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cursor
{
    row: usize,
    col: usize,
}

impl Cursor
{
    fn shift(&mut self, d_row: isize, d_col: isize, size: usize)
    {
        let last = size.saturating_sub(1) as isize;
        self.row = (self.row as isize + d_row).clamp(0, last) as usize;
        self.col = (self.col as isize + d_col).clamp(0, last) as usize;
    }
}

/// Screen position to board cell. The goal grid is not clickable.
fn cell_at(column: u16, row: u16, size: usize) -> Option<(usize, usize)>
{
    if column < BOARD_LEFT || row < BOARD_TOP {
        return None;
    }
    let cell_row = ((row - BOARD_TOP) / CELL_HEIGHT) as usize;
    let cell_col = ((column - BOARD_LEFT) / CELL_WIDTH) as usize;
    (cell_row < size && cell_col < size).then_some((cell_row, cell_col))
}

pub fn run_with_config(config: ColorsConfig) -> Result<(), String>
{
    let mut rng = make_rng(config.seed);
    let palette = Palette::standard(config.colors).map_err(|err| err.to_string())?;
    let mut session =
        PuzzleSession::new(config.size, palette, &mut rng).map_err(|err| err.to_string())?;

    let mut term = TerminalGuard::enter_with_mouse().map_err(|err| err.to_string())?;
    let mut cursor = Cursor::default();
    let mut message: Option<String> = None;
    let mut start = Instant::now();
    let mut last_tick = Instant::now();

    loop {
        match handle_input(&mut session, &mut cursor, &mut message, &mut rng)? {
            Flow::Quit => return Ok(()),
            Flow::Restarted => start = Instant::now(),
            Flow::Continue => {}
        }

        if session.state() == SessionState::Solved {
            break;
        }

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            draw_ui(term.stdout(), &session, cursor, &message)?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    draw_summary(term.stdout(), &session, start.elapsed())?;
    terminal::wait_for_space()?;
    Ok(())
}

enum Flow
{
    Continue,
    Restarted,
    Quit,
}

fn handle_input(
    session: &mut PuzzleSession,
    cursor: &mut Cursor,
    message: &mut Option<String>,
    rng: &mut impl Rng,
) -> Result<Flow, String>
{
    let size = session.size();
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        match event::read().map_err(|err| err.to_string())? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Esc => return Ok(Flow::Quit),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(Flow::Quit)
                }
                KeyCode::Up | KeyCode::Char('w') => cursor.shift(-1, 0, size),
                KeyCode::Down | KeyCode::Char('s') => cursor.shift(1, 0, size),
                KeyCode::Left | KeyCode::Char('a') => cursor.shift(0, -1, size),
                KeyCode::Right | KeyCode::Char('d') => cursor.shift(0, 1, size),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    *message = describe(session.cycle(cursor.row, cursor.col));
                }
                KeyCode::Char('r') => {
                    session.restart(rng).map_err(|err| err.to_string())?;
                    *cursor = Cursor::default();
                    *message = Some("New board".to_string());
                    return Ok(Flow::Restarted);
                }
                _ => {}
            },
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                if let Some((cell_row, cell_col)) = cell_at(column, row, size) {
                    *cursor = Cursor {
                        row: cell_row,
                        col: cell_col,
                    };
                    *message = describe(session.cycle(cell_row, cell_col));
                }
            }
            _ => {}
        }

        if session.state() == SessionState::Solved {
            break;
        }
    }

    Ok(Flow::Continue)
}

fn describe(outcome: CycleOutcome) -> Option<String>
{
    match outcome {
        CycleOutcome::NoValidMove => Some("No valid color for that cell".to_string()),
        CycleOutcome::Changed | CycleOutcome::Solved | CycleOutcome::AlreadySolved => None,
    }
}

fn draw_ui(
    stdout: &mut Stdout,
    session: &PuzzleSession,
    cursor: Cursor,
    message: &Option<String>,
) -> Result<(), String>
{
    let size = session.size();
    let board_width = size * CELL_WIDTH as usize;
    let names: Vec<&str> = session.palette().colors().iter().map(|color| color.name()).collect();

    let mut lines = Vec::new();
    lines.push("Term Arcade - Colors".to_string());
    lines.push(format!(
        "Size: {size}x{size}  Palette: {}  Moves: {}",
        names.join(" "),
        session.moves()
    ));
    lines.push(
        message
            .clone()
            .unwrap_or_else(|| "Make the board match the goal.".to_string()),
    );
    lines.push(String::new());
    lines.push(format!(
        "{}{:<width$}{}Goal",
        " ".repeat(BOARD_LEFT as usize),
        "Board",
        " ".repeat(GOAL_GAP),
        width = board_width
    ));

    let board = render_grid(session.board(), Some(cursor));
    let goal = render_grid(session.goal(), None);
    for (left, right) in board.iter().zip(goal.iter()) {
        lines.push(format!(
            "{}{}{}{}",
            " ".repeat(BOARD_LEFT as usize),
            left,
            " ".repeat(GOAL_GAP),
            right
        ));
    }

    lines.push(String::new());
    lines.push("Arrows/WASD move, Space/Enter or click cycles a cell.".to_string());
    lines.push("R new board. Esc quits.".to_string());

    present(stdout, &lines)
}

fn render_grid(grid: &Grid, cursor: Option<Cursor>) -> Vec<String>
{
    let mut lines = Vec::new();
    for (row_idx, row) in grid.rows().enumerate() {
        let mut line = String::new();
        for (col_idx, color) in row.iter().enumerate() {
            let (r, g, b) = color.rgb();
            let selected = cursor.is_some_and(|at| at.row == row_idx && at.col == col_idx);
            let face = if selected { "[  ]" } else { "    " };
            line.push_str(&paint_bg(face, Rgb::new(r, g, b)));
        }
        for _ in 0..CELL_HEIGHT {
            lines.push(line.clone());
        }
    }
    lines
}

fn draw_summary(stdout: &mut Stdout, session: &PuzzleSession, elapsed: Duration) -> Result<(), String>
{
    let mut lines = Vec::new();
    lines.push("Solved!".to_string());
    lines.push(String::new());
    lines.push(format!("Board: {0}x{0}", session.size()));
    lines.push(format!("Moves: {}", session.moves()));
    lines.push(format!("Time: {:>5.1}s", elapsed.as_secs_f32()));
    lines.push(String::new());
    for line in render_grid(session.goal(), None) {
        lines.push(format!("{}{}", " ".repeat(BOARD_LEFT as usize), line));
    }
    lines.push(String::new());
    lines.push("Press SPACE to exit.".to_string());
    present(stdout, &lines)
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn args(list: &[&str]) -> Vec<String>
    {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn config_defaults_and_overrides()
    {
        let config = ColorsConfig::from_args(&args(&["--size=6", "--colors", "5", "--seed=3"])).unwrap();
        assert_eq!(config.size, 6);
        assert_eq!(config.colors, 5);
        assert_eq!(config.seed, Some(3));

        let plain = ColorsConfig::default();
        assert_eq!((plain.size, plain.colors), (DEFAULT_SIZE, DEFAULT_COLORS));
    }

    #[test]
    fn config_rejects_out_of_range_and_unknown()
    {
        assert!(ColorsConfig::from_args(&args(&["--colors=1"])).is_err());
        assert!(ColorsConfig::from_args(&args(&["--colors=7"])).is_err());
        assert!(ColorsConfig::from_args(&args(&["--size=0"])).is_err());
        assert!(ColorsConfig::from_args(&args(&["--size=nine"])).is_err());
        assert!(ColorsConfig::from_args(&args(&["--wpm=20"])).is_err());
    }

    #[test]
    fn clicks_map_to_board_cells()
    {
        assert_eq!(cell_at(BOARD_LEFT, BOARD_TOP, 5), Some((0, 0)));
        assert_eq!(cell_at(BOARD_LEFT + 3, BOARD_TOP + 1, 5), Some((0, 0)));
        assert_eq!(cell_at(BOARD_LEFT + 4, BOARD_TOP + 2, 5), Some((1, 1)));
        assert_eq!(cell_at(BOARD_LEFT + 19, BOARD_TOP + 9, 5), Some((4, 4)));
    }

    #[test]
    fn clicks_outside_board_are_ignored()
    {
        assert_eq!(cell_at(0, BOARD_TOP, 5), None);
        assert_eq!(cell_at(BOARD_LEFT, 0, 5), None);
        assert_eq!(cell_at(BOARD_LEFT + 20, BOARD_TOP, 5), None);
        assert_eq!(cell_at(BOARD_LEFT, BOARD_TOP + 10, 5), None);
    }

    #[test]
    fn cursor_stays_on_board()
    {
        let mut cursor = Cursor::default();
        cursor.shift(-1, -1, 5);
        assert_eq!(cursor, Cursor { row: 0, col: 0 });
        for _ in 0..10 {
            cursor.shift(1, 1, 5);
        }
        assert_eq!(cursor, Cursor { row: 4, col: 4 });
    }

    #[test]
    fn rendered_grid_marks_cursor_cell()
    {
        let grid = Grid::from_rows(vec![
            vec![Color::Red, Color::Green],
            vec![Color::Green, Color::Red],
        ])
        .unwrap();
        let lines = render_grid(&grid, Some(Cursor { row: 1, col: 0 }));
        assert_eq!(lines.len(), 2 * CELL_HEIGHT as usize);
        assert!(!lines[0].contains("[  ]"));
        assert!(!lines[1].contains("[  ]"));
        assert!(lines[2].contains("[  ]"));
        assert!(lines[3].contains("[  ]"));
    }

    #[test]
    fn only_failed_cycles_produce_a_message()
    {
        assert!(describe(CycleOutcome::NoValidMove).is_some());
        assert!(describe(CycleOutcome::Changed).is_none());
    }
}
