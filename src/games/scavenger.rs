use super::{make_rng, option_value, seed_from_env};
use crate::arcade::{Controls, Rect, World, WorldState, WORLD_HEIGHT, WORLD_WIDTH};
use crate::terminal::{present, render_row, Cell, Rgb, TerminalGuard};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Stdout;
use std::time::{Duration, Instant};

const TICK_MS: u64 = 16;
const HOLD_MS: u64 = 150;
const FIELD_COLS: usize = 80;
const FIELD_ROWS: usize = 24;

const PLAYER_COLOR: Rgb = Rgb::new(120, 200, 255);
const CRYSTAL_COLOR: Rgb = Rgb::new(80, 255, 200);
const METEOR_COLOR: Rgb = Rgb::new(190, 120, 70);

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScavengerConfig
{
    seed: Option<u64>,
}

impl ScavengerConfig
{
    pub fn from_args(args: &[String]) -> Result<Self, String>
    {
        let mut config = Self {
            seed: seed_from_env()?,
        };
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = option_value(arg, "seed", &mut iter) {
                config.seed = Some(super::parse_seed(value?)?);
            } else {
                return Err(format!("Unknown scavenger option '{arg}'"));
            }
        }
        Ok(config)
    }
}

/// Terminals report key presses but rarely releases, so a direction counts
/// as held for a short while after its last press (auto-repeat keeps it
/// alive).
#[derive(Default)]
struct HeldKeys
{
    left: Option<Instant>,
    right: Option<Instant>,
    up: Option<Instant>,
    down: Option<Instant>,
}

impl HeldKeys
{
    fn slot(&mut self, code: KeyCode) -> Option<&mut Option<Instant>>
    {
        match code {
            KeyCode::Left | KeyCode::Char('a') => Some(&mut self.left),
            KeyCode::Right | KeyCode::Char('d') => Some(&mut self.right),
            KeyCode::Up | KeyCode::Char('w') => Some(&mut self.up),
            KeyCode::Down | KeyCode::Char('s') => Some(&mut self.down),
            _ => None,
        }
    }

    fn press(&mut self, code: KeyCode, at: Instant) -> bool
    {
        match self.slot(code) {
            Some(slot) => {
                *slot = Some(at);
                true
            }
            None => false,
        }
    }

    fn release(&mut self, code: KeyCode)
    {
        if let Some(slot) = self.slot(code) {
            *slot = None;
        }
    }

    fn controls(&self, now: Instant) -> Controls
    {
        let live = |pressed: Option<Instant>| {
            pressed.is_some_and(|at| now.saturating_duration_since(at) <= Duration::from_millis(HOLD_MS))
        };
        Controls {
            left: live(self.left),
            right: live(self.right),
            up: live(self.up),
            down: live(self.down),
        }
    }
}

pub fn run_with_config(config: ScavengerConfig) -> Result<(), String>
{
    let mut term = TerminalGuard::enter().map_err(|err| err.to_string())?;
    let mut rng = make_rng(config.seed);

    let start = Instant::now();
    let mut world = World::new(0);
    let mut held = HeldKeys::default();
    let mut last_tick = Instant::now();

    loop {
        let now = Instant::now();
        let now_ms = now.saturating_duration_since(start).as_millis() as u64;

        if handle_input(&mut world, &mut held, now, now_ms)? {
            break;
        }

        if last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            let report = world.update(now_ms, held.controls(now), &mut rng);
            if report.collected > 0 {
                log::debug!("collected {} crystal(s), score {}", report.collected, world.score);
            }
            if report.hit {
                log::debug!("meteor hit after {now_ms} ms");
            }
            draw_ui(term.stdout(), &world)?;
            last_tick = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(1));
    }

    Ok(())
}

fn handle_input(
    world: &mut World,
    held: &mut HeldKeys,
    now: Instant,
    now_ms: u64,
) -> Result<bool, String>
{
    while event::poll(Duration::from_millis(0)).map_err(|err| err.to_string())? {
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read().map_err(|err| err.to_string())?
        {
            if kind == KeyEventKind::Release {
                held.release(code);
                continue;
            }
            match code {
                KeyCode::Esc => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true)
                }
                _ if world.state == WorldState::GameOver => {
                    if kind == KeyEventKind::Press {
                        world.restart(now_ms);
                        *held = HeldKeys::default();
                    }
                }
                _ => {
                    held.press(code, now);
                }
            }
        }
    }

    Ok(false)
}

fn draw_ui(stdout: &mut Stdout, world: &World) -> Result<(), String>
{
    let mut field = vec![vec![Cell::BLANK; FIELD_COLS]; FIELD_ROWS];
    for crystal in &world.crystals {
        stamp(&mut field, crystal.rect, '*', CRYSTAL_COLOR);
    }
    for meteor in &world.meteors {
        stamp(&mut field, meteor.rect, '#', METEOR_COLOR);
    }
    stamp(&mut field, world.player.rect, '>', PLAYER_COLOR);

    let mut lines = Vec::new();
    lines.push(format!(
        "Term Arcade - Scavenger   Score: {}   Meteor speed: {:.1}",
        world.score, world.difficulty.meteor_speed
    ));
    lines.push("-".repeat(FIELD_COLS));
    for (idx, row) in field.iter().enumerate() {
        if world.state == WorldState::GameOver && idx == FIELD_ROWS / 2 {
            lines.push(centered("GAME OVER", FIELD_COLS));
        } else {
            lines.push(render_row(row));
        }
    }
    lines.push("-".repeat(FIELD_COLS));
    lines.push(if world.state == WorldState::GameOver {
        "Press any key to play again. Esc quits.".to_string()
    } else {
        "Arrows/WASD to fly. Grab crystals, avoid meteors. Esc quits.".to_string()
    });

    present(stdout, &lines)
}

/// World rectangle to inclusive terminal cell ranges, or `None` when it is
/// entirely off the field.
fn project(rect: Rect) -> Option<(usize, usize, usize, usize)>
{
    let col_scale = WORLD_WIDTH / FIELD_COLS as i32;
    let row_scale = WORLD_HEIGHT / FIELD_ROWS as i32;
    if rect.right() <= 0 || rect.x >= WORLD_WIDTH || rect.w <= 0 || rect.h <= 0 {
        return None;
    }
    let first_col = (rect.x.max(0) / col_scale) as usize;
    let last_col = ((rect.right() - 1).min(WORLD_WIDTH - 1) / col_scale) as usize;
    let first_row = (rect.y.max(0) / row_scale) as usize;
    let last_row = ((rect.bottom() - 1).clamp(0, WORLD_HEIGHT - 1) / row_scale) as usize;
    Some((first_col, last_col, first_row, last_row))
}

fn stamp(field: &mut [Vec<Cell>], rect: Rect, ch: char, color: Rgb)
{
    if let Some((first_col, last_col, first_row, last_row)) = project(rect) {
        for row in field.iter_mut().take(last_row + 1).skip(first_row) {
            for cell in row.iter_mut().take(last_col + 1).skip(first_col) {
                *cell = Cell {
                    ch,
                    color: Some(color),
                };
            }
        }
    }
}

fn centered(text: &str, width: usize) -> String
{
    let pad = width.saturating_sub(text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}
