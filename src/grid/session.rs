use super::{cycle_cell, generate, matches, Grid, GridError, Palette};
use rand::Rng;

const GOAL_REROLLS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState
{
    Active,
    Solved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome
{
    Changed,
    NoValidMove,
    Solved,
    AlreadySolved,
}

/// One play-through: the board the player edits and the goal it must match.
pub struct PuzzleSession
{
    palette: Palette,
    board: Grid,
    goal: Grid,
    state: SessionState,
    moves: u32,
}

impl PuzzleSession
{
    pub fn new(size: usize, palette: Palette, rng: &mut impl Rng) -> Result<Self, GridError>
    {
        let (board, goal) = roll_pair(size, &palette, rng)?;
        log::info!("colors session started: {size}x{size}, {} colors", palette.len());
        Ok(Self {
            palette,
            board,
            goal,
            state: SessionState::Active,
            moves: 0,
        })
    }

    /// Starts over with a fresh board and goal of the same size.
    pub fn restart(&mut self, rng: &mut impl Rng) -> Result<(), GridError>
    {
        let (board, goal) = roll_pair(self.board.size(), &self.palette, rng)?;
        self.board = board;
        self.goal = goal;
        self.state = SessionState::Active;
        self.moves = 0;
        log::info!("colors session restarted");
        Ok(())
    }

    pub fn cycle(&mut self, row: usize, col: usize) -> CycleOutcome
    {
        if self.state == SessionState::Solved {
            return CycleOutcome::AlreadySolved;
        }
        if !cycle_cell(&mut self.board, row, col, &self.palette) {
            return CycleOutcome::NoValidMove;
        }

        self.moves += 1;
        if matches(&self.board, &self.goal) {
            self.state = SessionState::Solved;
            log::info!("colors session solved in {} moves", self.moves);
            CycleOutcome::Solved
        } else {
            CycleOutcome::Changed
        }
    }

    pub fn board(&self) -> &Grid
    {
        &self.board
    }

    pub fn goal(&self) -> &Grid
    {
        &self.goal
    }

    pub fn palette(&self) -> &Palette
    {
        &self.palette
    }

    pub fn state(&self) -> SessionState
    {
        self.state
    }

    pub fn moves(&self) -> u32
    {
        self.moves
    }

    pub fn size(&self) -> usize
    {
        self.board.size()
    }

    #[cfg(test)]
    fn from_parts(palette: Palette, board: Grid, goal: Grid) -> Self
    {
        Self {
            palette,
            board,
            goal,
            state: SessionState::Active,
            moves: 0,
        }
    }
}

fn roll_pair(size: usize, palette: &Palette, rng: &mut impl Rng) -> Result<(Grid, Grid), GridError>
{
    let board = generate(size, palette, rng)?;
    let mut goal = generate(size, palette, rng)?;
    for _ in 0..GOAL_REROLLS {
        if !matches(&board, &goal) {
            break;
        }
        goal = generate(size, palette, rng)?;
    }
    Ok((board, goal))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::grid::Color::{Blue as C, Green as B, Red as A, Yellow as D};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn four() -> Palette
    {
        Palette::new(vec![A, B, C, D]).unwrap()
    }

    #[test]
    fn new_session_is_active_and_not_already_solved()
    {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = PuzzleSession::new(1, Palette::new(vec![A, B]).unwrap(), &mut rng).unwrap();
            assert_eq!(session.state(), SessionState::Active);
            assert!(!matches(session.board(), session.goal()));
            assert_eq!(session.moves(), 0);
        }
    }

    #[test]
    fn new_session_surfaces_configuration_errors()
    {
        let mut rng = StdRng::seed_from_u64(0);
        let result = PuzzleSession::new(5, Palette::new(vec![A]).unwrap(), &mut rng);
        assert!(matches!(result, Err(GridError::Configuration(_))));
    }

    #[test]
    fn cycling_into_goal_solves_session()
    {
        let board = Grid::from_rows(vec![vec![A, B], vec![B, A]]).unwrap();
        let goal = Grid::from_rows(vec![vec![C, B], vec![B, C]]).unwrap();
        let mut session = PuzzleSession::from_parts(four(), board, goal);

        // (0,0): A -> B is a neighbor, so C.
        assert_eq!(session.cycle(0, 0), CycleOutcome::Changed);
        assert_eq!(session.board().get(0, 0), C);
        assert_eq!(session.state(), SessionState::Active);

        assert_eq!(session.cycle(1, 1), CycleOutcome::Solved);
        assert_eq!(session.state(), SessionState::Solved);
        assert!(matches(session.board(), session.goal()));
        assert_eq!(session.moves(), 2);
    }

    #[test]
    fn solved_session_ignores_further_cycles()
    {
        let board = Grid::from_rows(vec![vec![A]]).unwrap();
        let goal = Grid::from_rows(vec![vec![B]]).unwrap();
        let mut session = PuzzleSession::from_parts(Palette::new(vec![A, B]).unwrap(), board, goal);

        assert_eq!(session.cycle(0, 0), CycleOutcome::Solved);
        assert_eq!(session.cycle(0, 0), CycleOutcome::AlreadySolved);
        assert_eq!(session.board().get(0, 0), B);
        assert_eq!(session.moves(), 1);
    }

    #[test]
    fn failed_cycle_leaves_session_active_and_unchanged()
    {
        let board = Grid::from_rows(vec![
            vec![A, B, A],
            vec![C, A, D],
            vec![A, B, A],
        ])
        .unwrap();
        let goal = Grid::from_rows(vec![
            vec![B, A, B],
            vec![A, B, A],
            vec![B, A, B],
        ])
        .unwrap();
        let mut session = PuzzleSession::from_parts(four(), board.clone(), goal);

        assert_eq!(session.cycle(1, 1), CycleOutcome::NoValidMove);
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.board(), &board);
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn restart_resets_state_and_keeps_size()
    {
        let board = Grid::from_rows(vec![vec![A]]).unwrap();
        let goal = Grid::from_rows(vec![vec![B]]).unwrap();
        let mut session = PuzzleSession::from_parts(Palette::new(vec![A, B]).unwrap(), board, goal);
        session.cycle(0, 0);
        assert_eq!(session.state(), SessionState::Solved);

        let mut rng = StdRng::seed_from_u64(11);
        session.restart(&mut rng).unwrap();
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.size(), 1);
        assert!(!matches(session.board(), session.goal()));
    }
}
