pub mod colors;
pub mod scavenger;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![GameDescriptor {
        name: "colors",
        description: "Cycle cell colors until the board matches the goal",
    },
    GameDescriptor {
        name: "scavenger",
        description: "Collect crystals and dodge meteors as they speed up",
    }]
}

pub fn parse_seed(value: &str) -> Result<u64, String>
{
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("Seed must be a non-negative integer, got '{value}'"))
}

/// `ARCADE_SEED` from the environment, if set.
pub fn seed_from_env() -> Result<Option<u64>, String>
{
    match env::var("ARCADE_SEED") {
        Ok(value) => parse_seed(&value).map(Some),
        Err(_) => Ok(None),
    }
}

pub fn make_rng(seed: Option<u64>) -> StdRng
{
    match seed {
        Some(seed) => {
            log::info!("using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Splits `--name=value` or `--name value` forms. Returns `None` when `arg`
/// is not `--name`.
pub(crate) fn option_value<'a, I>(arg: &'a str, name: &str, rest: &mut I) -> Option<Result<&'a str, String>>
where
    I: Iterator<Item = &'a String>,
{
    let flag = format!("--{name}");
    if arg == flag {
        Some(
            rest.next()
                .map(String::as_str)
                .ok_or_else(|| format!("Expected value after {flag}")),
        )
    } else {
        arg.strip_prefix(flag.as_str())
            .and_then(|tail| tail.strip_prefix('='))
            .map(Ok)
    }
}
