mod arcade;
mod games;
mod grid;
mod logging;
mod terminal;

use std::env;

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String>
{
    logging::init()?;

    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();
    match command.as_deref() {
        None => interactive_menu(),
        Some("list") => {
            list_games();
            Ok(())
        }
        Some("colors") => run_game("colors", &rest),
        Some("scavenger") => run_game("scavenger", &rest),
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some(other) => Err(format!("Unknown command '{other}'. Run with --help.")),
    }
}

fn run_game(name: &str, args: &[String]) -> Result<(), String>
{
    log::info!("starting {name}");
    match name {
        "colors" => {
            let config = games::colors::ColorsConfig::from_args(args)?;
            games::colors::run_with_config(config)
        }
        "scavenger" => {
            let config = games::scavenger::ScavengerConfig::from_args(args)?;
            games::scavenger::run_with_config(config)
        }
        _ => Err(format!("Unknown game '{name}'. Run with --help.")),
    }
}

fn interactive_menu() -> Result<(), String>
{
    let registry = games::registry();
    println!("Term Arcade");
    println!();
    println!("Select a game:");
    for (idx, game) in registry.iter().enumerate() {
        println!("  {}. {} - {}", idx + 1, game.name, game.description);
    }
    println!();
    print!("Enter number or name (default 1, q to quit): ");
    std::io::Write::flush(&mut std::io::stdout())
        .map_err(|err| format!("Failed to flush stdout: {err}"))?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|err| format!("Failed to read input: {err}"))?;
    let choice = input.trim();

    if choice.is_empty() {
        return run_game(registry[0].name, &[]);
    }
    if choice.eq_ignore_ascii_case("q") {
        return Ok(());
    }
    if let Ok(index) = choice.parse::<usize>() {
        if index >= 1 && index <= registry.len() {
            return run_game(registry[index - 1].name, &[]);
        }
    }

    for game in registry {
        if game.name.eq_ignore_ascii_case(choice) {
            return run_game(game.name, &[]);
        }
    }

    Err("Invalid selection.".to_string())
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<10} - {}", game.name, game.description);
    }
}

fn print_help()
{
    println!("term-arcade");
    println!("\nUsage:");
    println!("  term-arcade list");
    println!("  term-arcade colors [--size=5] [--colors=4] [--seed=N]");
    println!("  term-arcade scavenger [--seed=N]");
    println!("\nNotes:");
    println!("  ARCADE_SEED sets a default seed for either game.");
    println!("  ARCADE_LOG=<file> writes logs to a file; RUST_LOG picks the level.");
}
