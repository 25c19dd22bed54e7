use anyhow::Result;
use clap::Parser;
use log::info;

use std::cmp::Ordering;
use std::io::{stdin, stdout, Write};

use connect4_engine::*;

mod display;

/// Play Connect 4 against the search engine, or watch it play itself
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Search depth of AI players in plies
    #[arg(short, long, default_value_t = config::DEFAULT_DEPTH)]
    depth: usize,

    /// Search the first moves of each AI turn on separate threads
    #[arg(long)]
    parallel: bool,

    /// Transposition table entries per search, 0 disables the table
    #[arg(long, default_value_t = config::DEFAULT_TABLE_SIZE)]
    table_size: usize,

    /// Log search statistics
    #[arg(short, long)]
    verbose: bool,
}

/// Asks a yes/no question until one of the two is answered
fn ask(question: &str) -> Result<bool> {
    loop {
        let mut buffer = String::new();
        print!("{}", question);
        stdout().flush()?;
        if stdin().read_line(&mut buffer)? == 0 {
            anyhow::bail!("input closed");
        }
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn report(player: Player, choice: &Choice) {
    let winner = match choice.value.cmp(&0) {
        Ordering::Less => player.other(),
        _ => player,
    };
    match choice.win_distance() {
        Some(distance) => println!(
            "{} can force a win in {} {}.",
            winner,
            distance,
            if distance == 1 { "ply" } else { "plies" }
        ),
        None => println!("No forced result found, position scores {}", choice.value),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = SearchConfig::new(args.depth)
        .with_parallel(args.parallel)
        .with_table_size(args.table_size);
    config.validate()?;
    let mut solver = Solver::new(config);

    println!("Welcome to Connect 4\n");

    let ai_players = (
        ask("Is player 1 AI controlled? y/n: ")?,
        ask("Is player 2 AI controlled? y/n: ")?,
    );

    let mut position = Position::new();

    // game loop
    loop {
        display::draw(&position)?;

        // end states
        if is_win(&position) {
            println!("{} wins!", position.side_to_move().other());
            break;
        }
        if is_draw(&position) {
            println!("Draw!");
            break;
        }

        let player = position.side_to_move();
        let ai_controlled = match player {
            Player::One => ai_players.0,
            Player::Two => ai_players.1,
        };

        let column = if ai_controlled {
            println!("AI is thinking...");
            stdout().flush()?;

            // slow down play if both players are AI
            if ai_players == (true, true) {
                std::thread::sleep(std::time::Duration::new(1, 0));
            }

            let choice = solver.choose_move(&position)?;
            info!(
                "{} searched {} positions, score {}",
                player, choice.nodes, choice.value
            );
            report(player, &choice);
            println!("Best move: {}", choice.column + 1);
            choice.column

        // human player
        } else {
            print!("{}, move input > ", player);
            stdout().flush()?;
            let mut input = String::new();
            if stdin().read_line(&mut input)? == 0 {
                return Ok(());
            }

            match input.trim().parse::<usize>() {
                Ok(column @ 1..=WIDTH) => column - 1,
                _ => {
                    println!(
                        "Invalid move '{}', columns must be between 1 and {}",
                        input.trim(),
                        WIDTH
                    );
                    continue;
                }
            }
        };

        match apply_move(&position, column) {
            Ok(next) => position = next,
            Err(err) if err.is_invalid_move() => {
                println!("Invalid move, column {} full", column + 1);
                // try the move again
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
