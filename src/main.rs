use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::{Key, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eight_puzzle_solver::{scramble, solve, Action, Heuristic, Puzzle, State};

#[derive(Parser)]
#[command(name = "eight-puzzle")]
#[command(about = "Solve the 8-puzzle with A* search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find a shortest sequence of blank moves to the goal
    Solve {
        /// Board text, or a file containing it (optionally followed by the goal board)
        board: String,
        /// Goal board, overriding the default and any goal given in BOARD
        #[arg(long)]
        goal: Option<String>,
        #[arg(long, value_enum, default_value_t = HeuristicArg::Manhattan)]
        heuristic: HeuristicArg,
        #[arg(long, value_enum, default_value_t = Algorithm::Astar)]
        algorithm: Algorithm,
        /// Print the board after every move
        #[arg(long)]
        replay: bool,
    },
    /// Slide the blank by hand
    Play {
        /// Board text, or a file containing it
        board: String,
        #[arg(long)]
        goal: Option<String>,
    },
    /// Print a random solvable board
    Scramble {
        /// Number of random moves away from the goal
        #[arg(long, default_value_t = 50)]
        moves: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HeuristicArg {
    Misplaced,
    Manhattan,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Misplaced => Heuristic::Misplaced,
            HeuristicArg::Manhattan => Heuristic::Manhattan,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    Astar,
    Bfs,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_puzzle(board: &str, goal: Option<&str>) -> Result<Puzzle> {
    let text = if Path::new(board).is_file() {
        std::fs::read_to_string(board).context("Failed to read the board")?
    } else {
        board.to_owned()
    };
    let puzzle = text.parse::<Puzzle>().context("Failed to parse the board")?;
    Ok(match goal {
        Some(goal) => {
            let goal = goal.parse::<State>().context("Failed to parse the goal")?;
            Puzzle::with_goal(*puzzle.initial(), goal)
        }
        None => puzzle,
    })
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Solve {
            board,
            goal,
            heuristic,
            algorithm,
            replay,
        } => {
            let puzzle = load_puzzle(&board, goal.as_deref())?.with_heuristic(heuristic.into());
            run_solve(&puzzle, algorithm, replay)
        }
        Command::Play { board, goal } => run_play(load_puzzle(&board, goal.as_deref())?),
        Command::Scramble { moves, seed } => {
            let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
            print!("{}", scramble(State::default(), moves, &mut rng));
            Ok(())
        }
    }
}

fn run_solve(puzzle: &Puzzle, algorithm: Algorithm, replay: bool) -> Result<()> {
    if !puzzle.is_solvable() {
        tracing::warn!("Boards differ in parity, the goal is unreachable");
    }

    let pb = ProgressBar::new_spinner().with_style(ProgressStyle::with_template(
        "{spinner} {human_pos} states expanded [{elapsed}]",
    )?);
    let on_step = || pb.inc(1);
    let steps = match algorithm {
        Algorithm::Astar => solve::astar(puzzle, on_step),
        Algorithm::Bfs => solve::bfs(puzzle, on_step),
    };
    pb.finish_and_clear();
    tracing::info!(expanded = pb.position(), ?algorithm, "Search finished");

    let Some(steps) = steps else {
        println!("No solution");
        return Ok(());
    };
    println!("Found a solution in {} moves", steps.len());
    let names = steps.iter().map(|action| action.name()).collect::<Vec<_>>();
    println!("{}", names.join(" "));

    if replay {
        let mut state = *puzzle.initial();
        println!("\n{state}");
        for (&action, i) in steps.iter().zip(1..) {
            state = puzzle.result(&state, action)?;
            println!("{i}. {action}\n{state}");
        }
    }
    Ok(())
}

enum Input {
    Exit,
    Go(Action),
    Undo,
    Reset,
    Hint,
}

impl TryFrom<Key> for Input {
    type Error = ();

    fn try_from(key: Key) -> Result<Self, Self::Error> {
        Ok(match key {
            Key::ArrowLeft | Key::Char('a') => Self::Go(Action::Left),
            Key::ArrowRight | Key::Char('d') => Self::Go(Action::Right),
            Key::ArrowUp | Key::Char('w') => Self::Go(Action::Up),
            Key::ArrowDown | Key::Char('s') => Self::Go(Action::Down),
            Key::Escape | Key::Char('q') => Self::Exit,
            Key::Char('z') => Self::Undo,
            Key::Char('r') => Self::Reset,
            Key::Char('h') => Self::Hint,
            _ => return Err(()),
        })
    }
}

fn run_play(puzzle: Puzzle) -> Result<()> {
    let mut state = *puzzle.initial();
    let mut history = Vec::new();

    let term = Term::stderr();
    loop {
        eprintln!("{state}");
        if puzzle.goal_test(&state) {
            eprintln!("Solved in {} moves", history.len());
            break;
        }

        let input = loop {
            if let Ok(input) = Input::try_from(term.read_key()?) {
                break input;
            }
        };

        match input {
            Input::Exit => break,
            Input::Go(action) => match puzzle.result(&state, action) {
                Ok(next) => {
                    history.push(state);
                    state = next;
                }
                Err(err) => eprintln!("{err}"),
            },
            Input::Undo => {
                if let Some(last_state) = history.pop() {
                    state = last_state;
                }
            }
            Input::Reset => {
                history.push(state);
                state = *puzzle.initial();
            }
            Input::Hint => {
                let from_here = Puzzle::with_goal(state, *puzzle.goal())
                    .with_heuristic(Heuristic::Manhattan);
                match solve::astar_search(&from_here) {
                    Some(steps) => match steps.first() {
                        Some(action) => eprintln!("Hint: {action} ({} moves left)", steps.len()),
                        None => eprintln!("Already solved"),
                    },
                    None => eprintln!("No solution from here"),
                }
            }
        }
    }

    Ok(())
}
