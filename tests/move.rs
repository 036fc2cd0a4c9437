use std::fmt::Write;

use anyhow::{ensure, Context};
use common::*;
use eight_puzzle_solver::Puzzle;

mod common;

fn main() {
    run_tests("move", |content| {
        let input = content
            .split_once(SEPARATOR)
            .map_or(content, |(input, _)| input)
            .trim();
        let (actions, map) = input.split_once('\n').context("No actions")?;
        ensure!(!actions.is_empty(), "No actions");

        let puzzle = map.parse::<Puzzle>().context("Invalid map")?;
        let mut state = *puzzle.initial();
        let mut got = format!("{input}\n\n{SEPARATOR}");
        for ch in actions.chars() {
            let action = parse_action(ch)?;
            ensure!(
                puzzle.actions(&state).contains(&action) == state.slide(action).is_some(),
                "Legal actions disagree with sliding at {action}",
            );
            match puzzle.result(&state, action) {
                Ok(next) => state = next,
                Err(err) => {
                    writeln!(got, "{err}").unwrap();
                    break;
                }
            }
            write!(got, "{state}").unwrap();
            if puzzle.goal_test(&state) {
                writeln!(got, "goal").unwrap();
            }
            write!(got, "{SEPARATOR}").unwrap();
        }

        Ok(got)
    });
}
