use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};

use crate::{Action, Puzzle, State, BLANK, CELLS, SIZE};

fn parse_cell(cell: &str) -> Result<u8> {
    match cell {
        "." | "_" => Ok(BLANK),
        _ => cell
            .parse()
            .with_context(|| format!("Invalid cell: {cell:?}")),
    }
}

/// Accepts either `CELLS` separated values (`1,2,3,4,5,6,7,0,8`) or rows of
/// one character per cell (`123\n456\n7.8`).
impl FromStr for State {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>();
        ensure!(!tokens.is_empty(), "Empty board");

        let mut tiles = Vec::with_capacity(CELLS);
        if tokens.len() == CELLS {
            for token in tokens {
                tiles.push(parse_cell(token)?);
            }
        } else {
            for (row, token) in tokens.iter().enumerate() {
                ensure!(
                    tokens.len() == 1 || token.chars().count() == SIZE,
                    "Width mismatch of row {row}, expecting width {SIZE}",
                );
                for (i, ch) in token.char_indices() {
                    tiles.push(parse_cell(&token[i..i + ch.len_utf8()])?);
                }
            }
        }
        Ok(State::try_from(&tiles[..])?)
    }
}

/// The initial board, optionally followed by an empty line and the goal board.
impl FromStr for Puzzle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().map(|line| line.trim());
        let mut boards = Vec::new();
        loop {
            let block = lines
                .by_ref()
                .skip_while(|line| line.is_empty())
                .take_while(|line| !line.is_empty())
                .collect::<Vec<_>>();
            if block.is_empty() {
                break;
            }
            boards.push(block.join("\n"));
        }

        let (initial, goal) = match &boards[..] {
            [] => bail!("Missing initial board"),
            [initial] => (initial, None),
            [initial, goal] => (initial, Some(goal)),
            _ => bail!("Expecting at most two boards, got {}", boards.len()),
        };
        let initial = initial
            .parse::<State>()
            .context("Invalid initial board")?;
        let goal = match goal {
            Some(goal) => goal.parse::<State>().context("Invalid goal board")?,
            None => State::default(),
        };
        Ok(Puzzle::with_goal(initial, goal))
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "U" | "UP" => Action::Up,
            "D" | "DOWN" => Action::Down,
            "L" | "LEFT" => Action::Left,
            "R" | "RIGHT" => Action::Right,
            _ => bail!("Invalid action: {s:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_formats() {
        let expected = State::new([1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
        for input in [
            "123\n456\n7.8",
            "1,2,3,4,5,6,7,0,8",
            "1 2 3\n4 5 6\n7 _ 8",
            "123456708",
        ] {
            assert_eq!(input.parse::<State>().unwrap(), expected, "{input:?}");
        }
        assert_eq!(expected.to_string().parse::<State>().unwrap(), expected);
        assert_eq!(expected.to_string(), "123\n456\n7.8\n");
    }

    #[test]
    fn bad_boards() {
        assert!("".parse::<State>().is_err());
        assert!("123\n45\n6780".parse::<State>().is_err());
        assert!("1,2,3,4,5,6,7,8".parse::<State>().is_err());
        assert!("1,2,3,4,5,6,7,8,8".parse::<State>().is_err());
        assert!("123\n456\n78x".parse::<State>().is_err());
        let three_boards = "123\n456\n78.\n\n123\n456\n78.\n\n123\n456\n78.";
        assert!(three_boards.parse::<Puzzle>().is_err());
    }

    #[test]
    fn puzzle_with_goal() {
        let puzzle = "  123\n  456\n  7.8\n\n\n.12\n345\n678\n"
            .parse::<Puzzle>()
            .unwrap();
        assert_eq!(puzzle.initial().blank(), 7);
        assert_eq!(puzzle.goal().tiles(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(puzzle.to_string(), "123\n456\n7.8\n\n.12\n345\n678\n");
        assert_eq!(puzzle.to_string().parse::<Puzzle>().unwrap(), puzzle);
    }

    #[test]
    fn actions() {
        assert_eq!("u".parse::<Action>().unwrap(), Action::Up);
        assert_eq!("RIGHT".parse::<Action>().unwrap(), Action::Right);
        assert_eq!(Action::Left.to_string(), "LEFT");
        assert!("north".parse::<Action>().is_err());
    }
}
