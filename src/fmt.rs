use std::fmt::{self, Write};

use crate::{Action, Puzzle, State, BLANK, SIZE};

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.initial())?;
        if *self.goal() != State::default() {
            write!(f, "\n{}", self.goal())?;
        }
        Ok(())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles().chunks(SIZE) {
            for &tile in row {
                if tile == BLANK {
                    f.write_char('.')?;
                } else {
                    write!(f, "{tile}")?;
                }
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
