use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fxhash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::{Action, Puzzle, State};

type IndexMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

/// Parent link of the root in [`bfs`].
const ROOT: usize = !0usize;

/// A* over unit-cost moves without progress reporting.
pub fn astar_search(puzzle: &Puzzle) -> Option<Vec<Action>> {
    astar(puzzle, || {})
}

/// A* over unit-cost moves. `on_step` runs once per expanded state.
///
/// Returns `None` if the goal is unreachable, which for a 3x3 board means the
/// whole parity class (at most 9!/2 states) has been expanded.
///
/// The frontier is keyed by `(f, state)`, so among entries of equal `f` the
/// lexicographically smallest board is expanded first. States missing from
/// `g_score` have not been reached yet and count as infinitely far away.
pub fn astar(puzzle: &Puzzle, mut on_step: impl FnMut()) -> Option<Vec<Action>> {
    let initial = *puzzle.initial();
    let mut g_score = FxHashMap::<State, u32>::default();
    let mut f_score = FxHashMap::<State, u32>::default();
    let mut came_from = FxHashMap::<State, (State, Action)>::default();
    let mut closed = FxHashSet::<State>::default();
    let mut frontier = BinaryHeap::new();

    let h = puzzle.heuristic(&initial);
    g_score.insert(initial, 0);
    f_score.insert(initial, h);
    frontier.push(Reverse((h, initial)));
    let mut generated = 1usize;
    debug!(initial = ?initial.tiles(), h, "A* started");

    while let Some(Reverse((f, state))) = frontier.pop() {
        #[cfg(feature = "coz")]
        coz::scope!("Expand");

        // Superseded by a cheaper entry, or already expanded.
        if closed.contains(&state) || f_score.get(&state).is_some_and(|&best| best < f) {
            continue;
        }
        closed.insert(state);
        on_step();

        #[cfg(feature = "coz")]
        coz::progress!("Expand");

        if puzzle.goal_test(&state) {
            let path = reconstruct_path(state, &came_from);
            debug!(
                expanded = closed.len(),
                generated,
                cost = path.len(),
                "A* solved"
            );
            return Some(path);
        }

        let g = g_score[&state];
        trace!(f, g, tiles = ?state.tiles(), "Expand");
        for (action, next) in state.successors() {
            if closed.contains(&next) {
                continue;
            }
            let tentative = g + 1;
            if g_score.get(&next).is_some_and(|&known| known <= tentative) {
                continue;
            }
            let f = tentative + puzzle.heuristic(&next);
            came_from.insert(next, (state, action));
            g_score.insert(next, tentative);
            f_score.insert(next, f);
            frontier.push(Reverse((f, next)));
            generated += 1;
        }
    }

    debug!(expanded = closed.len(), generated, "A* exhausted");
    None
}

fn reconstruct_path(goal: State, came_from: &FxHashMap<State, (State, Action)>) -> Vec<Action> {
    let mut steps = std::iter::successors(came_from.get(&goal), |(prev, _)| came_from.get(prev))
        .map(|&(_, action)| action)
        .collect::<Vec<_>>();
    steps.reverse();
    steps
}

/// Breadth-first search. Slow, but needs no heuristic, so it is the reference
/// for shortest path lengths.
pub fn bfs(puzzle: &Puzzle, mut on_step: impl FnMut()) -> Option<Vec<Action>> {
    let mut state_parent = IndexMap::default();
    state_parent.insert(*puzzle.initial(), (ROOT, Action::Up));

    let mut cursor = 0;
    let found = loop {
        let (&state, _) = state_parent.get_index(cursor)?;
        on_step();
        if puzzle.goal_test(&state) {
            break cursor;
        }
        for (action, next) in state.successors() {
            state_parent.entry(next).or_insert((cursor, action));
        }
        cursor += 1;
    };

    let mut steps = std::iter::successors(Some(state_parent[found]), |&(parent, _)| {
        state_parent.get_index(parent).map(|(_, &link)| link)
    })
    .take_while(|&(parent, _)| parent != ROOT)
    .map(|(_, action)| action)
    .collect::<Vec<_>>();
    steps.reverse();
    debug!(visited = state_parent.len(), cost = steps.len(), "BFS solved");
    Some(steps)
}
