use {
    num::Zero,
    std::{
        cmp::Ordering,
        collections::{BinaryHeap, HashMap, HashSet},
        hash::Hash,
        mem::take,
        ops::Add,
    },
};

/// A state reachable in one step, paired with the cost of that step.
pub struct Successor<S, C>(pub S, pub C);

/// The capability set a caller supplies to run a best-first search: canonical
/// identity, goal test, successor generation, and (optionally) a heuristic.
///
/// Keys must be injective over search nodes: two states represent the same
/// node iff their keys compare equal. The engine never inspects states beyond
/// this contract.
pub trait SearchSpace {
    type State: Clone;
    type Key: Clone + Eq + Hash;
    type Cost: Add<Self::Cost, Output = Self::Cost> + Clone + Ord + Zero;

    /// Whether higher accumulated cost wins. Flips both the frontier ordering
    /// and the score-improvement comparison.
    const MAXIMIZE: bool = false;

    fn key(&self, state: &Self::State) -> Self::Key;
    fn is_goal(&self, state: &Self::State) -> bool;

    /// All states reachable in one step. Revisits are fine; the score table
    /// rejects them. `successors` is cleared before this is called.
    fn successors(
        &self,
        state: &Self::State,
        successors: &mut Vec<Successor<Self::State, Self::Cost>>,
    );

    /// Estimate of remaining cost to any goal, used only for frontier
    /// ordering. The default of zero degrades the search to Dijkstra, which
    /// is always cost-correct for consistent-cost spaces. A non-zero
    /// heuristic must be admissible (and monotonic, for the closed-set
    /// short-circuit to be safe) for the returned optimum to be exact; the
    /// engine cannot detect violations.
    fn heuristic(&self, _state: &Self::State) -> Self::Cost {
        Self::Cost::zero()
    }
}

struct FrontierEntry<S: SearchSpace> {
    state: S::State,
    f_score: S::Cost,

    /// Insertion order, for deterministic tie-breaking.
    seq: u64,
}

impl<S: SearchSpace> PartialEq for FrontierEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score && self.seq == other.seq
    }
}

impl<S: SearchSpace> Eq for FrontierEntry<S> {}

impl<S: SearchSpace> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: SearchSpace> Ord for FrontierEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        let f_score_ordering: Ordering = if S::MAXIMIZE {
            self.f_score.cmp(&other.f_score)
        } else {
            // Reverse the order so that cost is minimized when popping from
            // the heap
            other.f_score.cmp(&self.f_score)
        };

        // Earlier insertions pop first among equal scores.
        f_score_ordering.then_with(|| other.seq.cmp(&self.seq))
    }
}

/// An implementation of https://en.wikipedia.org/wiki/A*_search_algorithm and
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm over an abstract
/// `SearchSpace`.
///
/// One instance runs one search: construct, call `solve` once, optionally
/// reconstruct the path, discard. The frontier tolerates duplicate entries
/// per key; only the first extraction of a key is authoritative, and keys are
/// never re-finalized afterwards, which guarantees termination on finite
/// spaces.
pub struct BestFirstSearch<S: SearchSpace> {
    space: S,
    start_key: S::Key,

    /// Best known accumulated cost from the start, by key. A missing entry is
    /// the sign-appropriate infinity.
    g_scores: HashMap<S::Key, S::Cost>,

    /// Predecessor state by key, recorded on every strict score improvement.
    /// Only used for path reconstruction, never for the returned cost.
    came_from: HashMap<S::Key, S::State>,
    closed: HashSet<S::Key>,
    frontier: BinaryHeap<FrontierEntry<S>>,
    successors: Vec<Successor<S::State, S::Cost>>,
    final_state: Option<S::State>,
    next_seq: u64,
}

impl<S: SearchSpace> BestFirstSearch<S> {
    pub fn new(space: S, initial_state: S::State) -> Self {
        let start_key: S::Key = space.key(&initial_state);
        let initial_f_score: S::Cost = space.heuristic(&initial_state);

        let mut search: Self = Self {
            space,
            start_key: start_key.clone(),
            g_scores: HashMap::new(),
            came_from: HashMap::new(),
            closed: HashSet::new(),
            frontier: BinaryHeap::new(),
            successors: Vec::new(),
            final_state: None,
            next_seq: 0_u64,
        };

        search.g_scores.insert(start_key, S::Cost::zero());
        search.push(initial_state, initial_f_score);

        search
    }

    #[inline]
    pub fn space(&self) -> &S {
        &self.space
    }

    #[inline]
    pub fn space_mut(&mut self) -> &mut S {
        &mut self.space
    }

    pub fn into_space(self) -> S {
        self.space
    }

    /// The goal state `solve` finished on, if it has found one.
    pub fn final_state(&self) -> Option<&S::State> {
        self.final_state.as_ref()
    }

    /// Best known accumulated cost for a key, or `None` if the key was never
    /// reached.
    pub fn score(&self, key: &S::Key) -> Option<&S::Cost> {
        self.g_scores.get(key)
    }

    /// Runs the search to completion, returning the accumulated cost of the
    /// first goal state finalized, or `None` once the frontier empties with
    /// no goal reached. No goal being reachable is a defined outcome, not an
    /// error.
    pub fn solve(&mut self) -> Option<S::Cost> {
        while let Some(FrontierEntry { state: current, .. }) = self.frontier.pop() {
            let current_key: S::Key = self.space.key(&current);

            // The first extraction of a key carries its final score. Later
            // frontier duplicates of the same key are stale and lose here.
            if !self.closed.insert(current_key.clone()) {
                continue;
            }

            let start_to_current: S::Cost = self.g_scores[&current_key].clone();

            if self.space.is_goal(&current) {
                self.final_state = Some(current);

                return Some(start_to_current);
            }

            let mut successors: Vec<Successor<S::State, S::Cost>> = take(&mut self.successors);

            successors.clear();
            self.space.successors(&current, &mut successors);

            for Successor(next, edge_cost) in successors.drain(..) {
                let next_key: S::Key = self.space.key(&next);

                if self.closed.contains(&next_key) {
                    continue;
                }

                let tentative: S::Cost = start_to_current.clone() + edge_cost;

                if self.improves(&tentative, &next_key) {
                    let next_f_score: S::Cost = tentative.clone() + self.space.heuristic(&next);

                    self.g_scores.insert(next_key.clone(), tentative);
                    self.came_from.insert(next_key, current.clone());
                    self.push(next, next_f_score);
                }
            }

            self.successors = successors;
        }

        None
    }

    /// The start-to-goal state sequence behind a successful `solve`, start
    /// first. Empty if no goal has been found.
    pub fn path(&self) -> Vec<S::State> {
        let mut path: Vec<S::State> = Vec::new();
        let mut current: Option<&S::State> = self.final_state.as_ref();

        while let Some(state) = current {
            path.push(state.clone());

            let key: S::Key = self.space.key(state);

            current = (key != self.start_key)
                .then(|| self.came_from.get(&key))
                .flatten();
        }

        path.reverse();

        path
    }

    fn improves(&self, tentative: &S::Cost, key: &S::Key) -> bool {
        self.g_scores.get(key).map_or(true, |best| {
            if S::MAXIMIZE {
                *tentative > *best
            } else {
                *tentative < *best
            }
        })
    }

    fn push(&mut self, state: S::State, f_score: S::Cost) {
        self.frontier.push(FrontierEntry {
            state,
            f_score,
            seq: self.next_seq,
        });
        self.next_seq += 1_u64;
    }
}

#[cfg(test)]
mod tests {
    use {super::*, glam::IVec2, crate::util::grid::manhattan_distance};

    /// Unit-cost 2D grid with walls. `use_heuristic` toggles between A* with
    /// a Manhattan heuristic and plain uniform-cost search.
    struct WalledGrid {
        dimensions: IVec2,
        walls: Vec<IVec2>,
        goal: IVec2,
        use_heuristic: bool,
    }

    impl SearchSpace for WalledGrid {
        type State = IVec2;
        type Key = IVec2;
        type Cost = i32;

        fn key(&self, state: &Self::State) -> Self::Key {
            *state
        }

        fn is_goal(&self, state: &Self::State) -> bool {
            *state == self.goal
        }

        fn successors(
            &self,
            state: &Self::State,
            successors: &mut Vec<Successor<Self::State, Self::Cost>>,
        ) {
            successors.extend(
                [IVec2::X, IVec2::Y, IVec2::NEG_X, IVec2::NEG_Y]
                    .into_iter()
                    .map(|delta| *state + delta)
                    .filter(|next| {
                        next.cmpge(IVec2::ZERO).all()
                            && next.cmplt(self.dimensions).all()
                            && !self.walls.contains(next)
                    })
                    .map(|next| Successor(next, 1_i32)),
            );
        }

        fn heuristic(&self, state: &Self::State) -> Self::Cost {
            if self.use_heuristic {
                manhattan_distance(*state, self.goal)
            } else {
                0_i32
            }
        }
    }

    fn blocked_3x3(use_heuristic: bool) -> WalledGrid {
        WalledGrid {
            dimensions: IVec2::new(3_i32, 3_i32),
            walls: vec![IVec2::new(1_i32, 0_i32), IVec2::new(1_i32, 1_i32)],
            goal: IVec2::new(2_i32, 2_i32),
            use_heuristic,
        }
    }

    #[test]
    fn test_grid_path_around_wall() {
        let mut search: BestFirstSearch<WalledGrid> =
            BestFirstSearch::new(blocked_3x3(true), IVec2::ZERO);

        assert_eq!(search.solve(), Some(4_i32));
    }

    #[test]
    fn test_grid_path_without_heuristic() {
        let mut search: BestFirstSearch<WalledGrid> =
            BestFirstSearch::new(blocked_3x3(false), IVec2::ZERO);

        assert_eq!(search.solve(), Some(4_i32));
    }

    #[test]
    fn test_unreachable_goal() {
        // Goal cell fully walled in: its only in-grid neighbors are walls.
        let mut search: BestFirstSearch<WalledGrid> = BestFirstSearch::new(
            WalledGrid {
                dimensions: IVec2::new(3_i32, 3_i32),
                walls: vec![IVec2::new(2_i32, 1_i32), IVec2::new(1_i32, 2_i32)],
                goal: IVec2::new(2_i32, 2_i32),
                use_heuristic: true,
            },
            IVec2::ZERO,
        );

        assert_eq!(search.solve(), None);
        assert_eq!(search.final_state(), None);
        assert!(search.path().is_empty());
    }

    #[test]
    fn test_path_reconstruction() {
        let mut search: BestFirstSearch<WalledGrid> =
            BestFirstSearch::new(blocked_3x3(true), IVec2::ZERO);
        let cost: i32 = search.solve().unwrap();
        let path: Vec<IVec2> = search.path();

        assert_eq!(path.first(), Some(&IVec2::ZERO));
        assert_eq!(path.last(), Some(&IVec2::new(2_i32, 2_i32)));

        // Unit edges: replayed path cost is its step count.
        assert_eq!(path.len() as i32 - 1_i32, cost);

        for window in path.windows(2_usize) {
            assert_eq!(manhattan_distance(window[0_usize], window[1_usize]), 1_i32);
        }
    }

    #[test]
    fn test_space_accessors() {
        let mut search: BestFirstSearch<WalledGrid> =
            BestFirstSearch::new(blocked_3x3(false), IVec2::ZERO);

        // The engine hands its space back out, so callers can reconfigure it
        // before solving and reclaim it afterwards.
        search.space_mut().use_heuristic = true;

        assert_eq!(search.space().goal, IVec2::new(2_i32, 2_i32));
        assert_eq!(search.solve(), Some(4_i32));
        assert_eq!(search.into_space().walls.len(), 2_usize);
    }

    /// Explicit weighted digraph with per-vertex heuristic values.
    struct WeightedDigraph {
        edges: Vec<Vec<(usize, u32)>>,
        heuristics: Vec<u32>,
        goal: usize,
    }

    impl WeightedDigraph {
        /// 0 -> 1 (4), 0 -> 2 (1), 2 -> 1 (2), 1 -> 3 (5), 2 -> 3 (8); the
        /// cheapest 0 -> 3 route is 0 -> 2 -> 1 -> 3, costing 8. Verifiable
        /// by enumerating all three routes by hand.
        fn diamond(heuristics: Vec<u32>) -> Self {
            Self {
                edges: vec![
                    vec![(1_usize, 4_u32), (2_usize, 1_u32)],
                    vec![(3_usize, 5_u32)],
                    vec![(1_usize, 2_u32), (3_usize, 8_u32)],
                    vec![],
                ],
                heuristics,
                goal: 3_usize,
            }
        }
    }

    impl SearchSpace for WeightedDigraph {
        type State = usize;
        type Key = usize;
        type Cost = u32;

        fn key(&self, state: &Self::State) -> Self::Key {
            *state
        }

        fn is_goal(&self, state: &Self::State) -> bool {
            *state == self.goal
        }

        fn successors(
            &self,
            state: &Self::State,
            successors: &mut Vec<Successor<Self::State, Self::Cost>>,
        ) {
            successors.extend(
                self.edges[*state]
                    .iter()
                    .map(|&(next, cost)| Successor(next, cost)),
            );
        }

        fn heuristic(&self, state: &Self::State) -> Self::Cost {
            self.heuristics[*state]
        }
    }

    #[test]
    fn test_weighted_digraph_zero_heuristic() {
        let mut search: BestFirstSearch<WeightedDigraph> =
            BestFirstSearch::new(WeightedDigraph::diamond(vec![0_u32; 4_usize]), 0_usize);

        assert_eq!(search.solve(), Some(8_u32));
    }

    #[test]
    fn test_weighted_digraph_admissible_heuristic() {
        // True remaining costs are [8, 5, 7, 0]; these never overestimate.
        let mut search: BestFirstSearch<WeightedDigraph> = BestFirstSearch::new(
            WeightedDigraph::diamond(vec![7_u32, 5_u32, 6_u32, 0_u32]),
            0_usize,
        );

        assert_eq!(search.solve(), Some(8_u32));

        let path: Vec<usize> = search.path();

        assert_eq!(path, vec![0_usize, 2_usize, 1_usize, 3_usize]);
    }

    /// States carry a scratch field that the key ignores, so distinct state
    /// values collapse onto one search node.
    struct NoisyLine;

    impl SearchSpace for NoisyLine {
        /// `(position, scratch)`
        type State = (i32, i32);
        type Key = i32;
        type Cost = i32;

        fn key(&self, state: &Self::State) -> Self::Key {
            state.0
        }

        fn is_goal(&self, state: &Self::State) -> bool {
            state.0 == 3_i32
        }

        fn successors(
            &self,
            state: &Self::State,
            successors: &mut Vec<Successor<Self::State, Self::Cost>>,
        ) {
            for delta in [-1_i32, 1_i32] {
                let position: i32 = state.0 + delta;

                if (0_i32..=3_i32).contains(&position) {
                    // Fresh scratch value every time: same node, new state.
                    successors.push(Successor((position, state.1 + 1_i32), 1_i32));
                }
            }
        }
    }

    #[test]
    fn test_key_canonicalization() {
        let mut search: BestFirstSearch<NoisyLine> =
            BestFirstSearch::new(NoisyLine, (0_i32, 0_i32));

        assert_eq!(search.solve(), Some(3_i32));

        // One score entry per key, despite the scratch field churning.
        for (position, cost) in [(0_i32, 0_i32), (1_i32, 1_i32), (2_i32, 2_i32), (3_i32, 3_i32)] {
            assert_eq!(search.score(&position), Some(&cost));
        }
    }

    /// DAG searched for the costliest route, with an exact cost-to-go
    /// estimate (the maximization analogue of an admissible heuristic).
    struct LongestRoute;

    impl SearchSpace for LongestRoute {
        type State = usize;
        type Key = usize;
        type Cost = u32;

        const MAXIMIZE: bool = true;

        fn key(&self, state: &Self::State) -> Self::Key {
            *state
        }

        fn is_goal(&self, state: &Self::State) -> bool {
            *state == 3_usize
        }

        fn successors(
            &self,
            state: &Self::State,
            successors: &mut Vec<Successor<Self::State, Self::Cost>>,
        ) {
            const EDGES: [&[(usize, u32)]; 4_usize] = [
                &[(1_usize, 1_u32), (2_usize, 5_u32)],
                &[(3_usize, 10_u32)],
                &[(3_usize, 1_u32)],
                &[],
            ];

            successors.extend(
                EDGES[*state]
                    .iter()
                    .map(|&(next, cost)| Successor(next, cost)),
            );
        }

        fn heuristic(&self, state: &Self::State) -> Self::Cost {
            [11_u32, 10_u32, 1_u32, 0_u32][*state]
        }
    }

    #[test]
    fn test_maximize() {
        let mut search: BestFirstSearch<LongestRoute> = BestFirstSearch::new(LongestRoute, 0_usize);

        assert_eq!(search.solve(), Some(11_u32));
        assert_eq!(search.path(), vec![0_usize, 1_usize, 3_usize]);
    }
}
