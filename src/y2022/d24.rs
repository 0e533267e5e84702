use {
    crate::*,
    bitvec::prelude::*,
    glam::IVec2,
    num::Integer,
    std::iter::once,
    strum::IntoEnumIterator,
};

/* --- Day 24: Blizzard Basin ---

With everything replanted for next year (and with elephants and monkeys to tend the grove), you and the Elves leave for the extraction point.

Partway up the mountain that shields the grove is a flat, open area that serves as the extraction point. It's a bit of a climb, but nothing the expedition can't handle.

At least, that would normally be true; now that the mountain is covered in snow, things have become more difficult than the Elves are used to.

As the expedition reaches a valley that must be traversed to reach the extraction site, you find that strong, turbulent winds are pushing small blizzards of snow and sharp ice around the valley. It's a good thing everyone packed warm clothes! To make it across safely, you'll need to find a way to avoid them.

Fortunately, it's easy to see all of this from the entrance to the valley, so you make a map of the valley and the blizzards (your puzzle input). For example:

#.#####
#.....#
#>....#
#.....#
#...v.#
#.....#
#####.#

The walls of the valley are drawn as #; everything else is ground. Clear ground - where there is currently no blizzard - is drawn as .. Otherwise, blizzards are drawn with an arrow indicating their direction of motion: up (^), down (v), left (<), or right (>).

The above map includes two blizzards, one moving right (>) and one moving down (v). In one minute, each blizzard moves one position in the direction it is pointing. When a blizzard would move out of the bounds of the valley, a new blizzard forms on the opposite side of the valley moving in the same direction. Blizzards wrap around: due to conservation of blizzard energy, as a blizzard reaches the wall of the valley, a new blizzard forms on the opposite side of the valley moving in the same direction.

You'll start on the single ground tile at the top of the valley (marked as the only . in the top row) and need to reach the single ground tile at the bottom of the valley (marked as the only . in the bottom row).

Your expedition begins in the only non-wall position in the top row and needs to reach the only non-wall position in the bottom row. On each minute, you can move up, down, left, or right, or you can wait in place. You and the blizzards act simultaneously, and you cannot share a position with a blizzard.

In the following more complex example, your expedition can reach the goal in 18 minutes:

#.######
#>>.<^<#
#.<..<<#
#>v.><>#
#<^v^^>#
######.#

What is the fewest number of minutes required to avoid the blizzards and reach the goal?

--- Part Two ---

As the expedition reaches the far side of the valley, one of the Elves looks especially dismayed:

He forgot his snacks at the entrance to the valley!

Since you're so good at dodging blizzards, the Elves suggest you go back for his snacks. From the same initial conditions, how quickly can you make it from the start to the goal, then back to the start, then back to the goal?

In the above example, the first trip to the goal takes 18 minutes, the trip back to the start takes 23 minutes, and the trip back to the goal again takes 13 minutes, for a total time of 54 minutes.

What is the fewest number of minutes required to reach the goal, go back to the start, then reach the goal again? */

define_cell! {
    #[derive(Clone, Copy, Default, PartialEq)]
    #[cfg_attr(test, derive(Debug))]
    enum Cell {
        #[default]
        Empty = b'.',
        Wall = b'#',
        NorthBlizzard = b'^',
        EastBlizzard = b'>',
        SouthBlizzard = b'v',
        WestBlizzard = b'<',
    }
}

impl Cell {
    fn try_as_direction(self) -> Option<Direction> {
        match self {
            Self::NorthBlizzard => Some(Direction::North),
            Self::EastBlizzard => Some(Direction::East),
            Self::SouthBlizzard => Some(Direction::South),
            Self::WestBlizzard => Some(Direction::West),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[cfg_attr(test, derive(Debug))]
struct ExpeditionState {
    pos: SmallPos,
    minute: u16,
    remaining_legs: u8,
}

impl ExpeditionState {
    /// Whether this leg heads for the far side of the valley rather than back
    /// to the entrance. Legs count down, and the last one always ends at the
    /// far side.
    fn is_heading_to_end(self) -> bool {
        self.remaining_legs % 2_u8 == 1_u8
    }
}

/// The blizzard layout repeats with period `lcm(interior width, interior
/// height)`, so search nodes are identified by layout phase rather than by
/// absolute minute.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
struct ExpeditionKey {
    pos: SmallPos,
    phase: u16,
    remaining_legs: u8,
}

struct BasinNavigator<'s> {
    solution: &'s Solution,
}

impl SearchSpace for BasinNavigator<'_> {
    type State = ExpeditionState;
    type Key = ExpeditionKey;
    type Cost = u32;

    fn key(&self, state: &Self::State) -> Self::Key {
        ExpeditionKey {
            pos: state.pos,
            phase: state.minute % self.solution.period as u16,
            remaining_legs: state.remaining_legs,
        }
    }

    fn is_goal(&self, state: &Self::State) -> bool {
        state.remaining_legs == 0_u8
    }

    fn successors(
        &self,
        state: &Self::State,
        successors: &mut Vec<Successor<Self::State, Self::Cost>>,
    ) {
        let minute: u16 = state.minute + 1_u16;
        let occupied: &BitVec =
            &self.solution.occupancy[(minute % self.solution.period as u16) as usize];
        let pos: IVec2 = state.pos.get();
        let target: IVec2 = if state.is_heading_to_end() {
            self.solution.end
        } else {
            self.solution.start
        };

        successors.extend(
            once(pos)
                .chain(Direction::iter().map(|dir| pos + dir.vec()))
                .filter(|next| {
                    self.solution
                        .grid
                        .get(*next)
                        .map_or(false, |cell| *cell != Cell::Wall)
                        && !occupied[self.solution.grid.index_from_pos(*next)]
                })
                .filter_map(|next| {
                    SmallPos::try_from_pos(next).map(|next_pos| {
                        Successor(
                            ExpeditionState {
                                pos: next_pos,
                                minute,
                                remaining_legs: state.remaining_legs
                                    - u8::from(next == target),
                            },
                            1_u32,
                        )
                    })
                }),
        );
    }

    fn heuristic(&self, state: &Self::State) -> Self::Cost {
        if state.remaining_legs == 0_u8 {
            0_u32
        } else {
            let target: IVec2 = if state.is_heading_to_end() {
                self.solution.end
            } else {
                self.solution.start
            };
            let full_crossing: i32 = manhattan_distance(self.solution.start, self.solution.end);

            // Finish the current leg, then cross the whole valley once per
            // remaining leg. Blizzards only add waiting, so this never
            // overestimates.
            (manhattan_distance(state.pos.get(), target)
                + (state.remaining_legs as i32 - 1_i32) * full_crossing) as u32
        }
    }
}

pub struct Solution {
    grid: Grid<Cell>,
    start: IVec2,
    end: IVec2,
    period: i32,

    /// One wall-clock minute of blizzard positions per layout phase, as a bit
    /// per grid index.
    occupancy: Vec<BitVec>,
}

#[derive(Debug)]
pub enum SolutionParseError<'s> {
    Grid(GridParseError<'s, ()>),
    InvalidDimensions,
    InvalidStartCount,
    InvalidEndCount,
}

impl Solution {
    fn try_single_empty_pos_in_row(grid: &Grid<Cell>, y: i32) -> Option<IVec2> {
        let mut iter = (0_i32..grid.dimensions().x)
            .map(|x| IVec2::new(x, y))
            .filter(|pos| grid.get(*pos) == Some(&Cell::Empty));
        let pos: Option<IVec2> = iter.next();

        iter.next().is_none().then_some(pos).flatten()
    }

    fn occupancy_from_grid(grid: &Grid<Cell>, period: i32) -> Vec<BitVec> {
        let interior: IVec2 = grid.dimensions() - 2_i32 * IVec2::ONE;
        let blizzards: Vec<(IVec2, IVec2)> = grid
            .iter_positions()
            .filter_map(|pos| {
                grid.get(pos)
                    .and_then(|cell| cell.try_as_direction())
                    .map(|dir| (pos - IVec2::ONE, dir.vec()))
            })
            .collect();

        (0_i32..period)
            .map(|minute| {
                let mut occupied: BitVec = bitvec![0; grid.area()];

                for (interior_pos, vec) in blizzards.iter().copied() {
                    let moved: IVec2 =
                        (interior_pos + minute * vec).rem_euclid(interior) + IVec2::ONE;

                    occupied.set(grid.index_from_pos(moved), true);
                }

                occupied
            })
            .collect()
    }

    fn try_fewest_minutes_search(&self, legs: u8) -> Option<BestFirstSearch<BasinNavigator<'_>>> {
        SmallPos::try_from_pos(self.start).map(|pos| {
            BestFirstSearch::new(
                BasinNavigator { solution: self },
                ExpeditionState {
                    pos,
                    minute: 0_u16,
                    remaining_legs: legs,
                },
            )
        })
    }

    fn try_fewest_minutes(&self, legs: u8) -> Option<u32> {
        self.try_fewest_minutes_search(legs)
            .and_then(|mut search| search.solve())
    }

    fn try_fewest_minutes_and_leg_minutes(&self, legs: u8) -> Option<(u32, Vec<u16>)> {
        self.try_fewest_minutes_search(legs).and_then(|mut search| {
            search.solve().map(|fewest_minutes| {
                let leg_minutes: Vec<u16> = search
                    .path()
                    .windows(2_usize)
                    .filter_map(|window| {
                        (window[1_usize].remaining_legs != window[0_usize].remaining_legs)
                            .then_some(window[1_usize].minute)
                    })
                    .collect();

                (fewest_minutes, leg_minutes)
            })
        })
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = SolutionParseError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        use SolutionParseError as Error;

        let grid: Grid<Cell> = input.try_into().map_err(Error::Grid)?;
        let dimensions: IVec2 = grid.dimensions();

        // A non-empty interior, and positions that fit in search keys.
        if dimensions.cmplt(IVec2::new(3_i32, 3_i32)).any()
            || !SmallPos::is_pos_valid(grid.max_dimensions())
        {
            return Err(Error::InvalidDimensions);
        }

        let start: IVec2 =
            Self::try_single_empty_pos_in_row(&grid, 0_i32).ok_or(Error::InvalidStartCount)?;
        let end: IVec2 = Self::try_single_empty_pos_in_row(&grid, dimensions.y - 1_i32)
            .ok_or(Error::InvalidEndCount)?;
        let interior: IVec2 = dimensions - 2_i32 * IVec2::ONE;
        let period: i32 = interior.x.lcm(&interior.y);
        let occupancy: Vec<BitVec> = Self::occupancy_from_grid(&grid, period);

        Ok(Self {
            grid,
            start,
            end,
            period,
            occupancy,
        })
    }
}

impl RunQuestions for Solution {
    /// Precomputing all blizzard layouts turns the hard part into a plain
    /// search over (position, layout phase).
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            dbg!(self.period);
            println!("{}", self.grid.render());
        }

        dbg!(self.try_fewest_minutes(1_u8));
    }

    /// The leg counter slots straight into the key, so the three trips are
    /// still a single search.
    fn q2_internal(&mut self, args: &QuestionArgs) {
        if !args.verbose {
            dbg!(self.try_fewest_minutes(3_u8));
        } else if let Some((fewest_minutes, leg_minutes)) =
            self.try_fewest_minutes_and_leg_minutes(3_u8)
        {
            dbg!(fewest_minutes);
            dbg!(leg_minutes);
        } else {
            eprintln!("Failed to find a route through the valley.");
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STRS: &'static [&'static str] = &["\
        #.######\n\
        #>>.<^<#\n\
        #.<..<<#\n\
        #>v.><>#\n\
        #<^v^^>#\n\
        ######.#\n"];

    fn solution(index: usize) -> &'static Solution {
        static ONCE_LOCK: OnceLock<Vec<Solution>> = OnceLock::new();

        &ONCE_LOCK.get_or_init(|| {
            SOLUTION_STRS
                .iter()
                .copied()
                .map(|solution_str| solution_str.try_into().unwrap())
                .collect()
        })[index]
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution(0_usize);

        pretty_assert_eq!(solution.grid.render(), SOLUTION_STRS[0_usize]);
        assert_eq!(solution.grid.dimensions(), IVec2::new(8_i32, 6_i32));
        assert_eq!(solution.start, IVec2::new(1_i32, 0_i32));
        assert_eq!(solution.end, IVec2::new(6_i32, 5_i32));

        // Interior of 6 x 4.
        assert_eq!(solution.period, 12_i32);
        assert_eq!(solution.occupancy.len(), 12_usize);
        assert!(matches!(
            Solution::try_from("#.#\n#.#\n"),
            Err(SolutionParseError::InvalidDimensions)
        ));
        assert!(matches!(
            Solution::try_from("#..##\n#...#\n##.##\n"),
            Err(SolutionParseError::InvalidStartCount)
        ));
    }

    #[test]
    fn test_occupancy_from_grid() {
        let solution: &Solution = solution(0_usize);

        // At minute zero each blizzard still sits on its own input cell.
        for pos in solution.grid.iter_positions() {
            assert_eq!(
                solution.occupancy[0_usize][solution.grid.index_from_pos(pos)],
                solution
                    .grid
                    .get(pos)
                    .and_then(|cell| cell.try_as_direction())
                    .is_some()
            );
        }

        // One full period later the layout repeats.
        assert_eq!(
            Solution::occupancy_from_grid(&solution.grid, solution.period + 1_i32)
                [solution.period as usize],
            solution.occupancy[0_usize]
        );
    }

    #[test]
    fn test_try_fewest_minutes() {
        for (index, fewest_minutes) in [Some(18_u32)].into_iter().enumerate() {
            assert_eq!(solution(index).try_fewest_minutes(1_u8), fewest_minutes);
        }
    }

    #[test]
    fn test_try_fewest_minutes_with_snack_run() {
        for (index, fewest_minutes) in [Some(54_u32)].into_iter().enumerate() {
            assert_eq!(solution(index).try_fewest_minutes(3_u8), fewest_minutes);
        }
    }

    #[test]
    fn test_try_fewest_minutes_and_leg_minutes() {
        let (fewest_minutes, leg_minutes): (u32, Vec<u16>) = solution(0_usize)
            .try_fewest_minutes_and_leg_minutes(3_u8)
            .unwrap();

        // Which optimal route gets found depends on frontier tie-breaking,
        // but it always has three legs, ends when the last one does, and
        // can't beat the single-trip optimum on its first leg.
        assert_eq!(fewest_minutes, 54_u32);
        assert_eq!(leg_minutes.len(), 3_usize);
        assert_eq!(leg_minutes[2_usize] as u32, fewest_minutes);
        assert!(leg_minutes[0_usize] >= 18_u16);
        assert!(leg_minutes.windows(2_usize).all(|w| w[0_usize] < w[1_usize]));
    }
}
