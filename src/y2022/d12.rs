use {
    crate::*,
    glam::IVec2,
    strum::IntoEnumIterator,
};

/* --- Day 12: Hill Climbing Algorithm ---

You try contacting the Elves using your handheld device, but the river you're following must be too low to get a decent signal.

You ask the device for a heightmap of the surrounding area (your puzzle input). The heightmap shows the local area from above broken into a grid; the elevation of each square of the grid is given by a single lowercase letter, where a is the lowest elevation, b is the next-lowest, and so on up to the highest elevation, z.

Also included on the heightmap are marks for your current position (S) and the location that should get the best signal (E). Your current position (S) has elevation a, and the location that should get the best signal (E) has elevation z.

You'd like to reach E, but to save energy, you should do it in as few steps as possible. During each step, you can move exactly one square up, down, left, or right. To avoid needing to get out your climbing gear, the elevation of the destination square can be at most one higher than the elevation of your current square; that is, if your current elevation is m, you could step to elevation n, but not to elevation o. (This also means that the elevation of the destination square can be much lower than the elevation of your current square.)

For example:

Sabqponm
abcryxxl
accszExk
acctuvwj
abdefghi

Here, you start in the top-left corner; your goal is near the middle. You could start by moving down or right, but eventually you'll need to head toward the e at the bottom. From there, you can spiral around to the goal:

v..v<<<<
>v.vv<<^
.>vv>E^^
..v>>>^^
..>>>>>^

In the above diagram, the symbols indicate whether the path exits each square moving up (^), down (v), left (<), or right (>). The location that should get the best signal is still E, and . marks unvisited squares.

This path reaches the goal in 31 steps, the fewest possible.

What is the fewest steps required to move from your current position to the location that should get the best signal?

--- Part Two ---

As you walk up the hill, you suspect that the Elves will want to turn this into a hiking trail. The beginning isn't very scenic, though; perhaps you can find a better starting point.

To maximize exercise while hiking, the trail should start as low as possible: elevation a. The goal is still the square marked E. However, the trail should still be direct, taking the fewest steps to reach its goal. So, you'll need to find the shortest path from any square at elevation a to the square marked E.

Again consider the example from above:

Sabqponm
abcryxxl
accszExk
acctuvwj
abdefghi

Now, there are multiple paths that start at elevation a, and although the path from the original start position is the shortest, its elevation is too high. Starting from the square at elevation a in the second row just left of the b, however, the trail reaches the goal in only 29 steps.

What is the fewest steps required to move starting from any square with elevation a to the location that should get the best signal? */

#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(test, derive(Debug))]
enum HeightCell {
    Start,
    End,
    Height(u8),
}

impl HeightCell {
    fn height(self) -> u8 {
        match self {
            Self::Start => 0_u8,
            Self::End => b'z' - b'a',
            Self::Height(height) => height,
        }
    }
}

impl TryFrom<char> for HeightCell {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'S' => Ok(Self::Start),
            'E' => Ok(Self::End),
            'a'..='z' => Ok(Self::Height(value as u8 - b'a')),
            _ => Err(()),
        }
    }
}

/// Forward search from `S`, climbing at most one elevation unit per step.
struct ClimbingRoute<'h> {
    heights: &'h Grid<u8>,
    end: IVec2,
}

impl SearchSpace for ClimbingRoute<'_> {
    type State = IVec2;
    type Key = IVec2;
    type Cost = u32;

    fn key(&self, state: &Self::State) -> Self::Key {
        *state
    }

    fn is_goal(&self, state: &Self::State) -> bool {
        *state == self.end
    }

    fn successors(
        &self,
        state: &Self::State,
        successors: &mut Vec<Successor<Self::State, Self::Cost>>,
    ) {
        let max_height: u8 = self.heights.get(*state).map_or(u8::MAX, |height| *height + 1_u8);

        successors.extend(Direction::iter().filter_map(|dir| {
            let next: IVec2 = *state + dir.vec();

            self.heights
                .get(next)
                .filter(|height| **height <= max_height)
                .map(|_| Successor(next, 1_u32))
        }));
    }

    fn heuristic(&self, state: &Self::State) -> Self::Cost {
        manhattan_distance(*state, self.end) as u32
    }
}

/// Reversed-edge search from `E` down to any lowest square. With every square
/// a potential goal there's no usable distance bound, so this one runs as
/// plain Dijkstra.
struct DescendingRoute<'h> {
    heights: &'h Grid<u8>,
}

impl SearchSpace for DescendingRoute<'_> {
    type State = IVec2;
    type Key = IVec2;
    type Cost = u32;

    fn key(&self, state: &Self::State) -> Self::Key {
        *state
    }

    fn is_goal(&self, state: &Self::State) -> bool {
        self.heights.get(*state).copied() == Some(0_u8)
    }

    fn successors(
        &self,
        state: &Self::State,
        successors: &mut Vec<Successor<Self::State, Self::Cost>>,
    ) {
        // `next` may precede `state` on a forward route iff climbing from
        // `next` to `state` is legal.
        let min_height: u8 = self.heights.get(*state).copied().unwrap_or_default();

        successors.extend(Direction::iter().filter_map(|dir| {
            let next: IVec2 = *state + dir.vec();

            self.heights
                .get(next)
                .filter(|height| **height + 1_u8 >= min_height)
                .map(|_| Successor(next, 1_u32))
        }));
    }
}

pub struct Solution {
    heights: Grid<u8>,
    start: IVec2,
    end: IVec2,
}

#[derive(Debug)]
pub enum SolutionParseError<'s> {
    Grid(GridParseError<'s, ()>),
    InvalidStartCount,
    InvalidEndCount,
}

impl Solution {
    fn try_fewest_steps_from_start(&self) -> Option<u32> {
        BestFirstSearch::new(
            ClimbingRoute {
                heights: &self.heights,
                end: self.end,
            },
            self.start,
        )
        .solve()
    }

    fn try_fewest_steps_from_any_lowest(&self) -> Option<u32> {
        BestFirstSearch::new(
            DescendingRoute {
                heights: &self.heights,
            },
            self.end,
        )
        .solve()
    }

    fn try_fewest_steps_from_start_and_path_string(&self) -> Option<(u32, String)> {
        let mut search: BestFirstSearch<ClimbingRoute> = BestFirstSearch::new(
            ClimbingRoute {
                heights: &self.heights,
                end: self.end,
            },
            self.start,
        );

        search.solve().map(|fewest_steps| {
            let path: Vec<IVec2> = search.path();
            let width: usize = self.heights.dimensions().x as usize;
            let mut path_string: String = String::with_capacity(
                self.heights.cells().len() + self.heights.dimensions().y as usize,
            );

            for (index, height) in self.heights.cells().iter().copied().enumerate() {
                let pos: IVec2 = self.heights.pos_from_index(index);

                path_string.push(if path.contains(&pos) {
                    (b'A' + height) as char
                } else {
                    (b'a' + height) as char
                });

                if index % width == width - 1_usize {
                    path_string.push('\n');
                }
            }

            (fewest_steps, path_string)
        })
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = SolutionParseError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        use SolutionParseError as Error;

        let cells: Grid<HeightCell> = input.try_into().map_err(Error::Grid)?;
        let start: IVec2 = cells
            .try_find_single_position_with_cell(&HeightCell::Start)
            .ok_or(Error::InvalidStartCount)?;
        let end: IVec2 = cells
            .try_find_single_position_with_cell(&HeightCell::End)
            .ok_or(Error::InvalidEndCount)?;
        let heights: Grid<u8> = Grid::try_from_cells_and_width(
            cells.cells().iter().copied().map(HeightCell::height).collect(),
            cells.dimensions().x as usize,
        )
        .unwrap();

        Ok(Self {
            heights,
            start,
            end,
        })
    }
}

impl RunQuestions for Solution {
    /// The at-most-one-higher rule only constrains ascent, which took a
    /// careful read to notice.
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if !args.verbose {
            dbg!(self.try_fewest_steps_from_start());
        } else if let Some((fewest_steps, path_string)) =
            self.try_fewest_steps_from_start_and_path_string()
        {
            dbg!(fewest_steps);
            println!("{path_string}");
        } else {
            eprintln!("Failed to find a route to the best-signal square.");
        }
    }

    /// Flipping the edges and searching backwards from `E` answers all
    /// starting squares in one pass, rather than one search per `a`.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.try_fewest_steps_from_any_lowest());
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STRS: &'static [&'static str] = &["\
        Sabqponm\n\
        abcryxxl\n\
        accszExk\n\
        acctuvwj\n\
        abdefghi\n"];

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

        assert_eq!(solution.heights.dimensions(), IVec2::new(8_i32, 5_i32));
        assert_eq!(solution.start, IVec2::ZERO);
        assert_eq!(solution.end, IVec2::new(5_i32, 2_i32));
        assert_eq!(
            solution.heights.get(solution.start).copied(),
            Some(0_u8)
        );
        assert_eq!(
            solution.heights.get(solution.end).copied(),
            Some(b'z' - b'a')
        );
        assert!(matches!(
            Solution::try_from("abc\ndef\n"),
            Err(SolutionParseError::InvalidStartCount)
        ));
        assert!(matches!(
            Solution::try_from("Sbc\ndSf\n"),
            Err(SolutionParseError::InvalidStartCount)
        ));
    }

    #[test]
    fn test_try_fewest_steps_from_start() {
        for (index, fewest_steps) in [Some(31_u32)].into_iter().enumerate() {
            assert_eq!(
                solution(index).try_fewest_steps_from_start(),
                fewest_steps
            );
        }
    }

    #[test]
    fn test_try_fewest_steps_from_any_lowest() {
        for (index, fewest_steps) in [Some(29_u32)].into_iter().enumerate() {
            assert_eq!(
                solution(index).try_fewest_steps_from_any_lowest(),
                fewest_steps
            );
        }
    }
}
