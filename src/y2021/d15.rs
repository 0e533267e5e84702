use {
    crate::*,
    glam::IVec2,
    strum::IntoEnumIterator,
};

/* --- Day 15: Chiton ---

You've almost reached the exit of the cave, but the walls are getting closer together. Your submarine can barely still fit, though; the main problem is that the walls of the cave are covered in chitons, and it would be best not to bump any of them.

The cavern is large, but has a very low ceiling, restricting your motion to two dimensions. The shape of the cavern resembles a square; a quick scan of chiton density produces a map of risk level throughout the cave (your puzzle input). For example:

1163751742
1381373672
2136511328
3694931569
7463417111
1319128137
1359912421
3125421639
1293138521
2311944581

You start in the top left position, your destination is the bottom right position, and you cannot move diagonally. The number at each position is its risk level; to determine the total risk of an entire path, add up the risk levels of each position you enter (that is, don't count the risk level of your starting position unless you enter it; leaving it adds no risk to your total).

Your goal is to find a path with the lowest total risk. In this example, a path with the lowest total risk is highlighted here:

The total risk of this path is 40 (the starting position is never entered, so its risk is not counted).

What is the lowest total risk of any path from the top left to the bottom right?

--- Part Two ---

Now that you know how to find low-risk paths in the cave, you can try to find your way out.

The entire cave is actually five times larger in both dimensions than you thought; the area you originally mapped is just one tile in a 5x5 tile area that forms the full map. Your original map tile repeats to the right and downward; each time the tile repeats to the right or downward, all of its risk levels are 1 higher than the tile immediately up or left of it. However, risk levels above 9 wrap back around to 1.

Equipped with the full map, you can now find a path from the top left corner to the bottom right corner with the lowest total risk.

Using the full map, what is the lowest total risk of any path from the top left to the bottom right? */

#[derive(Clone, Copy)]
#[cfg_attr(test, derive(Debug, PartialEq))]
struct Risk(u8);

impl TryFrom<char> for Risk {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        value
            .to_digit(10_u32)
            .filter(|digit| *digit != 0_u32)
            .map(|digit| Self(digit as u8))
            .ok_or(())
    }
}

struct RiskPathFinder<'g> {
    grid: &'g Grid<Risk>,
    end: IVec2,
}

impl SearchSpace for RiskPathFinder<'_> {
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
        successors.extend(Direction::iter().filter_map(|dir| {
            let next: IVec2 = *state + dir.vec();

            self.grid
                .get(next)
                .map(|risk| Successor(next, risk.0 as u32))
        }));
    }

    fn heuristic(&self, state: &Self::State) -> Self::Cost {
        // Every step costs at least 1, so this never overestimates.
        manhattan_distance(*state, self.end) as u32
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Grid<Risk>);

impl Solution {
    const FULL_CAVE_FACTOR: i32 = 5_i32;

    fn try_lowest_total_risk_search(grid: &Grid<Risk>) -> BestFirstSearch<RiskPathFinder<'_>> {
        BestFirstSearch::new(
            RiskPathFinder {
                grid,
                end: grid.max_dimensions(),
            },
            IVec2::ZERO,
        )
    }

    fn try_lowest_total_risk(grid: &Grid<Risk>) -> Option<u32> {
        Self::try_lowest_total_risk_search(grid).solve()
    }

    fn try_lowest_total_risk_and_path_string(grid: &Grid<Risk>) -> Option<(u32, String)> {
        let mut search: BestFirstSearch<RiskPathFinder> = Self::try_lowest_total_risk_search(grid);

        search.solve().map(|lowest_total_risk| {
            let path: Vec<IVec2> = search.path();
            let width: usize = grid.dimensions().x as usize;
            let mut path_string: String =
                String::with_capacity(grid.cells().len() + grid.dimensions().y as usize);

            for (index, risk) in grid.cells().iter().enumerate() {
                let pos: IVec2 = grid.pos_from_index(index);

                path_string.push(if path.contains(&pos) {
                    (b'0' + risk.0) as char
                } else {
                    '.'
                });

                if index % width == width - 1_usize {
                    path_string.push('\n');
                }
            }

            (lowest_total_risk, path_string)
        })
    }

    fn full_cave(&self) -> Grid<Risk> {
        let dimensions: IVec2 = self.0.dimensions();
        let full_dimensions: IVec2 = dimensions * Self::FULL_CAVE_FACTOR;
        let mut cells: Vec<Risk> = Vec::with_capacity((full_dimensions.x * full_dimensions.y) as usize);

        for y in 0_i32..full_dimensions.y {
            for x in 0_i32..full_dimensions.x {
                let pos: IVec2 = IVec2::new(x, y);
                let tile: IVec2 = pos / dimensions;
                let risk: u8 = self.0.get(pos % dimensions).map_or(0_u8, |risk| risk.0);

                // Risk levels above 9 wrap back around to 1.
                cells.push(Risk(
                    (risk as i32 + tile.x + tile.y - 1_i32).rem_euclid(9_i32) as u8 + 1_u8,
                ));
            }
        }

        // The cell count is a multiple of the width by construction.
        Grid::try_from_cells_and_width(cells, full_dimensions.x as usize).unwrap()
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = GridParseError<'i, ()>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        input.try_into().map(Self)
    }
}

impl RunQuestions for Solution {
    /// A pure A* warm-up. The Manhattan bound is weak against risk-9 walls but
    /// it still prunes a decent chunk of the cavern.
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if !args.verbose {
            dbg!(Self::try_lowest_total_risk(&self.0));
        } else if let Some((lowest_total_risk, path_string)) =
            Self::try_lowest_total_risk_and_path_string(&self.0)
        {
            dbg!(lowest_total_risk);
            println!("{path_string}");
        } else {
            eprintln!("Failed to find a path to the bottom right corner.");
        }
    }

    /// The tiling is the only new work here; 25x the area is nothing for the
    /// same search.
    fn q2_internal(&mut self, args: &QuestionArgs) {
        let full_cave: Grid<Risk> = self.full_cave();

        if !args.verbose {
            dbg!(Self::try_lowest_total_risk(&full_cave));
        } else if let Some((lowest_total_risk, path_string)) =
            Self::try_lowest_total_risk_and_path_string(&full_cave)
        {
            dbg!(lowest_total_risk);
            println!("{path_string}");
        } else {
            eprintln!("Failed to find a path to the bottom right corner.");
        }
    }
}
