use {
    glam::IVec2,
    static_assertions::const_assert,
    std::{
        fmt::{Debug, DebugList, Formatter, Result as FmtResult},
        mem::transmute,
        str::Lines,
    },
    strum::EnumCount as EnumCountTrait,
    strum_macros::{EnumCount, EnumIter},
};

#[derive(Copy, Clone, Debug, Default, EnumCount, EnumIter, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

const DIRECTION_VECS: [IVec2; Direction::COUNT] = [IVec2::NEG_Y, IVec2::X, IVec2::Y, IVec2::NEG_X];

// This guarantees we can safely convert from `u8` to `Direction` by masking
// the smallest 2 bits
const_assert!(Direction::COUNT == 4_usize);

impl Direction {
    const MASK: u8 = Self::COUNT as u8 - 1_u8;
    const HALF_COUNT: u8 = Self::COUNT as u8 / 2_u8;

    #[inline]
    pub const fn vec(self) -> IVec2 {
        DIRECTION_VECS[self as usize]
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        // SAFETY: See `const_assert` above
        unsafe { transmute(value & Self::MASK) }
    }

    #[inline]
    pub const fn next(self) -> Self {
        Self::from_u8(self as u8 + 1_u8)
    }

    #[inline]
    pub const fn prev(self) -> Self {
        Self::from_u8(self as u8 + Self::MASK)
    }

    #[inline]
    pub const fn rev(self) -> Self {
        Self::from_u8(self as u8 + Self::HALF_COUNT)
    }
}

impl From<Direction> for IVec2 {
    fn from(value: Direction) -> Self {
        value.vec()
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

pub fn manhattan_magnitude(pos: IVec2) -> i32 {
    let abs: IVec2 = pos.abs();

    abs.x + abs.y
}

pub fn manhattan_distance(a: IVec2, b: IVec2) -> i32 {
    manhattan_magnitude(a - b)
}

/// A compact position for hashable search keys. Both components must fit in a
/// `u8`, which every puzzle grid in this repository satisfies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SmallPos {
    pub x: u8,
    pub y: u8,
}

impl SmallPos {
    pub const MAX_DIMENSIONS: IVec2 = IVec2::new(u8::MAX as i32 + 1_i32, u8::MAX as i32 + 1_i32);

    pub fn is_pos_valid(pos: IVec2) -> bool {
        pos.cmpge(IVec2::ZERO).all() && pos.cmplt(Self::MAX_DIMENSIONS).all()
    }

    pub fn try_from_pos(pos: IVec2) -> Option<Self> {
        Self::is_pos_valid(pos).then(|| Self {
            x: pos.x as u8,
            y: pos.y as u8,
        })
    }

    pub fn get(self) -> IVec2 {
        IVec2::new(self.x as i32, self.y as i32)
    }
}

/// A dense row-major grid of cells.
pub struct Grid<T> {
    cells: Vec<T>,

    /// Should only contain unsigned values, but is signed for ease of use
    /// when iterating
    dimensions: IVec2,
}

impl<T> Grid<T> {
    pub fn try_from_cells_and_width(cells: Vec<T>, width: usize) -> Option<Self> {
        (width != 0_usize && cells.len() % width == 0_usize).then(|| {
            let height: usize = cells.len() / width;

            Self {
                cells,
                dimensions: IVec2::new(width as i32, height as i32),
            }
        })
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub fn dimensions(&self) -> IVec2 {
        self.dimensions
    }

    #[inline]
    pub fn area(&self) -> usize {
        (self.dimensions.x * self.dimensions.y) as usize
    }

    #[inline]
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.cmpge(IVec2::ZERO).all() && pos.cmplt(self.dimensions).all()
    }

    #[inline]
    pub fn index_from_pos(&self, pos: IVec2) -> usize {
        pos.y as usize * self.dimensions.x as usize + pos.x as usize
    }

    pub fn try_index_from_pos(&self, pos: IVec2) -> Option<usize> {
        self.contains(pos).then(|| self.index_from_pos(pos))
    }

    pub fn pos_from_index(&self, index: usize) -> IVec2 {
        let width: usize = self.dimensions.x as usize;

        IVec2::new((index % width) as i32, (index / width) as i32)
    }

    #[inline]
    pub fn max_dimensions(&self) -> IVec2 {
        self.dimensions - IVec2::ONE
    }

    pub fn get(&self, pos: IVec2) -> Option<&T> {
        self.try_index_from_pos(pos).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut T> {
        self.try_index_from_pos(pos)
            .map(|index| &mut self.cells[index])
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0_usize..self.area()).map(|index| self.pos_from_index(index))
    }

    pub fn iter_positions_with_cell<'a>(&'a self, target: &'a T) -> impl Iterator<Item = IVec2> + 'a
    where
        T: PartialEq,
    {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| (*cell == *target).then(|| self.pos_from_index(index)))
    }

    pub fn try_find_single_position_with_cell(&self, target: &T) -> Option<IVec2>
    where
        T: PartialEq,
    {
        let mut iter = self.iter_positions_with_cell(target);
        let pos: Option<IVec2> = iter.next();

        iter.next().is_none().then_some(pos).flatten()
    }
}

impl<T: Clone> Clone for Grid<T> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            dimensions: self.dimensions,
        }
    }
}

impl<T: Debug> Debug for Grid<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Grid")?;

        let mut row_list: DebugList = f.debug_list();

        for y in 0_i32..self.dimensions.y {
            let start: usize = (y * self.dimensions.x) as usize;

            row_list.entry(&&self.cells[start..start + self.dimensions.x as usize]);
        }

        row_list.finish()
    }
}

impl<T: PartialEq> PartialEq for Grid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions && self.cells == other.cells
    }
}

impl<T: Copy + Into<char>> Grid<T> {
    /// Renders the grid as the ASCII block it was parsed from, one row per
    /// line.
    pub fn render(&self) -> String {
        let width: usize = self.dimensions.x as usize;
        let mut string: String =
            String::with_capacity(self.cells.len() + self.dimensions.y as usize);

        for (index, cell) in self.cells.iter().copied().enumerate() {
            string.push(cell.into());

            if index % width == width - 1_usize {
                string.push('\n');
            }
        }

        string
    }
}

#[derive(Debug, PartialEq)]
pub enum GridParseError<'s, E> {
    NoInitialLine,
    IsNotAscii(&'s str),
    InvalidLength { line: &'s str, expected_len: usize },
    CellParseError(E),
}

impl<'s, E, T: TryFrom<char, Error = E>> TryFrom<&'s str> for Grid<T> {
    type Error = GridParseError<'s, E>;

    fn try_from(grid_str: &'s str) -> Result<Self, Self::Error> {
        use GridParseError as Error;

        let mut lines: Lines = grid_str.lines();
        let first_line: &str = lines.next().filter(|line| !line.is_empty()).ok_or(Error::NoInitialLine)?;
        let width: usize = first_line.len();
        let mut height: usize = 0_usize;
        let mut cells: Vec<T> = Vec::with_capacity(width * width);

        for line in [first_line].into_iter().chain(lines) {
            if !line.is_ascii() {
                return Err(Error::IsNotAscii(line));
            }

            if line.len() != width {
                return Err(Error::InvalidLength {
                    line,
                    expected_len: width,
                });
            }

            for cell_char in line.chars() {
                cells.push(cell_char.try_into().map_err(Error::CellParseError)?);
            }

            height += 1_usize;
        }

        Ok(Self {
            cells,
            dimensions: IVec2::new(width as i32, height as i32),
        })
    }
}
