pub use {grid::*, search::*};

use {
    clap::Parser,
    memmap::Mmap,
    nom::{
        bytes::complete::tag,
        character::complete::digit1,
        combinator::{map, map_res, opt, rest},
        sequence::{pair, preceded},
        IResult,
    },
    num::Integer,
    std::{
        any::type_name,
        fmt::Debug,
        fs::File,
        io::{Error as IoError, ErrorKind, Result as IoResult},
        str::{from_utf8, FromStr, Utf8Error},
    },
};

mod grid;
mod search;

#[derive(Debug, Parser)]
pub struct QuestionArgs {
    /// Print extra information, if there is any
    #[arg(short, long, default_value_t)]
    pub verbose: bool,
}

/// Arguments for program execution
#[derive(Debug, Parser)]
pub struct Args {
    /// Input file path, `input/y{year}/d{day}.txt` if omitted
    #[arg(short, long, default_value_t)]
    input_file_path: String,

    /// The year to run
    #[arg(short, long)]
    pub year: u16,

    /// The day to run
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: u8,

    /// The question to run, both if omitted
    #[arg(short, long, default_value_t, value_parser = clap::value_parser!(u8).range(0..=2))]
    pub question: u8,

    #[command(flatten)]
    pub question_args: QuestionArgs,
}

impl Args {
    fn input_file_path(&self) -> String {
        if self.input_file_path.is_empty() {
            format!("input/y{}/d{}.txt", self.year, self.day)
        } else {
            self.input_file_path.clone()
        }
    }

    fn try_to_intermediate<I>(&self) -> Option<I>
    where
        I: for<'a> TryFrom<&'a str>,
        for<'a> <I as TryFrom<&'a str>>::Error: Debug,
    {
        let file_path: String = self.input_file_path();

        // SAFETY: This isn't truly safe, we're just hoping nobody touches our
        // file before we're done parsing it
        unsafe {
            open_utf8_file(&file_path, |input| {
                input.try_into().map_or_else(
                    |error| {
                        eprintln!(
                            "Failed to convert file \"{file_path}\" to type {}:\n{error:#?}",
                            type_name::<I>()
                        );

                        None
                    },
                    Some,
                )
            })
        }
        .unwrap_or_else(|error| {
            eprintln!("Failed to open UTF-8 file \"{file_path}\":\n{error}");

            None
        })
    }
}

/// The per-day solution interface: parse the input into an intermediate, then
/// answer one or both questions over it.
pub trait RunQuestions
where
    Self: Sized + for<'a> TryFrom<&'a str>,
    for<'a> <Self as TryFrom<&'a str>>::Error: Debug,
{
    fn q1_internal(&mut self, args: &QuestionArgs);
    fn q2_internal(&mut self, args: &QuestionArgs);

    fn q1(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
        }
    }

    fn q2(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q2_internal(&args.question_args);
        }
    }

    fn both(args: &Args) {
        if let Some(mut intermediate) = args.try_to_intermediate::<Self>() {
            intermediate.q1_internal(&args.question_args);
            intermediate.q2_internal(&args.question_args);
        }
    }
}

#[derive(Clone)]
pub struct Puzzle {
    pub q1: fn(&Args),
    pub q2: fn(&Args),
    pub both: fn(&Args),
}

impl Puzzle {
    fn run(&self, args: &Args) {
        match args.question {
            0_u8 => (self.both)(args),
            1_u8 => (self.q1)(args),
            2_u8 => (self.q2)(args),
            question => unreachable!(
                "A valid Args will have a question value in the range 0..=2, but {question} was \
                encountered.\n\
                Args:\n\
                {args:#?}"
            ),
        }
    }
}

pub struct PuzzleParams<'p> {
    pub string: &'p str,
    pub puzzle: Puzzle,
}

pub struct YearParams<'p> {
    pub string: &'p str,
    pub puzzle_params: Vec<PuzzleParams<'p>>,
}

fn parse_tagged_int<'i, I: FromStr>(t: &str, input: &'i str) -> IResult<&'i str, I> {
    preceded(tag(t), map_res(rest, I::from_str))(input)
}

/// The full registry of solved puzzles, keyed by year and day.
///
/// The numeric keys are recovered from the `yYYYY` and `dN` module names the
/// `solutions!` macro passes along as strings.
#[derive(Default)]
pub struct Calendar {
    years: Vec<(u16, Vec<(u8, Puzzle)>)>,
}

impl Calendar {
    pub fn try_from_year_params(year_params: Vec<YearParams>) -> Option<Self> {
        let mut years: Vec<(u16, Vec<(u8, Puzzle)>)> = Vec::with_capacity(year_params.len());

        for YearParams {
            string,
            puzzle_params,
        } in year_params
        {
            let Ok((_, year)) = parse_tagged_int::<u16>("y", string) else {
                eprintln!("Invalid year module name \"{string}\"");

                continue;
            };

            let mut puzzles: Vec<(u8, Puzzle)> = Vec::with_capacity(puzzle_params.len());

            for PuzzleParams { string, puzzle } in puzzle_params {
                match parse_tagged_int::<u8>("d", string) {
                    Ok((_, day)) => puzzles.push((day, puzzle)),
                    Err(_) => eprintln!("Invalid day module name \"{string}\""),
                }
            }

            puzzles.sort_by_key(|(day, _)| *day);
            years.push((year, puzzles));
        }

        years.sort_by_key(|(year, _)| *year);

        (!years.is_empty()).then_some(Self { years })
    }

    pub fn run(&self, args: &Args) {
        let Ok(year_index) = self
            .years
            .binary_search_by_key(&args.year, |(year, _)| *year)
        else {
            panic!(
                "No solutions are registered for year {}.\n\
                Args:\n\
                {args:#?}",
                args.year
            );
        };

        let puzzles: &[(u8, Puzzle)] = &self.years[year_index].1;

        let Ok(day_index) = puzzles.binary_search_by_key(&args.day, |(day, _)| *day) else {
            panic!(
                "No solution is registered for year {} day {}.\n\
                Args:\n\
                {args:#?}",
                args.year, args.day
            );
        };

        puzzles[day_index].1.run(args);
    }
}

/// Declares the year and day solution modules and a `solutions` function
/// returning the `Calendar` over them.
#[macro_export]
macro_rules! solutions {
    [ $( ( $year:ident, [ $( $day:ident ),* $(,)? ] ) ),* $(,)? ] => {
        $(
            pub mod $year {
                $(
                    pub mod $day;
                )*
            }
        )*

        pub fn solutions() -> &'static Calendar {
            static ONCE_LOCK: std::sync::OnceLock<Calendar> = std::sync::OnceLock::new();

            ONCE_LOCK.get_or_init(|| {
                Calendar::try_from_year_params(vec![$(
                    YearParams {
                        string: stringify!($year),
                        puzzle_params: vec![$(
                            PuzzleParams {
                                string: stringify!($day),
                                puzzle: Puzzle {
                                    q1: $year::$day::Solution::q1,
                                    q2: $year::$day::Solution::q2,
                                    both: $year::$day::Solution::both,
                                },
                            },
                        )*],
                    },
                )*])
                .unwrap_or_default()
            })
        }
    };
}

#[macro_export]
macro_rules! pretty_assert_eq {
    ($left:expr, $right:expr) => {{
        let left = $left;
        let right = $right;

        if left != right {
            panic!(
                "pretty assertion failed: `(left == right)`\nleft: {left:#?}\nright: {right:#?}"
            );
        }
    }};
}

/// Ties a `#[repr(u8)]` cell enum to its ASCII bytes, deriving the `char`
/// conversions grids parse and render through.
#[macro_export]
macro_rules! define_cell {
    {
        $( #[$attr:meta] )*
        $vis:vis enum $cell:ident {
            $(
                $( #[$variant_attr:meta] )*
                $variant:ident = $byte:literal,
            )*
        }
    } => {
        #[repr(u8)]
        $( #[$attr] )*
        $vis enum $cell {
            $(
                $( #[$variant_attr] )*
                $variant = $byte,
            )*
        }

        impl TryFrom<char> for $cell {
            type Error = ();

            fn try_from(value: char) -> Result<Self, Self::Error> {
                if value.is_ascii() {
                    match value as u8 {
                        $(
                            $byte => Ok(Self::$variant),
                        )*
                        _ => Err(()),
                    }
                } else {
                    Err(())
                }
            }
        }

        impl From<$cell> for char {
            fn from(value: $cell) -> Self {
                value as u8 as char
            }
        }
    };
}

/// Opens a memory-mapped UTF-8 file at a specified path, and passes a `&str`
/// over the file to a provided callback function
///
/// # Errors
///
/// This function returns a `Result::Err`-wrapped `std::io::Error` if the file
/// cannot be opened, cannot be mapped, or is not valid UTF-8.
///
/// # Safety
///
/// This function uses `Mmap::map`, which is an unsafe function. There is no
/// guarantee that an external process won't modify the file after it is
/// opened as read-only, and it is UB if one does so while this function
/// refers to the mapping as an immutable string slice.
pub unsafe fn open_utf8_file<T, F: FnOnce(&str) -> T>(file_path: &str, f: F) -> IoResult<T> {
    let file: File = File::open(file_path)?;

    // SAFETY: This operation is unsafe
    let mmap: Mmap = Mmap::map(&file)?;
    let bytes: &[u8] = &mmap;
    let utf8_str: &str = from_utf8(bytes).map_err(|utf8_error: Utf8Error| -> IoError {
        IoError::new(ErrorKind::InvalidData, utf8_error)
    })?;

    Ok(f(utf8_str))
}

pub fn parse_integer<'i, I: FromStr + Integer>(input: &'i str) -> IResult<&'i str, I> {
    map(
        pair(
            map(opt(tag("-")), |minus| minus.is_some()),
            map_res(digit1, I::from_str),
        ),
        |(negative, magnitude): (bool, I)| {
            if negative {
                I::zero() - magnitude
            } else {
                magnitude
            }
        },
    )(input)
}

/// A `nom`-combinator parsing seam, for types whose parses compose into
/// larger ones.
pub trait Parse: Sized {
    fn parse(input: &str) -> IResult<&str, Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_int() {
        assert_eq!(parse_tagged_int::<u16>("y", "y2021"), Ok(("", 2021_u16)));
        assert_eq!(parse_tagged_int::<u8>("d", "d15"), Ok(("", 15_u8)));
        assert!(parse_tagged_int::<u8>("d", "q15").is_err());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer::<i32>("42"), Ok(("", 42_i32)));
        assert_eq!(parse_integer::<i32>("-17,"), Ok((",", -17_i32)));
        assert!(parse_integer::<i32>("x").is_err());
    }
}
