use {
    crate::*,
    nom::{
        character::complete::{line_ending, space1},
        combinator::map,
        error::Error,
        multi::separated_list0,
        sequence::separated_pair,
        Err, IResult,
    },
    std::collections::HashMap,
};

/* --- Day 1: Historian Hysteria ---

The Chief Historian is always present for the big Christmas sleigh launch, but nobody has seen him in months! Last anyone heard, he was visiting locations that are historically significant to the North Pole; a group of Senior Historians has asked you to accompany them as they check the places they think he was most likely to visit.

As each location is checked, they will mark it on their list with a star. They figure the Chief Historian must be in one of the first fifty places they'll look, so in order to save Christmas, you need to help them get fifty stars on their list before Santa takes off on December 25th.

Collect stars by solving puzzles. Two puzzles will be made available on each day in the Advent calendar; the second puzzle is unlocked when you complete the first. Each puzzle grants one star. Good luck!

You haven't even left yet and the group of Elvish Senior Historians has already hit a problem: their list of locations to check is currently empty. Eventually, someone decides that the best place to check first would be the Chief Historian's office.

Upon pouring into the office, everyone confirms that the Chief Historian is indeed nowhere to be found. Instead, the Elves discover an assortment of notes and lists of historically significant locations! This seems to be the place the Chief Historian spent the last few months. The good news is that the Elves have a pretty good idea of where to look next. The bad news is that the two lists of location IDs don't seem to be very similar.

For example:

3   4
4   3
2   5
1   3
3   9
3   3

Maybe the lists are only off by a small amount! To find out, pair up the numbers and measure how far apart they are. Pair up the smallest number in the left list with the smallest number in the right list, then the second-smallest left number with the second-smallest right number, and so on.

Within each pair, figure out how far apart the two numbers are; you'll need to add up all of those distances. For example, if you pair up a 3 from the left list with a 7 from the right list, the distance apart is 4; if you pair up a 9 with a 3, the distance is 6.

In the example list above, the pairs and distances would be as follows:

The smallest number in the left list is 1, and the smallest number in the right list is 3. The distance between them is 2.
The second-smallest number in the left list is 2, and the second-smallest number in the right list is 3. The distance between them is 1.
The third-smallest number in both lists is 3, so the distance between them is 0.
The next numbers to pair up are 3 and 4, a distance of 1.
The fifth-smallest numbers in each list are 3 and 5, a distance of 2.
Finally, the largest number in the left list is 4, while the largest number in the right list is 9; these are a distance 5 apart.

To find the total distance between the left list and the right list, add up the distances between all of the pairs you found. In the example above, this is 2 + 1 + 0 + 1 + 2 + 5, a total distance of 11!

Your actual left and right lists contain many location IDs. What is the total distance between your lists?

--- Part Two ---

Your analysis only confirmed what everyone feared: the two lists of location IDs are indeed very different.

Or are they?

The Historians can't agree on which group made the mistakes or how to read most of the Chief Historian's handwriting, but in the commotion you notice an interesting detail: a lot of location IDs appear in both lists! Maybe the other numbers aren't location IDs at all but rather misinterpreted handwriting.

This time, you'll need to figure out exactly how often each number from the left list appears in the right list. Calculate a total similarity score by adding up each number in the left list after multiplying it by the number of times that number appears in the right list.

Here are the same example lists again:

3   4
4   3
2   5
1   3
3   9
3   3

For these example lists, here is the process of finding the similarity score:

The first number in the left list is 3. It appears in the right list three times, so the similarity score increases by 3 * 3 = 9.
The second number in the left list is 4. It appears in the right list once, so the similarity score increases by 4 * 1 = 4.
The third number in the left list is 2. It does not appear in the right list, so the similarity score does not increase (2 * 0 = 0).
The fourth number in the left list is 1. It does not appear in the right list, so the similarity score does not increase (1 * 0 = 0).
The fifth number in the left list is 3. It appears in the right list three times, so the similarity score increases by 9.
The sixth number in the left list is 3. It appears in the right list three times, so the similarity score increases by 9.

So, for these example lists, the similarity score at the end of this process is 31 (9 + 4 + 0 + 0 + 9 + 9).

What is the similarity score of your lists? */

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    left: Vec<i32>,
    right: Vec<i32>,
}

impl Solution {
    fn total_distance(&self) -> i32 {
        let mut left: Vec<i32> = self.left.clone();
        let mut right: Vec<i32> = self.right.clone();

        left.sort_unstable();
        right.sort_unstable();

        left.into_iter()
            .zip(right)
            .map(|(left, right)| (left - right).abs())
            .sum()
    }

    fn similarity_score(&self) -> i32 {
        let mut counts: HashMap<i32, i32> = HashMap::with_capacity(self.right.len());

        for location_id in self.right.iter().copied() {
            *counts.entry(location_id).or_default() += 1_i32;
        }

        self.left
            .iter()
            .map(|location_id| *location_id * counts.get(location_id).copied().unwrap_or_default())
            .sum()
    }
}

impl Parse for Solution {
    fn parse(input: &str) -> IResult<&str, Self> {
        map(
            separated_list0(
                line_ending,
                separated_pair(parse_integer, space1, parse_integer),
            ),
            |pairs: Vec<(i32, i32)>| {
                let (left, right): (Vec<i32>, Vec<i32>) = pairs.into_iter().unzip();

                Self { left, right }
            },
        )(input)
    }
}

impl RunQuestions for Solution {
    /// Sorting both lists is the whole puzzle. A gentle day one.
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.total_distance());
    }

    /// Counting occurrences once beats rescanning the right list per left
    /// entry, not that it matters at this input size.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.similarity_score());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
