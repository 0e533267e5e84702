use advent::{solutions, Args, Parser};

fn main() {
    solutions().run(&Args::parse());
}
