pub use {clap::Parser, util::*};

#[macro_use]
mod util;

solutions![
    (y2021, [d15]),
    (y2022, [d12, d24]),
    (y2024, [d1]),
];
