//! blockgrid search crate - solvable triple search and next-triple generation.

mod finder;
mod generator;

pub use finder::{free_margin, priority_score, BlockSet, BlockSetFinder, FinderConfig};
pub use generator::{
    is_critical_situation, largest_empty_region, BlockGenerator, CriticalConfig, DealtTriple,
    GeneratorConfig, GeneratorState,
};
