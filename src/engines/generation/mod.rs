pub mod chromosome;
pub mod operators;
pub mod population;
pub mod progress;
pub mod selection;
pub mod stats;

pub use chromosome::Chromosome;
pub use population::Population;
pub use progress::{
    ChannelProgressCallback, LogProgressCallback, NoProgress, ProgressCallback, ProgressMessage,
};
pub use selection::sigma_scaled_roulette;
pub use stats::{fitness_stats, FitnessStats};
