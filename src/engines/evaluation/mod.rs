pub mod gene;

pub use gene::{Change, Gene};
