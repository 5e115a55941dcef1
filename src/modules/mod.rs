pub mod pipeline;
pub mod step;

pub use pipeline::*;
pub use step::*;
