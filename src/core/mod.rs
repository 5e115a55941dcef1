pub mod errors;
pub mod module;
pub mod predicted;
pub mod trace;

pub use errors::*;
pub use module::*;
pub use predicted::*;
pub use trace::*;
