pub mod archive;
pub mod queue;

pub use archive::*;
pub use queue::*;
