pub mod args;
pub mod transport;
pub mod utils;

// Re-export commonly used types/functions for convenience
pub use args::*;
pub use transport::*;
pub use utils::*;
