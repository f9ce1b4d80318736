pub mod caption;
pub mod http_client;
pub mod prompts;

pub use caption::{Captioner, VisionClient};
