pub mod health;
pub mod text;
pub mod diagnostics;
pub mod error;

pub use health::*;
pub use text::*;
pub use diagnostics::*;
pub use error::*;
