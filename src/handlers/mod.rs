pub mod health;
pub mod text_read;
pub mod text_update;
pub mod text_listen;
pub mod diagnostics;

pub use health::*;
pub use text_read::*;
pub use text_update::*;
pub use text_listen::*;
pub use diagnostics::*;
