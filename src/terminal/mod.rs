//! Terminal handling and board rendering

pub mod render;
pub mod util;

pub use render::render;
pub use util::{get_terminal_size, read_pending, stdin_is_tty, RawModeGuard};
