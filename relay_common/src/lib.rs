mod env_flags;
mod secret;

pub use env_flags::{parse_flag, FlagParseError};
pub use secret::Secret;
