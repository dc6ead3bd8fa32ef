mod identity;
mod snowflake;

pub use identity::*;
pub use snowflake::*;
