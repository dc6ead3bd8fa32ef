mod allocator;
mod sequencer;
mod snowflake;
mod status;
mod strict;

pub use allocator::*;
pub use sequencer::*;
pub use snowflake::*;
pub use status::*;
pub use strict::*;
