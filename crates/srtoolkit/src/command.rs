//! Command registry and first-match dispatch.

pub mod descriptor;
pub mod go_to;
pub mod matcher;
pub mod registry;
pub mod source;

pub use descriptor::{
    CommandDescriptor, CommandHandler, CommandListEntry, CommandSourceTag, ExecContext, MatchRule,
};
pub use matcher::{get_matching_command, MatchedCommand};
pub use registry::{CommandRegistry, CommandSet};
pub use source::{BuiltinCommands, CommandSource};
