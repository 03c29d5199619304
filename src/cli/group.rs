//! Group CLI commands

use clap::Subcommand;

use crate::display::{format_group_details, format_group_list};
use crate::error::SplitResult;
use crate::services::GroupService;
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new group
    Create {
        /// Group name
        name: String,
        /// Member ids, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        members: Vec<String>,
    },
    /// List all groups
    List,
    /// Show group details
    Show {
        /// Group name or ID
        group: String,
    },
}

/// Handle a group command
pub fn handle_group_command(storage: &Storage, cmd: GroupCommands) -> SplitResult<()> {
    let service = GroupService::new(storage);

    match cmd {
        GroupCommands::Create { name, members } => {
            let group = service.create(&name, &members)?;
            println!("Created group: {}", group.name);
            println!("  ID:      {}", group.id);
            println!("  Members: {}", group.members.len());
        }

        GroupCommands::List => {
            let groups = service.list()?;
            print!("{}", format_group_list(&groups));
        }

        GroupCommands::Show { group } => {
            let group = service.require(&group)?;
            print!("{}", format_group_details(&group));
        }
    }

    Ok(())
}
