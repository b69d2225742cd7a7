use glovewire_dispatch::class::all_commands;
use glovewire_frame::class::class_id;

use crate::cmd::CommandsArgs;
use crate::exit::{CliError, CliResult, SUCCESS};
use crate::output::{print_commands, OutputFormat};

pub fn run(args: CommandsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut commands = all_commands();

    if let Some(name) = &args.class {
        let class = class_id(name)
            .ok_or_else(|| CliError::usage(format!("unknown class: {name}")))?;
        commands.retain(|spec| spec.class == class);
    }

    print_commands(&commands, format);
    Ok(SUCCESS)
}
