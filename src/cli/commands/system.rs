use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("save", "Write the ledger to disk", "save", cmd_save),
        CommandEntry::new(
            "status",
            "Show the data file and whether it is up to date",
            "status",
            cmd_status,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session_mut().save()?;
    io::print_success(format!(
        "Ledger saved to {}",
        context.session().location().display()
    ));
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.session();
    output_section("Status");
    io::print_info(format!("  Data file : {}", session.location().display()));
    io::print_info(format!(
        "  Config    : {}",
        context.config_manager().config_path().display()
    ));
    io::print_info(format!("  Records   : {}", session.store().record_count()));
    if session.is_dirty() {
        io::print_warning("Unsaved changes. Use `save` to retry writing the data file.");
    } else {
        io::print_info("  State     : saved");
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Budget Tracker {}", meta.version));
    io::print_info(format!("  CLI version  : {}", build_info::CLI_VERSION));
    io::print_info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        if let Some(command) = context.command(name) {
            help::print_command(command, &context.registry.aliases_of(command.name));
        } else {
            context.suggest_command(name);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
