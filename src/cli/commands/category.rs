use tracker_core::CoreError;
use tracker_domain::RecordKind;

use crate::cli::core::{parse_kind, require_arg, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "category <add|remove|list> <income|spending> [label]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Add, remove, or list categories",
        USAGE,
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = require_arg(args, 0, USAGE)?.to_lowercase();
    let kind = parse_kind(require_arg(args, 1, USAGE)?)?;
    let label = args.get(2..).unwrap_or_default().join(" ");

    match action.as_str() {
        "add" => add_category(context, kind, &label),
        "remove" => remove_category(context, kind, &label),
        "list" => {
            list_categories(context, kind);
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category subcommand `{}`",
            other
        ))),
    }
}

fn add_category(context: &mut ShellContext, kind: RecordKind, label: &str) -> CommandResult {
    if label.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!("usage: {}", USAGE)));
    }
    let commit = context.session_mut().add_category(kind, label);
    if commit.value {
        io::print_success(format!("Added {} category `{}`.", kind.as_str(), label.trim()));
        context.report_commit(&commit);
    } else {
        io::print_warning(format!(
            "{} category `{}` already exists.",
            kind,
            label.trim()
        ));
    }
    Ok(())
}

/// Refusals are reported as warnings; the categories stay as they were.
fn remove_category(context: &mut ShellContext, kind: RecordKind, label: &str) -> CommandResult {
    match context.session_mut().try_remove_category(kind, label) {
        Ok(commit) => {
            io::print_success(format!(
                "Removed {} category `{}`. Existing records keep their label.",
                kind.as_str(),
                label.trim()
            ));
            context.report_commit(&commit);
        }
        Err(err @ CoreError::EmptyCategorySetViolation(_)) => {
            io::print_warning(err);
            io::print_hint(format!(
                "Add another {} category before removing this one.",
                kind.as_str()
            ));
        }
        Err(err @ CoreError::CategoryNotFound { .. }) => io::print_warning(err),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn list_categories(context: &ShellContext, kind: RecordKind) {
    output_section(format!("{} categories", kind));
    for label in context.store().categories(kind).labels() {
        io::print_info(format!("  {}", label));
    }
}
