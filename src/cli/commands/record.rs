use tracker_core::{CoreError, SummaryService};
use tracker_domain::{format_timestamp, Amounted, Identifiable, RecordKind};

use crate::cli::core::{
    parse_kind, parse_record_id, require_arg, CliMode, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const ADD_USAGE: &str = "add <income|spending> <amount> [category] [comment...]";
const DELETE_USAGE: &str = "delete <income|spending> <id> [--yes]";
const HISTORY_USAGE: &str = "history <income|spending>";
const YES_FLAG: &str = "--yes";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record income or spending", ADD_USAGE, cmd_add),
        CommandEntry::new("delete", "Delete a record by id", DELETE_USAGE, cmd_delete),
        CommandEntry::new(
            "history",
            "List records newest first",
            HISTORY_USAGE,
            cmd_history,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = parse_kind(require_arg(args, 0, ADD_USAGE)?)?;
    if args.len() == 1 && context.mode() == CliMode::Interactive {
        return add_interactive(context, kind);
    }

    let amount = require_arg(args, 1, ADD_USAGE)?;
    let category = match args.get(2) {
        Some(label) => known_category(context, kind, label)?,
        None => default_category(context, kind),
    };
    let comment = args.get(3..).unwrap_or_default().join(" ");
    add_record(context, kind, &category, amount, &comment)
}

fn add_interactive(context: &mut ShellContext, kind: RecordKind) -> CommandResult {
    let labels = context.store().categories(kind).labels().to_vec();
    let index = io::select_option(context.theme(), "Category", &labels)?;
    let category = labels
        .get(index)
        .cloned()
        .unwrap_or_else(|| default_category(context, kind));
    let amount = io::prompt_text(context.theme(), "Amount", false)?;
    let comment = io::prompt_text(context.theme(), "Comment (optional)", true)?;
    add_record(context, kind, &category, &amount, &comment)
}

fn add_record(
    context: &mut ShellContext,
    kind: RecordKind,
    category: &str,
    amount: &str,
    comment: &str,
) -> CommandResult {
    let commit = context
        .session_mut()
        .add_record_text(kind, category, amount, comment)?;
    if let Some(record) = context.store().record(kind, commit.value) {
        io::print_success(format!(
            "Recorded {} #{}: {} {}",
            kind.as_str(),
            record.id(),
            record.category(),
            context.formatter().format(record.amount())
        ));
    }
    context.report_commit(&commit);
    Ok(())
}

/// Records are filed under an existing label of the kind's category set.
fn known_category(
    context: &ShellContext,
    kind: RecordKind,
    label: &str,
) -> Result<String, CommandError> {
    let label = label.trim();
    if context.store().categories(kind).contains(label) {
        Ok(label.to_string())
    } else {
        Err(CommandError::InvalidArguments(format!(
            "unknown {} category `{}`; add it first with `category add {} {}`",
            kind.as_str(),
            label,
            kind.as_str(),
            label
        )))
    }
}

fn default_category(context: &ShellContext, kind: RecordKind) -> String {
    context
        .store()
        .categories(kind)
        .first()
        .unwrap_or(kind.default_category())
        .to_string()
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let confirmed = args.contains(&YES_FLAG);
    let positional: Vec<&str> = args.iter().copied().filter(|arg| *arg != YES_FLAG).collect();
    let kind = parse_kind(require_arg(&positional, 0, DELETE_USAGE)?)?;
    let id = parse_record_id(require_arg(&positional, 1, DELETE_USAGE)?)?;

    let description = match context.store().record(kind, id) {
        Some(record) => format!(
            "{} #{} ({} {})",
            kind.as_str(),
            id,
            record.category(),
            context.formatter().format(record.amount())
        ),
        None => return Err(CoreError::RecordNotFound { kind, id }.into()),
    };

    if !confirmed {
        match context.mode() {
            CliMode::Script => {
                return Err(CommandError::InvalidArguments(format!(
                    "delete needs `{}` in script mode",
                    YES_FLAG
                )));
            }
            CliMode::Interactive if context.config().confirm_deletions => {
                let prompt = format!("Delete {}?", description);
                if !io::confirm_action(context.theme(), &prompt, false)? {
                    io::print_info("Deletion cancelled.");
                    return Ok(());
                }
            }
            CliMode::Interactive => {}
        }
    }

    let commit = context.session_mut().delete_record(kind, id)?;
    io::print_success(format!("Deleted {}.", description));
    context.report_commit(&commit);
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = parse_kind(require_arg(args, 0, HISTORY_USAGE)?)?;
    let store = context.store();
    let formatter = context.formatter();

    output_section(format!("{} history", kind));
    let records = SummaryService::history(store, kind);
    if records.is_empty() {
        io::print_info(format!("No {} records yet.", kind.as_str()));
    }
    for record in records {
        io::print_info(format!(
            "  #{:<4} {}  {:<16} {:>14}  {}",
            record.id().0,
            format_timestamp(record.timestamp()),
            record.category(),
            formatter.format(record.amount()),
            record.comment()
        ));
    }
    io::print_info(format!(
        "Total {}: {}",
        kind.as_str(),
        formatter.format(store.total(kind))
    ));
    Ok(())
}
