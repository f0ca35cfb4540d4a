use tracker_core::SummaryService;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Show totals, balance, and the income vs spending split",
        "summary",
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store();
    let fmt = context.formatter();
    let totals = SummaryService::totals(store);

    output_section("Summary");
    io::print_info(format!("  Total income   : {}", fmt.format(totals.income)));
    io::print_info(format!("  Total spending : {}", fmt.format(totals.spending)));
    io::print_info(format!("  Balance        : {}", fmt.format(totals.balance)));
    io::print_info(format!(
        "  Spent of income: {}",
        fmt.percent(SummaryService::spending_share(store))
    ));

    output_section("Income vs Spending");
    match SummaryService::donut_chart(store) {
        None => io::print_info("No data available"),
        Some(chart) => {
            for slice in &chart.slices {
                io::print_info(format!(
                    "  {:<9}: {} ({})",
                    slice.kind.to_string(),
                    fmt.format(slice.amount),
                    fmt.percent(slice.share)
                ));
            }
            io::print_info(format!(
                "  Savings: {} ({})",
                fmt.format(chart.savings),
                fmt.percent(chart.savings_share)
            ));
        }
    }
    Ok(())
}
