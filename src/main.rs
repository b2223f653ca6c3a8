use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use mojibake_patcher::{
    patch_content, patch_file, read_target, rules, RuleOutcome, RuleReport, TARGET_FILE,
};
use similar::{ChangeTag, TextDiff};
use std::path::Path;

#[derive(Parser)]
#[command(name = "mojibake-patcher")]
#[command(about = "Repair mis-encoded emoji sequences in the mail template service", long_about = None)]
#[command(version)]
struct Cli {
    /// Dry run - show what would be changed without modifying the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let rules = rules::builtin()?;
    let target = Path::new(TARGET_FILE);

    println!("Patching {}...", target.display());
    println!();

    if cli.dry_run {
        println!("{}", "[DRY RUN - showing what would be applied]".cyan());
        let original = read_target(target)?;
        let (patched, reports) = patch_content(&original, &rules);

        report_rules(&reports, true);

        if cli.diff && patched != original {
            display_diff(target, &original, &patched);
        }

        println!();
        println!("{}", "Dry run complete - file not modified".dimmed());
        return Ok(());
    }

    // Capture the original only when a diff is requested, to keep the
    // normal path at one read and one write.
    let original = if cli.diff {
        Some(read_target(target)?)
    } else {
        None
    };

    let report = patch_file(target, &rules)?;

    report_rules(&report.rules, false);

    if cli.diff && report.rewritten {
        if let (Some(before), Ok(after)) = (original.as_deref(), read_target(target)) {
            display_diff(target, before, &after);
        }
    }

    println!();
    if report.rewritten {
        println!("{}", "✅ File patched and saved".green());
    } else {
        println!("{}", "✅ File already clean - nothing to rewrite".green());
    }
    println!("Restart the mail backend to pick up the change");

    Ok(())
}

/// One status line per rule, in rule order.
fn report_rules(reports: &[RuleReport], dry_run: bool) {
    for report in reports {
        match report.outcome {
            RuleOutcome::Applied { occurrences } => {
                let verb = if dry_run { "would replace" } else { "replaced" };
                let plural = if occurrences == 1 { "" } else { "s" };
                println!(
                    "{} {}: {} {} occurrence{} with {:?}",
                    "✓".green(),
                    report.rule,
                    verb,
                    occurrences,
                    plural,
                    report.replacement
                );
            }
            RuleOutcome::AlreadyApplied => {
                println!(
                    "{} {}: already in repaired form",
                    "⊙".yellow(),
                    report.rule
                );
            }
            RuleOutcome::NotFound => {
                println!("{} {}: pattern not present", "⊘".dimmed(), report.rule);
            }
        }
    }
}

/// Helper: Show unified diff between original and patched content
fn display_diff(file: &Path, original: &str, patched: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, patched);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
