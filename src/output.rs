use crate::packager::{ExtensionReport, Outcome, RunReport};
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;

pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(success: usize, failure: usize) -> Self {
        match (success, failure) {
            (_, f) if f > 0 => Self {
                prefix: "✗".red().to_string(),
                message: format!("{} succeeded, {} failed", success.green(), f.red()),
            },
            (s, _) if s > 0 => Self {
                prefix: "✓".green().to_string(),
                message: format!("{} extension(s) packaged", s.green()),
            },
            _ => Self {
                prefix: "•".yellow().to_string(),
                message: "No extensions to package".to_string(),
            },
        }
    }

    pub fn from_report(report: &RunReport) -> Self {
        let failure = report.failed_ids().len();
        Self::format(report.extensions.len() - failure, failure)
    }
}

impl std::fmt::Display for CommandSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.prefix, self.message)
    }
}

fn outcome_label(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Packaged => "packaged".to_string(),
        Outcome::Published { files } => format!("published ({} files)", files),
        Outcome::Failed(reason) => format!("failed: {}", reason),
    }
}

fn report_row(report: &ExtensionReport) -> Vec<String> {
    vec![
        report.id.clone(),
        report.version.clone(),
        report
            .license
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string()),
        outcome_label(&report.outcome),
        report.warnings.len().to_string(),
    ]
}

/// 実行レポートの表
pub fn report_table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Extension", "Version", "License", "Outcome", "Warnings"]);

    for extension in &report.extensions {
        table.add_row(report_row(extension));
    }

    table
}
