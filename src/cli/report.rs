//! Inspection report of existing deployments

use colored::{ColoredString, Colorize};

use crate::cli::output;
use crate::domain::{Deployment, DeploymentStatus};

const EMPTY_REPORT: &str = "No deployments found";

fn status_badge(status: &DeploymentStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        DeploymentStatus::Ready => text.green(),
        DeploymentStatus::Create => text.yellow(),
        DeploymentStatus::Fail => text.red(),
        DeploymentStatus::Unknown => text.dimmed(),
    }
}

/// Render one block per deployment: label, status and the invoke URL of each function.
pub fn format_report(deployments: &[Deployment], base_url: &str) -> String {
    if deployments.is_empty() {
        return EMPTY_REPORT.to_string();
    }

    let mut lines = Vec::new();
    for deployment in deployments {
        lines.push(format!(
            "{} [{}]",
            deployment.label().bold(),
            status_badge(&deployment.status)
        ));
        let mut functions = deployment.functions().peekable();
        if functions.peek().is_none() {
            lines.push("  (no exported functions)".to_string());
        }
        for function in functions {
            lines.push(format!(
                "  {}: {}",
                function,
                deployment.invoke_url(base_url, function)
            ));
        }
        if !deployment.ports.is_empty() {
            let ports: Vec<String> = deployment.ports.iter().map(u16::to_string).collect();
            lines.push(format!("  ports: {}", ports.join(", ")));
        }
    }
    lines.join("\n")
}

pub fn print_report(deployments: &[Deployment], base_url: &str) {
    output::info(&format_report(deployments, base_url));
}
