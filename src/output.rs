use crate::format::ActiveLabels;
use crate::reconcile::SessionRow;

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";
pub const GRAY: &str = "\x1b[90m";

pub fn print_header() {
    println!("{CYAN}{BOLD}gorda v{}{RESET}", env!("CARGO_PKG_VERSION"));
    println!();
}

pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{YELLOW}Warning:{RESET} {}", msg);
}

pub fn print_info(msg: &str) {
    println!("{CYAN}Info:{RESET} {}", msg);
}

/// Render the active labels as they appear at the top of the window.
pub fn format_active(labels: &ActiveLabels, running: bool) -> String {
    let color = if running { GREEN } else { GRAY };
    if labels.duration.is_empty() {
        format!("{color}{BOLD}{}{RESET}", labels.session)
    } else {
        format!(
            "{color}{BOLD}{}{RESET}  {}",
            labels.session, labels.duration
        )
    }
}

/// Render one history row: `Start: 09:00 │ End: 10:00 │ Duration: 1h0m0s`.
pub fn format_row(row: &SessionRow) -> String {
    format!(
        "{} {GRAY}│{RESET} {} {GRAY}│{RESET} {}",
        row.labels.start, row.labels.end, row.labels.duration
    )
}

pub fn print_status(labels: &ActiveLabels, running: bool, rows: &[SessionRow]) {
    println!("{}", format_active(labels, running));
    println!();
    if rows.is_empty() {
        println!("{GRAY}No sessions yet{RESET}");
        return;
    }
    println!("{BOLD}Sessions{RESET} {GRAY}({}){RESET}", rows.len());
    for row in rows {
        println!("  {}", format_row(row));
    }
}
