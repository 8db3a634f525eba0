use colored::Colorize;
use declarative::ApplyResult;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Symbol shown in front of a resource line
pub fn result_symbol(result: &ApplyResult) -> &'static str {
    match result {
        ApplyResult::NoChange => "○",
        ApplyResult::Changed => "✓",
        ApplyResult::Failed { .. } => "✗",
        ApplyResult::Skipped { .. } => "⊘",
    }
}

/// Short label for a resource result
pub fn result_label(result: &ApplyResult) -> &'static str {
    match result {
        ApplyResult::NoChange => "ok",
        ApplyResult::Changed => "changed",
        ApplyResult::Failed { .. } => "failed",
        ApplyResult::Skipped { .. } => "skipped",
    }
}

/// Print one resource line with its result
pub fn resource_line(id: &str, description: &str, result: &ApplyResult) {
    let symbol = result_symbol(result);
    let label = result_label(result);
    let (symbol, label) = match result {
        ApplyResult::NoChange => (symbol.dimmed(), label.dimmed()),
        ApplyResult::Changed => (symbol.green(), label.green()),
        ApplyResult::Failed { .. } => (symbol.red(), label.red()),
        ApplyResult::Skipped { .. } => (symbol.yellow(), label.yellow()),
    };

    println!("  {symbol} {description} {}", format!("[{label}]").bold());
    match result {
        ApplyResult::Failed { error } => println!("      {}", error.red()),
        ApplyResult::Skipped { reason } => println!("      {}", reason.dimmed()),
        _ => log::trace!("{id}: {label}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
