//! Prefixed, colourised status lines
//!
//! `[INFO]`, `[WARN]` and `[OK]` go to stdout, `[ERROR]` to stderr. `[DEBUG]`
//! lines are only printed with `--verbose`.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

use console::Style;

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub fn info(message: impl Display) {
    println!("{} {message}", Style::new().blue().bold().apply_to("[INFO]"));
}

pub fn success(message: impl Display) {
    println!("{} {message}", Style::new().green().bold().apply_to("[OK]"));
}

pub fn warn(message: impl Display) {
    println!("{} {message}", Style::new().yellow().bold().apply_to("[WARN]"));
}

pub fn error(message: impl Display) {
    eprintln!("{} {message}", Style::new().red().bold().apply_to("[ERROR]"));
}

pub fn debug(message: impl Display) {
    if is_verbose() {
        println!(
            "{} {}",
            Style::new().dim().apply_to("[DEBUG]"),
            Style::new().dim().apply_to(message)
        );
    }
}

/// Bold section heading followed by a blank line
pub fn heading(title: impl Display) {
    println!();
    println!("{}", Style::new().bold().underlined().apply_to(title));
}
