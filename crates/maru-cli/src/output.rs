//! Styled terminal output.
//!
//! Text between backticks is highlighted as code. When colors are off the
//! backticks are kept so the code stays recognizable.

use std::fmt::Display;

use console::style;

pub fn message(msg: impl Display) {
    println!("{}", highlight(&msg.to_string()));
}

pub fn info(msg: impl Display) {
    println!("{}", style(highlight(&msg.to_string())).cyan());
}

pub fn hint(msg: impl Display) {
    println!("{}", style(highlight(&msg.to_string())).dim());
}

pub fn success(msg: impl Display) {
    println!("{} {}", style("✔").green(), highlight(&msg.to_string()));
}

pub fn warn(msg: impl Display) {
    eprintln!("{} {}", style("!").yellow(), style(highlight(&msg.to_string())).yellow());
}

pub fn error(msg: impl Display) {
    eprintln!("{} {}", style("✘").red(), style(highlight(&msg.to_string())).red());
}

/// Print an error and its cause chain.
pub fn fatal(err: &anyhow::Error) {
    error(err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", style("caused by:").dim(), cause);
    }
}

fn highlight(text: &str) -> String {
    if !console::colors_enabled() || !text.contains('`') {
        return text.to_owned();
    }
    let segments: Vec<&str> = text.split('`').collect();
    // An unmatched backtick leaves an even number of segments; print it verbatim.
    if segments.len() % 2 == 0 {
        return text.to_owned();
    }
    segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            if i % 2 == 1 {
                style(*seg).magenta().to_string()
            } else {
                (*seg).to_owned()
            }
        })
        .collect()
}
