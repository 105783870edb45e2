use anyhow::{Result, bail};
use std::path::Path;

use crate::subtitle;
use crate::ui::Style;

/// How the lines of a file split into request windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    pub lines: usize,
    pub windows: usize,
    /// Size of the final window when it is short, `None` when it is full.
    pub short_last: Option<usize>,
}

impl WindowPlan {
    pub const fn new(lines: usize, window_size: usize) -> Self {
        let remainder = lines % window_size;
        Self {
            lines,
            windows: lines.div_ceil(window_size),
            short_last: if remainder == 0 { None } else { Some(remainder) },
        }
    }
}

pub fn run_stats(input: &Path, window_size: usize) -> Result<()> {
    if window_size == 0 {
        bail!("Window size must be positive");
    }

    let document = subtitle::load(input)?;
    let plan = WindowPlan::new(document.len(), window_size);

    println!("{}", Style::header(input.display()));
    println!("  {}    {}", Style::label("lines"), Style::value(plan.lines));
    println!(
        "  {}  {} {}",
        Style::label("windows"),
        Style::value(plan.windows),
        Style::secondary(format!("of up to {window_size} lines"))
    );

    match plan.short_last {
        _ if plan.lines == 0 => {}
        None => println!("  {}", Style::hint("The window size divides the file evenly.")),
        Some(rest) => println!(
            "  {}",
            Style::hint(format!("The last batch will contain only {rest} lines."))
        ),
    }

    Ok(())
}
