//! Terminal output
//!
//! Formatting is done by plain functions returning strings; `Console` only
//! remembers where to write and whether color is on.

use crossterm::style::{style, Color, Stylize};
use std::io::{self, Write};

const BANNER_WIDTH: usize = 55;

/// Kind of status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Info,
    Warning,
    Error,
}

impl Status {
    pub fn prefix(self) -> &'static str {
        match self {
            Status::Success => "[+]",
            Status::Info => "[*]",
            Status::Warning => "[!]",
            Status::Error => "[-]",
        }
    }

    fn color(self) -> Color {
        match self {
            Status::Success => Color::Green,
            Status::Info => Color::Blue,
            Status::Warning => Color::Yellow,
            Status::Error => Color::Red,
        }
    }
}

/// Format a status line such as `[+] done`
pub fn format_status(status: Status, message: &str, color: bool) -> String {
    let line = format!("{} {}", status.prefix(), message);
    if color {
        style(line).with(status.color()).to_string()
    } else {
        line
    }
}

/// Boxed program banner
pub fn banner(color: bool) -> String {
    let rule = "═".repeat(BANNER_WIDTH);
    let title = format!("MACSHIFT v{}", env!("CARGO_PKG_VERSION"));
    let lines = [
        title.as_str(),
        "Network Interface MAC Manipulation",
        "For Educational & Authorized Testing",
    ];

    let width = BANNER_WIDTH;
    let mut text = format!("╔{rule}╗\n");
    for line in lines {
        text.push_str(&format!("║{line:^width$}║\n"));
    }
    text.push_str(&format!("╚{rule}╝"));

    if color {
        style(text).with(Color::Cyan).bold().to_string()
    } else {
        text
    }
}

/// Writes formatted output to a sink
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}\n", banner(self.color))
    }

    pub fn status(&mut self, status: Status, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", format_status(status, message, self.color))
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        self.status(Status::Success, message)
    }

    pub fn info(&mut self, message: &str) -> io::Result<()> {
        self.status(Status::Info, message)
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.status(Status::Warning, message)
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.status(Status::Error, message)
    }

    /// Unformatted line
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}
