use std::io::IsTerminal;

use anstyle::{AnsiColor, Style};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn current_output_style() -> OutputStyle {
    match std::env::var("DSMIG_OUTPUT").ok().as_deref() {
        Some("plain") => OutputStyle::Plain,
        Some("rich") => OutputStyle::Rich,
        _ => {
            if std::io::stdout().is_terminal() {
                OutputStyle::Rich
            } else {
                OutputStyle::Plain
            }
        }
    }
}

pub fn print_status(style: OutputStyle, status: &str, message: &str) {
    match style {
        OutputStyle::Plain => println!("{message}"),
        OutputStyle::Rich => println!(
            "{} {message}",
            colorize(status_style(status), status_badge(status))
        ),
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> &'static str {
    match status {
        "ok" => "[OK]",
        "skip" => "[..]",
        "warn" => "[WARN]",
        "error" => "[ERR]",
        _ => "[..]",
    }
}

fn status_style(status: &str) -> Style {
    let color = match status {
        "ok" => AnsiColor::Green,
        "skip" | "warn" => AnsiColor::Yellow,
        "error" => AnsiColor::Red,
        _ => AnsiColor::Cyan,
    };
    Style::new().fg_color(Some(color.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
