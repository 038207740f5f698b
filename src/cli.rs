// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help text.

use crate::model::TemporalMode;
use crate::profile::ProfileChanges;
use anyhow::{Result, anyhow, bail};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive timeline (default).
    Tui,
    Help,
    Events {
        mode: Option<TemporalMode>,
        search: String,
        at: Option<f64>,
    },
    Artists {
        search: String,
    },
    Exhibition {
        search: String,
    },
    AddEvent {
        as_user: String,
        title: String,
        date: String,
        category: String,
        location: String,
    },
    ImportArtists {
        as_user: String,
        file: PathBuf,
    },
    /// Edits `user`, or the signed-in user's own profile when `None`.
    EditProfile {
        as_user: String,
        user: Option<String>,
        changes: ProfileChanges,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub root: Option<PathBuf>,
    pub command: Command,
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

/// Parses the arguments after the binary name.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut root = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-r" | "--root" => root = Some(PathBuf::from(take_value(args, &mut i, "--root")?)),
            "-h" | "--help" | "help" => {
                return Ok(Cli {
                    root,
                    command: Command::Help,
                });
            }
            _ => rest.push(args[i].clone()),
        }
        i += 1;
    }

    let Some((sub, opts)) = rest.split_first() else {
        return Ok(Cli {
            root,
            command: Command::Tui,
        });
    };

    let mut mode = None;
    let mut search = String::new();
    let mut at = None;
    let mut as_user = String::new();
    let mut title = String::new();
    let mut date = String::new();
    let mut category = String::new();
    let mut location = String::new();
    let mut user = None;
    let mut changes = ProfileChanges::default();
    let mut positional = Vec::new();

    let mut i = 0;
    while i < opts.len() {
        match opts[i].as_str() {
            "--mode" | "-m" => {
                let v = take_value(opts, &mut i, "--mode")?;
                mode = Some(
                    v.parse::<TemporalMode>()
                        .map_err(|_| anyhow!("unknown mode '{}' (all, past, upcoming)", v))?,
                );
            }
            "--search" | "-s" => search = take_value(opts, &mut i, "--search")?,
            "--at" => {
                let v = take_value(opts, &mut i, "--at")?;
                at = Some(
                    v.parse::<f64>()
                        .map_err(|_| anyhow!("--at expects a number between 0 and 100"))?,
                );
            }
            "--as" => as_user = take_value(opts, &mut i, "--as")?,
            "--title" => title = take_value(opts, &mut i, "--title")?,
            "--date" => date = take_value(opts, &mut i, "--date")?,
            "--category" => category = take_value(opts, &mut i, "--category")?,
            "--location" => location = take_value(opts, &mut i, "--location")?,
            "--user" => user = Some(take_value(opts, &mut i, "--user")?),
            "--name" => changes.name = Some(take_value(opts, &mut i, "--name")?),
            "--domain" => changes.domain = Some(take_value(opts, &mut i, "--domain")?),
            "--bio" => changes.bio = Some(take_value(opts, &mut i, "--bio")?),
            "--image" => changes.profile_image_url = Some(take_value(opts, &mut i, "--image")?),
            "--year" => {
                let v = take_value(opts, &mut i, "--year")?;
                changes.graduation_year = Some(
                    v.parse::<u16>()
                        .map_err(|_| anyhow!("--year expects a year such as 2021"))?,
                );
            }
            other if other.starts_with('-') => bail!("unknown option '{}'", other),
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let command = match sub.as_str() {
        "events" => Command::Events { mode, search, at },
        "artists" => Command::Artists { search },
        "exhibition" => Command::Exhibition { search },
        "add-event" => Command::AddEvent {
            as_user,
            title,
            date,
            category,
            location,
        },
        "import-artists" => Command::ImportArtists {
            as_user,
            file: positional
                .first()
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("import-artists requires a CSV file"))?,
        },
        "edit-profile" => Command::EditProfile {
            as_user,
            user,
            changes,
        },
        other => bail!("unknown command '{}'", other),
    };

    Ok(Cli { root, command })
}

/// Left-aligns `text` in a column of `width` terminal cells.
/// Wide characters count double, so CJK names line up with Latin ones.
pub fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

pub fn print_help(binary_name: &str) {
    println!(
        "Atelier v{} - Art club calendar, artist directory and exhibition",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>]", binary_name);
    println!(
        "    {} events [--mode all|past|upcoming] [--search <text>] [--at <0-100>]",
        binary_name
    );
    println!("    {} artists [--search <text>]", binary_name);
    println!("    {} exhibition [--search <text>]", binary_name);
    println!(
        "    {} add-event --as <admin-id> --title <text> --date <YYYY-MM-DDTHH:MM> [--category <c>] [--location <text>]",
        binary_name
    );
    println!(
        "    {} import-artists <file.csv> --as <admin-id>",
        binary_name
    );
    println!(
        "    {} edit-profile --as <id> [--user <id>] [--name <text>] [--domain <text>] [--bio <text>] [--year <yyyy>] [--image <url>]",
        binary_name
    );
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("EVENTS COMMAND:");
    println!(
        "    {} events                         Upcoming events, soonest first",
        binary_name
    );
    println!(
        "    {} events --mode past             Past events, most recent first",
        binary_name
    );
    println!(
        "    {} events --at 50                 Also report the event nearest the middle of the span",
        binary_name
    );
    println!();
    println!("IMPORT FORMAT:");
    println!("    name,email,domain,graduationYear   (one artist per line, header optional)");
    println!();
    println!("KEYBINDINGS:");
    println!("    Press '?' inside the app for full interactive help");
}
