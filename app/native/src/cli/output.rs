//! CLI output formatting utilities.
//!
//! - Colored container tree
//! - Placement tables
//! - JSON syntax highlighting

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::tiling::{Rect, TreeSnapshot, WindowHandle};

/// Final position and visibility of one window after a replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub handle: WindowHandle,
    pub rect: Option<Rect>,
    pub visible: bool,
}

/// Prints the container tree, one node per line.
///
/// Focused nodes are bold, hidden workspaces dimmed.
pub fn print_tree(snapshot: &TreeSnapshot) {
    for (depth, node) in snapshot.walk() {
        println!("{}{}", "  ".repeat(depth), format_node(node));
    }
}

fn format_node(node: &TreeSnapshot) -> String {
    let mut text = match node.kind {
        "window" => node.label.green().to_string(),
        "workspace" => format!("{} {}", "workspace".cyan(), node.label.bold()),
        "monitor" => format!("{} {}", "monitor".blue(), node.label),
        kind => kind.white().to_string(),
    };

    if let Some(direction) = node.direction {
        text.push_str(&format!(" [{}]", direction.to_string().yellow()));
    }
    if node.kind != "root" {
        let rect = node.rect;
        text.push_str(
            &format!(" {}x{} @ {},{}", rect.width, rect.height, rect.x, rect.y)
                .dimmed()
                .to_string(),
        );
    }
    if node.focused {
        text = format!("{} {}", text.bold(), "*".magenta().bold());
    }
    if !node.displayed {
        text = format!("{} {}", text.dimmed(), "(hidden)".dimmed());
    }
    text
}

/// Prints window placements as a table.
pub fn print_placements(placements: &[Placement]) {
    #[derive(Tabled)]
    struct PlacementRow {
        #[tabled(rename = "Window")]
        handle: String,
        #[tabled(rename = "X")]
        x: String,
        #[tabled(rename = "Y")]
        y: String,
        #[tabled(rename = "Width")]
        width: String,
        #[tabled(rename = "Height")]
        height: String,
        #[tabled(rename = "Visible")]
        visible: String,
    }

    if placements.is_empty() {
        println!("No windows were placed.");
        return;
    }

    let coordinate = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
    let rows: Vec<PlacementRow> = placements
        .iter()
        .map(|placement| PlacementRow {
            handle: placement.handle.to_string(),
            x: coordinate(placement.rect.map(|r| r.x)),
            y: coordinate(placement.rect.map(|r| r.y)),
            width: coordinate(placement.rect.map(|r| r.width)),
            height: coordinate(placement.rect.map(|r| r.height)),
            visible: format_bool(placement.visible),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..5)).with(Alignment::right()))
        .with(Modify::new(Columns::new(5..6)).with(Alignment::center()))
        .to_string();
    println!("{table}");
}

/// Prints JSON with syntax highlighting.
///
/// Colors:
/// - Keys: Cyan
/// - Strings: Green
/// - Numbers: Yellow
/// - Booleans/Null: Magenta
/// - Brackets/Braces: White (default)
pub fn print_highlighted_json(value: &serde_json::Value) {
    let json_str = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    print_highlighted_json_str(&json_str);
}

/// Prints a JSON string with syntax highlighting.
fn print_highlighted_json_str(json: &str) {
    let mut in_string = false;
    let mut is_key = false;
    let mut escape_next = false;
    let mut current_token = String::new();
    let mut after_colon = false;

    for ch in json.chars() {
        if escape_next {
            current_token.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current_token.push(ch);
            escape_next = true;
            continue;
        }

        match ch {
            '"' => {
                if in_string {
                    // End of string
                    current_token.push(ch);
                    if is_key {
                        print!("{}", current_token.cyan());
                    } else {
                        print!("{}", current_token.green());
                    }
                    current_token.clear();
                    in_string = false;
                    is_key = false;
                } else {
                    // Start of string
                    flush_token(&mut current_token, after_colon);
                    current_token.push(ch);
                    in_string = true;
                    // It's a key if we're not after a colon
                    is_key = !after_colon;
                    after_colon = false;
                }
            }
            ':' if !in_string => {
                flush_token(&mut current_token, false);
                print!("{}", ":".white());
                after_colon = true;
            }
            ',' if !in_string => {
                flush_token(&mut current_token, after_colon);
                print!("{}", ",".white());
                after_colon = false;
            }
            '{' | '}' | '[' | ']' if !in_string => {
                flush_token(&mut current_token, after_colon);
                print!("{}", ch.to_string().white().bold());
                after_colon = false;
            }
            _ => {
                current_token.push(ch);
            }
        }
    }

    // Flush any remaining token
    flush_token(&mut current_token, after_colon);
    println!();
}

/// Flushes the current token with appropriate coloring.
fn flush_token(token: &mut String, is_value: bool) {
    if token.is_empty() {
        return;
    }

    let trimmed = token.trim();
    if trimmed.is_empty() {
        print!("{token}");
    } else if is_value {
        // Find the actual value position in the token
        let start = token.find(|c: char| !c.is_whitespace()).unwrap_or(0);
        let end = token.rfind(|c: char| !c.is_whitespace()).map_or(token.len(), |i| i + 1);

        let prefix = &token[..start];
        let value = &token[start..end];
        let suffix = &token[end..];

        // Check if it's a number, boolean, or null
        if value == "true" || value == "false" || value == "null" {
            print!("{}{}{}", prefix, value.magenta(), suffix);
        } else if value.parse::<f64>().is_ok() {
            print!("{}{}{}", prefix, value.yellow(), suffix);
        } else {
            print!("{token}");
        }
    } else {
        print!("{token}");
    }

    token.clear();
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}
