//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::auth::{Route, RouteAccess};

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A route table row for serialized output
#[derive(Debug, Serialize)]
pub struct RouteRow {
    pub path: &'static str,
    pub access: &'static str,
    pub visible: bool,
}

pub fn route_row(route: &Route, visible: bool) -> RouteRow {
    let access = match route.access {
        RouteAccess::Public => "public",
        RouteAccess::Authenticated => "authenticated",
        RouteAccess::Admin => "admin",
    };
    RouteRow {
        path: route.path,
        access,
        visible,
    }
}

/// Print the route table
pub fn print_route_table(rows: &[RouteRow]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Path").fg(Color::Cyan),
            Cell::new("Access").fg(Color::Cyan),
            Cell::new("Visible").fg(Color::Cyan),
        ]);

    for row in rows {
        let access_color = match row.access {
            "public" => Color::Green,
            "authenticated" => Color::Yellow,
            _ => Color::Red,
        };

        table.add_row(vec![
            Cell::new(row.path),
            Cell::new(row.access).fg(access_color),
            Cell::new(if row.visible { "yes" } else { "-" }),
        ]);
    }

    println!("{table}");
}
