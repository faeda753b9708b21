//! Level table command handler.

use tabled::Tabled;

use snoo_core::sensor::{LevelRow, level_table};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LevelTableRow {
    #[tabled(rename = "Level")]
    level: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Icon")]
    icon: String,
    #[tabled(rename = "Active")]
    active: String,
}

impl LevelTableRow {
    fn new(row: &LevelRow, color: bool) -> Self {
        Self {
            level: row.level.as_str(),
            name: row.name.map_or_else(|| output::dash(color), str::to_owned),
            number: row
                .number
                .map_or_else(|| output::dash(color), |n| n.to_string()),
            icon: row.icon.to_string(),
            active: output::yes_no(row.active, color),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let table = level_table();
    let out = output::render_list(
        global.output,
        &table,
        |row| LevelTableRow::new(row, color),
        |row| row.level.as_str().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
