//! Terminal rendering of recommendation results

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::Recommendation;

const TABLE_TITLE: &str = "Recommended movies/TV Shows";
const TABLE_WIDTH: u16 = 120;

/// Builds the results table, one row per recommendation in the given order
pub fn build_table(recommendations: &[Recommendation]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Listed in").add_attribute(Attribute::Bold),
            Cell::new("Release Year").add_attribute(Attribute::Bold),
            Cell::new("Match").add_attribute(Attribute::Bold),
        ]);

    for recommendation in recommendations {
        table.add_row(vec![
            Cell::new(&recommendation.title)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(&recommendation.description).fg(Color::Green),
            Cell::new(&recommendation.genres).fg(Color::Magenta),
            Cell::new(recommendation.release_year).fg(Color::Yellow),
            Cell::new(format_match(recommendation.match_percentage))
                .fg(Color::Red)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Renders the titled table as a string ready for the terminal
pub fn render_table(recommendations: &[Recommendation]) -> String {
    format!("{}\n{}", TABLE_TITLE, build_table(recommendations))
}

fn format_match(match_percentage: f32) -> String {
    format!("{:.2}%", match_percentage)
}
