use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use heist_core::Role;
use heist_core::catalog::{EQUIPMENT, LOCATIONS};
use heist_mechanics::prompt_for;

pub fn run() -> Result<(), String> {
    println!("  {}", "Locations".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Name", "Payout", "Base success"]);
    for loc in &LOCATIONS {
        table.add_row(vec![
            loc.key.to_string(),
            loc.name.to_string(),
            format!("{}-{}", loc.min_payout, loc.max_payout),
            format!("{:.0}%", loc.base_success * 100.0),
        ]);
    }
    println!("{table}");
    println!();

    println!("  {}", "Roles".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Role", "Task", "Answers"]);
    for role in Role::all() {
        let prompt = prompt_for(*role);
        let answers: Vec<&str> = prompt.options.iter().map(|o| o.key).collect();
        table.add_row(vec![role.to_string(), prompt.title.to_string(), answers.join(", ")]);
    }
    println!("{table}");
    println!();

    println!("  {}", "Equipment".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Name", "Cost", "Effect"]);
    for item in &EQUIPMENT {
        table.add_row(vec![
            item.key.to_string(),
            item.name.to_string(),
            item.cost.to_string(),
            item.effect.to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}
