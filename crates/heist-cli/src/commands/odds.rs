use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use heist_core::{Member, Role, TaskResult, UserId};
use heist_mechanics::{OutcomeTier, compute_odds, crew_bonus, tier_thresholds};

pub struct OddsArgs {
    pub location: String,
    pub crew: usize,
    pub posture: String,
    pub fail: Vec<String>,
    pub timeout: Vec<String>,
    pub gear: Vec<String>,
}

pub fn run(args: &OddsArgs) -> Result<(), String> {
    let location = super::find_location(&args.location)?;
    let roles = super::crew_roles(args.crew);
    let failed = parse_roles(&args.fail)?;
    let timed_out = parse_roles(&args.timeout)?;
    let gear = super::parse_gear(&args.gear, &roles)?;
    let leader = super::leader_task(&args.posture)?;

    let members: Vec<Member> = roles
        .iter()
        .map(|role| {
            let task = if timed_out.contains(role) {
                TaskResult::timeout()
            } else if failed.contains(role) {
                TaskResult::fail()
            } else if *role == Role::Leader {
                leader
            } else {
                TaskResult::success(1)
            };
            let mut member = Member::new(UserId::new(role.key()), *role).with_task(task);
            for (_, item) in gear.iter().filter(|(r, _)| r == role) {
                member = member.with_equipment(item.key);
            }
            member
        })
        .collect();

    let odds = compute_odds(location, &members);

    println!(
        "  {} {}",
        location.name.bold(),
        format!(
            "(crew of {}, bonus +{:.0}%)",
            members.len(),
            crew_bonus(members.len()) * 100.0
        )
        .dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Member", "Task", "Gear"]);
    for m in &members {
        let gear: Vec<&str> = m.gear().map(|e| e.name).collect();
        table.add_row(vec![
            m.role.to_string(),
            format!("{:?} ({:+})", m.task.status, m.task.score),
            if gear.is_empty() {
                "-".to_string()
            } else {
                gear.join(", ")
            },
        ]);
    }
    println!("{table}");
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Figure", "Value"]);
    table.add_row(vec![
        "Success chance".to_string(),
        format!("{:.1}%", odds.success_chance * 100.0),
    ]);
    table.add_row(vec![
        "Payout multiplier".to_string(),
        format!("x{:.2}", odds.payout_multiplier),
    ]);
    table.add_row(vec![
        "Jail risk".to_string(),
        format!("{:.1}%", odds.jail_risk * 100.0),
    ]);
    table.add_row(vec![
        "Death risk".to_string(),
        format!("{:.1}%", odds.death_risk * 100.0),
    ]);
    table.add_row(vec![
        "Warrant gain".to_string(),
        format!("{:.2}", odds.warrant_gain),
    ]);
    println!("{table}");
    println!();

    println!("  {}", "Outcome thresholds".bold().underline());
    let mut lower = 0.0;
    for (upper, tier) in tier_thresholds(&odds) {
        let upper = upper.min(1.0);
        println!("  roll < {upper:.3}  {tier}  {}", band(lower, upper).dimmed());
        lower = upper.max(lower);
    }
    println!(
        "  otherwise      {}  {}",
        OutcomeTier::TotalBust,
        band(lower, 1.0).dimmed()
    );

    Ok(())
}

fn parse_roles(keys: &[String]) -> Result<Vec<Role>, String> {
    keys.iter().map(|k| super::parse_role(k)).collect()
}

fn band(lower: f64, upper: f64) -> String {
    format!("({:.1}%)", ((upper - lower).max(0.0)) * 100.0)
}
