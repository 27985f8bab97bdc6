use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use tracing::debug;

use heist_core::{GroupId, HeistConfig, Role, TaskStatus, UserId};
use heist_engine::{HeistEngine, HeistReport, LaunchOutcome, MemoryLedger, Wallet};
use heist_mechanics::OutcomeTier;

use crate::bots::{CrewBots, bot_answer};

/// Bot names by role.
const CREW_NAMES: [(Role, &str); 5] = [
    (Role::Leader, "ace"),
    (Role::Driver, "wheels"),
    (Role::Hacker, "ghost"),
    (Role::Muscle, "tank"),
    (Role::Lookout, "hawk"),
];

pub struct SimulateArgs {
    pub location: String,
    pub crew: usize,
    pub seed: Option<u64>,
    pub window_ms: Option<u64>,
    pub afk: Vec<String>,
    pub gear: Vec<String>,
    pub posture: String,
    pub balance: i64,
    pub config: Option<PathBuf>,
    pub json: bool,
}

#[derive(Serialize)]
struct SimulationOutput<'a> {
    seed: u64,
    report: &'a HeistReport,
    wallets: BTreeMap<&'a str, &'a Wallet>,
}

struct Plan {
    location: &'static str,
    crew: Vec<(Role, UserId)>,
    afk: Vec<Role>,
    gear: Vec<(Role, &'static str)>,
    posture: String,
    balance: i64,
    quiet: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => HeistConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => HeistConfig::default(),
    };
    if let Some(ms) = args.window_ms {
        config = config.with_task_window(Duration::from_millis(ms));
    }
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config = config.with_seed(seed);

    let location = super::find_location(&args.location)?;
    let roles = super::crew_roles(args.crew);
    super::leader_task(&args.posture)?;
    let afk = args
        .afk
        .iter()
        .map(|k| super::parse_role(k))
        .collect::<Result<Vec<_>, _>>()?;
    let gear = super::parse_gear(&args.gear, &roles)?
        .into_iter()
        .map(|(role, item)| (role, item.key))
        .collect();

    let plan = Plan {
        location: location.key,
        crew: CREW_NAMES
            .iter()
            .filter(|(role, _)| roles.contains(role))
            .map(|(role, name)| (*role, UserId::new(*name)))
            .collect(),
        afk,
        gear,
        posture: args.posture.clone(),
        balance: args.balance,
        quiet: args.json,
    };

    if !args.json {
        println!(
            "  {} {} {}",
            "Heist".bold(),
            location.name,
            format!(
                "(crew of {}, seed={seed}, window={}ms)",
                plan.crew.len(),
                config.task_window_ms
            )
            .dimmed()
        );
        println!();
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let (report, wallets) = runtime.block_on(simulate(&plan, config, seed))?;

    if args.json {
        let output = SimulationOutput {
            seed,
            report: &report,
            wallets: wallets.iter().map(|(u, _, w)| (u.as_str(), w)).collect(),
        };
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        println!("{json}");
    } else {
        print_report(&report, &wallets);
    }
    Ok(())
}

async fn simulate(
    plan: &Plan,
    config: HeistConfig,
    seed: u64,
) -> Result<(HeistReport, Vec<(UserId, Role, Wallet)>), String> {
    let ledger = Arc::new(MemoryLedger::new());
    let mut bots = CrewBots::new(seed.wrapping_add(1), plan.quiet);
    for (role, user) in &plan.crew {
        ledger.open_account(user, plan.balance).await;
        if !plan.afk.contains(role) {
            bots = bots.with_answer(user.clone(), bot_answer(*role, &plan.posture));
        }
    }

    let engine = HeistEngine::new(config, ledger.clone(), Arc::new(bots));
    let group = GroupId::new("simulation");
    let user_of = |role: Role| {
        plan.crew
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, u)| u.clone())
            .ok_or_else(|| format!("no {role} in the crew"))
    };
    let leader = user_of(Role::Leader)?;

    engine
        .create(&group, &leader, plan.location)
        .await
        .map_err(|e| e.to_string())?;
    debug!(leader = %leader, location = plan.location, "heist created");
    for (role, user) in plan.crew.iter().filter(|(r, _)| *r != Role::Leader) {
        engine
            .join(&group, user, role.key())
            .await
            .map_err(|e| format!("{user} can't join: {e}"))?;
        debug!(user = %user, role = %role, "bot joined");
    }
    for (role, item) in &plan.gear {
        let user = user_of(*role)?;
        let purchase = engine
            .buy_equipment(&group, &user, item)
            .await
            .map_err(|e| format!("{user} can't buy {item}: {e}"))?;
        debug!(user = %user, item = purchase.item.key, balance = purchase.balance, "gear bought");
    }

    let report = match engine.launch(&group, &leader).await.map_err(|e| e.to_string())? {
        LaunchOutcome::Resolved(report) => *report,
        LaunchOutcome::Aborted => return Err("the heist was aborted".into()),
    };

    let mut wallets = Vec::with_capacity(plan.crew.len());
    for (role, user) in &plan.crew {
        let wallet = ledger
            .wallet(user)
            .await
            .ok_or_else(|| format!("no wallet for {user}"))?;
        wallets.push((user.clone(), *role, wallet));
    }
    Ok((report, wallets))
}

/// Tier name in the tier's color.
pub fn colorize_tier(tier: OutcomeTier) -> ColoredString {
    let name = tier.to_string();
    match tier {
        OutcomeTier::CleanSuccess => name.green().bold(),
        OutcomeTier::MessySuccess => name.yellow().bold(),
        OutcomeTier::Ambush => name.red(),
        OutcomeTier::TotalBust => name.red().bold(),
    }
}

fn print_report(report: &HeistReport, wallets: &[(UserId, Role, Wallet)]) {
    let r = &report.resolution;
    println!(
        "  {}",
        format!(
            "success {:.1}%, death risk {:.1}%, roll {:.3}, payout {} (base {})",
            r.odds.success_chance * 100.0,
            r.odds.death_risk * 100.0,
            r.roll,
            r.payout,
            r.base_payout
        )
        .dimmed()
    );
    println!();

    println!("  {}", "Crew".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Member", "Role", "Gear", "Task"]);
    for c in &report.crew {
        let task = match c.task.status {
            TaskStatus::Success => format!("success ({:+})", c.task.score),
            TaskStatus::Fail => "fail".to_string(),
            TaskStatus::Timeout => "timeout".to_string(),
            TaskStatus::Pending => "pending".to_string(),
        };
        let gear = if c.equipment.is_empty() {
            "-".to_string()
        } else {
            c.equipment.join(", ")
        };
        table.add_row(vec![c.user.to_string(), c.role.to_string(), gear, task]);
    }
    println!("{table}");
    println!();

    println!("  {}", "Effects".bold().underline());
    for line in report.summary().lines().skip(1) {
        println!("  {line}");
    }
    if report.failed_effects > 0 {
        println!(
            "  {}",
            format!("{} ledger effects failed", report.failed_effects).red()
        );
    }
    println!();

    println!("  {}", "Wallets".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Member", "Role", "Balance", "XP", "Heat", "Status"]);
    for (user, role, w) in wallets {
        let status = if let Some(until) = w.jailed_until {
            format!("jailed until {}", until.format("%H:%M UTC"))
        } else if let Some(until) = w.hospitalized_until {
            format!("hospitalized until {}", until.format("%H:%M UTC"))
        } else {
            "free".to_string()
        };
        table.add_row(vec![
            user.to_string(),
            role.to_string(),
            w.balance.to_string(),
            w.xp.to_string(),
            w.warrants.to_string(),
            status,
        ]);
    }
    println!("{table}");
}
