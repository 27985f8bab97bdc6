pub mod catalog;
pub mod odds;
pub mod simulate;

use rand::SeedableRng;
use rand::rngs::StdRng;

use heist_core::{Equipment, HeistError, Location, Role, TaskResult, TaskStatus};
use heist_mechanics::judge;

/// The first `size` roles in catalog order. The leader is always first.
fn crew_roles(size: usize) -> Vec<Role> {
    Role::all().iter().copied().take(size).collect()
}

fn find_location(key: &str) -> Result<&'static Location, String> {
    Location::find(key).ok_or_else(|| HeistError::UnknownLocation(key.to_string()).to_string())
}

fn parse_role(key: &str) -> Result<Role, String> {
    Role::parse(key).ok_or_else(|| HeistError::InvalidRole(key.to_string()).to_string())
}

/// Parse `role=item` pairs. Every role must be part of `crew`.
fn parse_gear(pairs: &[String], crew: &[Role]) -> Result<Vec<(Role, &'static Equipment)>, String> {
    pairs
        .iter()
        .map(|pair| {
            let (role, item) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected role=item, got '{pair}'"))?;
            let role = parse_role(role)?;
            if !crew.contains(&role) {
                return Err(format!("no {role} in a crew of {}", crew.len()));
            }
            let item = Equipment::find(item)
                .ok_or_else(|| HeistError::InvalidEquipment(item.to_string()).to_string())?;
            Ok((role, item))
        })
        .collect()
}

/// The leader's task result for a posture key.
fn leader_task(posture: &str) -> Result<TaskResult, String> {
    let result = judge(Role::Leader, posture, &mut StdRng::seed_from_u64(0));
    if result.status == TaskStatus::Success {
        Ok(result)
    } else {
        Err(format!(
            "invalid posture: {posture} (expected cautious, neutral or aggressive)"
        ))
    }
}
