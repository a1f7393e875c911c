use crate::adapters::WikiClient;
use crate::domain::model::SkillStats;
use crate::utils::error::{CraftError, Result};

/// Line of the crafting skill in the hiscores response (Overall is line 0).
pub const CRAFTING_SKILL_INDEX: usize = 13;

pub async fn get_skill_stats(
    client: &WikiClient,
    username: &str,
    skill_index: usize,
) -> Result<SkillStats> {
    let player = username.replace(' ', "_");
    let body = client
        .get_text(client.hiscores_url(), &[("player", player.as_str())])
        .await?;
    parse_skill_line(&body, skill_index)
}

pub async fn get_crafting_level(client: &WikiClient, username: &str) -> Result<u32> {
    let stats = get_skill_stats(client, username, CRAFTING_SKILL_INDEX).await?;
    Ok(stats.level)
}

/// Reads `rank,level,experience` from line `index` of a hiscores body.
pub fn parse_skill_line(body: &str, index: usize) -> Result<SkillStats> {
    // 技能列為三欄，活動列只有兩欄
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.trim().as_bytes());

    let record = reader
        .records()
        .nth(index)
        .transpose()?
        .ok_or_else(|| CraftError::parse("hiscores", format!("no skill line at index {}", index)))?;

    if record.len() != 3 {
        return Err(CraftError::parse(
            "hiscores",
            format!("expected 3 fields, found {}", record.len()),
        ));
    }

    Ok(SkillStats {
        rank: parse_field(&record[0], "rank")?,
        level: parse_field(&record[1], "level")?,
        experience: parse_field(&record[2], "experience")?,
    })
}

fn parse_field<T: std::str::FromStr>(value: &str, field: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CraftError::parse("hiscores", format!("invalid {}: '{}'", field, value)))
}
