//! Archive browsing commands

use anyhow::Result;
use clap::Subcommand;
use estate_asset::{AssetStatus, SessionStore};

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List archived sessions, newest first
    List,

    /// Show one archived session in full
    Show {
        /// Session ID
        id: String,
    },
}

pub fn run(cmd: HistoryCommands) -> Result<()> {
    match cmd {
        HistoryCommands::List => run_list(),
        HistoryCommands::Show { id } => run_show(&id),
    }
}

fn run_list() -> Result<()> {
    let store = SessionStore::default_store();
    let sessions = store.list_all()?;

    if sessions.is_empty() {
        println!("No archived sessions.");
        return Ok(());
    }

    for session in sessions {
        let failed = session
            .assets
            .iter()
            .filter(|a| a.status == AssetStatus::Error)
            .count();
        let health = if failed == 0 {
            String::new()
        } else {
            format!(" ({} failed)", failed)
        };
        println!(
            "{}  {}  {} assets{}  {}",
            session.id,
            format_timestamp(session.created_at),
            session.assets.len(),
            health,
            session.topic
        );
    }

    Ok(())
}

fn run_show(id: &str) -> Result<()> {
    let store = SessionStore::default_store();
    let session = store.load(id)?;

    println!("Topic:    {}", session.topic);
    println!("Created:  {}", format_timestamp(session.created_at));
    println!("Assets:");
    for asset in &session.assets {
        let marker = match asset.status {
            AssetStatus::Success => "ok",
            AssetStatus::Error => "FAILED",
            AssetStatus::Pending => "pending",
        };
        println!("  {:<10} {:<7} {} bytes", asset.kind, marker, asset.payload.len());
        for (key, value) in &asset.metadata {
            println!("             {} = {}", key, value);
        }
    }

    Ok(())
}

/// Format epoch milliseconds as a UTC timestamp without a date-time dependency
fn format_timestamp(millis: u64) -> String {
    let secs = millis / 1000;
    let days = secs / 86400;
    let time_secs = secs % 86400;

    let mut year = 1970i64;
    let mut remaining_days = days as i64;
    loop {
        let days_in_year = if is_leap(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let month_days = [
        31,
        if is_leap(year) { 29 } else { 28 },
        31,
        30,
        31,
        30,
        31,
        31,
        30,
        31,
        30,
        31,
    ];
    let mut month = 0usize;
    for (i, &md) in month_days.iter().enumerate() {
        if remaining_days < md as i64 {
            month = i;
            break;
        }
        remaining_days -= md as i64;
    }

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        year,
        month + 1,
        remaining_days + 1,
        time_secs / 3600,
        (time_secs % 3600) / 60
    )
}

fn is_leap(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_epoch() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
    }

    #[test]
    fn test_format_timestamp_known_date() {
        // 2026-08-06 00:00:00 UTC
        assert_eq!(format_timestamp(1_785_974_400_000), "2026-08-06 00:00");
    }
}
