//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pulse_core` linkage without the Flutter runtime.
//! - Given `<feed.json> <user_id>`, print that reader's coverage dashboard.

use pulse_core::{CoverageService, DashboardSnapshot};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("pulse_core ping={}", pulse_core::ping());
    println!("pulse_core version={}", pulse_core::core_version());

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => ExitCode::SUCCESS,
        [feed_path, user_id] => match run(feed_path, user_id) {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::FAILURE
            }
        },
        _ => {
            eprintln!("usage: pulse_cli [<feed.json> <user_id>]");
            ExitCode::from(2)
        }
    }
}

fn run(feed_path: &str, user_id: &str) -> Result<(), String> {
    let text = std::fs::read_to_string(feed_path)
        .map_err(|err| format!("cannot read `{feed_path}`: {err}"))?;
    let raw: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| format!("`{feed_path}` is not JSON: {err}"))?;

    let service = CoverageService::default();
    let tree = service.load_feed(&raw);
    print_dashboard(&service.dashboard(&tree, user_id));
    Ok(())
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    let stats = &snapshot.stats;
    println!(
        "articles read={}/{} ({:.1}%) groups read={}/{} ({:.1}%)",
        stats.read_articles,
        stats.total_articles,
        stats.read_percentage,
        stats.read_groups,
        stats.total_groups,
        stats.group_read_percentage
    );

    println!("unread ({}):", snapshot.unread.total);
    for item in &snapshot.unread.items {
        println!("  - [{}] {}", item.kind.as_str(), item.name);
    }
    if snapshot.unread.more() > 0 {
        println!("  ... and {} more", snapshot.unread.more());
    }

    println!("never read by anyone ({}):", snapshot.completely_unread.total);
    for item in &snapshot.completely_unread.items {
        println!("  - [{}] {}", item.kind.as_str(), item.name);
    }
    if snapshot.completely_unread.more() > 0 {
        println!("  ... and {} more", snapshot.completely_unread.more());
    }

    println!(
        "blind spots below {:.0}% ({}):",
        snapshot.blind_spot_threshold, snapshot.blind_spots.total
    );
    for spot in &snapshot.blind_spots.items {
        println!(
            "  - {} {:.1}% ({}/{} read)",
            spot.category, spot.read_percentage, spot.read_articles, spot.total_articles
        );
    }
    if snapshot.blind_spots.more() > 0 {
        println!("  ... and {} more", snapshot.blind_spots.more());
    }
}
