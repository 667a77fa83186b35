use crate::output::print_json;
use cyberstack_core::{seed, Store};
use std::path::Path;

/// `cyberstack seed` — fill in any missing fixed data without touching
/// existing records.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    let summary = seed::seed(&store)?;

    if json {
        print_json(&summary)?;
    } else if !summary.teams_seeded && summary.channels_added == 0 && !summary.board_seeded {
        println!("Nothing to seed.");
    } else {
        println!(
            "Seeded: teams={} channels_added={} board={}",
            summary.teams_seeded, summary.channels_added, summary.board_seeded
        );
    }
    Ok(())
}
