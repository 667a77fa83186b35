use crate::output::print_json;
use cyberstack_core::config::Config;
use cyberstack_core::{io, paths, seed, Store};
use std::path::Path;

/// `cyberstack init` — create the workspace directory, write a default
/// config if none exists, and seed the fixed teams, channels, and sample
/// board. Safe to re-run.
pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    io::ensure_dir(&paths::cyberstack_dir(root))?;

    let wrote_config = if paths::config_path(root).exists() {
        false
    } else {
        Config::default().save(root)?;
        true
    };

    let store = Store::open(root)?;
    let summary = seed::seed(&store)?;

    if json {
        print_json(&serde_json::json!({
            "config_created": wrote_config,
            "teams_seeded": summary.teams_seeded,
            "channels_added": summary.channels_added,
            "board_seeded": summary.board_seeded,
        }))?;
    } else {
        println!("Initialized cyberstack workspace at {}", root.display());
        if wrote_config {
            println!("Wrote {}", paths::CONFIG_FILE);
        }
        if summary.teams_seeded {
            println!("Seeded 3 teams");
        }
        if summary.channels_added > 0 {
            println!("Added {} chat channels", summary.channels_added);
        }
        if summary.board_seeded {
            println!("Seeded the sample board");
        }
    }
    Ok(())
}
