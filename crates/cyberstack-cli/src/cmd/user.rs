use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use cyberstack_core::config::Config;
use cyberstack_core::types::Role;
use cyberstack_core::{user, Store};
use std::path::Path;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// List platform users
    List,
    /// Set a user's platform role (admin or user)
    SetRole { uid: String, role: String },
    /// Delete a user's store record (the identity credential is kept)
    Delete { uid: String },
}

pub fn run(root: &Path, subcmd: UserSubcommand, json: bool) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    match subcmd {
        UserSubcommand::List => list(&store, json),
        UserSubcommand::SetRole { uid, role } => set_role(&store, &uid, &role, json),
        UserSubcommand::Delete { uid } => delete(root, &store, &uid, json),
    }
}

fn list(store: &Store, json: bool) -> anyhow::Result<()> {
    let users = user::list_users(store)?;
    if json {
        print_json(&users)?;
    } else if users.is_empty() {
        println!("No users registered.");
    } else {
        let rows: Vec<Vec<String>> = users
            .iter()
            .map(|u| vec![u.id.clone(), u.email.clone(), u.role.to_string()])
            .collect();
        print_table(&["uid", "email", "role"], &rows);
    }
    Ok(())
}

fn set_role(store: &Store, uid: &str, role: &str, json: bool) -> anyhow::Result<()> {
    let role: Role = role.parse().with_context(|| format!("invalid role '{role}'"))?;
    user::set_role(store, uid, role).with_context(|| format!("user '{uid}' not found"))?;

    if json {
        print_json(&serde_json::json!({ "uid": uid, "role": role }))?;
    } else {
        println!("Set role of [{uid}] to {role}");
    }
    Ok(())
}

fn delete(root: &Path, store: &Store, uid: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    user::delete_user(store, &config, uid)?;

    if json {
        print_json(&serde_json::json!({ "uid": uid, "deleted": true }))?;
    } else {
        println!("Deleted user record [{uid}] (identity credential kept)");
    }
    Ok(())
}
