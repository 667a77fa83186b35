use crate::access;
use crate::error::{CoreError, Result};
use crate::paths;
use crate::store::Store;
use crate::team;
use crate::user::PlatformUser;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// A chat message. Append-only: messages are never edited or deleted.
/// The store record omits `id`; it is the push key, injected on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub user: String,
    pub avatar: String,
    pub text: String,
    pub time: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// The fixed channel set every deployment starts with.
pub fn default_channels() -> Vec<Channel> {
    vec![
        Channel {
            id: "public".to_string(),
            name: "# Public".to_string(),
            description: "Public channel for all platform users.".to_string(),
        },
        Channel {
            id: "red-team".to_string(),
            name: "# red-team".to_string(),
            description: "Discussing offensive strategies and findings.".to_string(),
        },
        Channel {
            id: "blue-team".to_string(),
            name: "# blue-team".to_string(),
            description: "Coordination for defensive operations.".to_string(),
        },
        Channel {
            id: "purple-team".to_string(),
            name: "# purple-team".to_string(),
            description: "Synergy and collaboration between red and blue teams.".to_string(),
        },
    ]
}

/// Merge any missing fixed channels into the store without touching
/// existing ones. Returns how many were added.
pub fn ensure_default_channels(store: &Store) -> Result<usize> {
    let mut patches = Vec::new();
    for channel in default_channels() {
        if !store.exists(&paths::channel(&channel.id))? {
            patches.push((paths::channel(&channel.id), serde_json::to_value(&channel)?));
        }
    }
    let added = patches.len();
    if !patches.is_empty() {
        store.update(patches)?;
    }
    Ok(added)
}

/// All channels, public first.
pub fn list_channels(store: &Store) -> Result<Vec<Channel>> {
    let map: BTreeMap<String, Channel> = store.get_as("chat/channels")?.unwrap_or_default();
    let mut channels: Vec<Channel> = map.into_values().collect();
    channels.sort_by_key(|c| (c.id != "public", c.id.clone()));
    Ok(channels)
}

/// Channel visibility: signed-out viewers see only the public channel,
/// admins see everything, everyone else sees public plus the channels of
/// teams they belong to (team channel ids match team ids).
pub fn visible_channels(store: &Store, viewer: Option<&str>) -> Result<Vec<Channel>> {
    let channels = list_channels(store)?;
    let Some(uid) = viewer else {
        return Ok(channels.into_iter().filter(|c| c.id == "public").collect());
    };
    if access::is_admin(store, uid) {
        return Ok(channels);
    }
    let my_teams: Vec<String> = team::teams_of(store, uid)?
        .into_iter()
        .map(|t| t.id)
        .collect();
    Ok(channels
        .into_iter()
        .filter(|c| c.id == "public" || my_teams.contains(&c.id))
        .collect())
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Append a message to a channel and return it with its generated id.
pub fn post_message(
    store: &Store,
    channel_id: &str,
    author: &PlatformUser,
    text: &str,
) -> Result<Message> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::EmptyMessage);
    }
    if !store.exists(&paths::channel(channel_id))? {
        return Err(CoreError::ChannelNotFound(channel_id.to_string()));
    }
    let mut message = Message {
        id: String::new(),
        user: author.email.clone(),
        avatar: avatar_for(&author.email),
        text: text.to_string(),
        time: Utc::now().to_rfc3339(),
        user_id: author.id.clone(),
    };
    let key = store.push(&paths::channel_messages(channel_id), &message)?;
    message.id = key;
    Ok(message)
}

/// Messages of a channel in append order (push keys sort chronologically).
pub fn messages(store: &Store, channel_id: &str) -> Result<Vec<Message>> {
    let map: BTreeMap<String, Message> = store
        .get_as(&paths::channel_messages(channel_id))?
        .unwrap_or_default();
    Ok(map
        .into_iter()
        .map(|(key, mut message)| {
            message.id = key;
            message
        })
        .collect())
}

fn avatar_for(email: &str) -> String {
    email
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_else(|| "?".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::{TeamDraft, TeamMember};
    use crate::types::{Role, TeamName};
    use serde_json::json;

    fn author(id: &str, email: &str) -> PlatformUser {
        PlatformUser {
            id: id.to_string(),
            email: email.to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn seeding_is_merge_missing() {
        let store = Store::in_memory();
        // A pre-existing channel with a customized description survives.
        store
            .set(
                "chat/channels/public",
                &json!({ "id": "public", "name": "# Public", "description": "Custom" }),
            )
            .unwrap();

        let added = ensure_default_channels(&store).unwrap();
        assert_eq!(added, 3);
        let channels = list_channels(&store).unwrap();
        assert_eq!(channels.len(), 4);
        assert_eq!(channels[0].id, "public");
        assert_eq!(channels[0].description, "Custom");

        // Second run adds nothing.
        assert_eq!(ensure_default_channels(&store).unwrap(), 0);
    }

    #[test]
    fn post_and_read_back_in_order() {
        let store = Store::in_memory();
        ensure_default_channels(&store).unwrap();
        let alice = author("u1", "alice@cyberstack.ai");

        post_message(&store, "public", &alice, "first").unwrap();
        post_message(&store, "public", &alice, "second").unwrap();

        let msgs = messages(&store, "public").unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].text, "first");
        assert_eq!(msgs[1].text, "second");
        assert_eq!(msgs[0].avatar, "A");
        assert!(!msgs[0].id.is_empty());
    }

    #[test]
    fn posting_to_unknown_channel_fails() {
        let store = Store::in_memory();
        let alice = author("u1", "alice@cyberstack.ai");
        assert!(matches!(
            post_message(&store, "secret-ops", &alice, "hi").unwrap_err(),
            CoreError::ChannelNotFound(_)
        ));
    }

    #[test]
    fn empty_message_is_rejected() {
        let store = Store::in_memory();
        ensure_default_channels(&store).unwrap();
        let alice = author("u1", "alice@cyberstack.ai");
        assert!(matches!(
            post_message(&store, "public", &alice, "   ").unwrap_err(),
            CoreError::EmptyMessage
        ));
    }

    #[test]
    fn visibility_rules() {
        let store = Store::in_memory();
        ensure_default_channels(&store).unwrap();

        // Signed out: public only.
        let channels = visible_channels(&store, None).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].id, "public");

        // Admin: everything.
        store
            .set("users/boss", &json!({ "email": "boss@x.y", "role": "Admin" }))
            .unwrap();
        assert_eq!(visible_channels(&store, Some("boss")).unwrap().len(), 4);

        // Ordinary member: public + own team's channel. The seeded team
        // channels share ids with team records.
        store
            .set("users/u1", &json!({ "email": "a@x.y", "role": "User" }))
            .unwrap();
        let mut red = crate::team::create_team(
            &store,
            TeamDraft {
                name: TeamName::RedTeam,
                description: "Offense".to_string(),
                capacity: 50,
                members: vec![TeamMember {
                    user_id: "u1".to_string(),
                    role: "Member".to_string(),
                }],
            },
        )
        .unwrap();
        // Align the team id with its channel id, as the seeder does.
        store.remove(&paths::team(&red.id)).unwrap();
        red.id = "red-team".to_string();
        store.set(&paths::team("red-team"), &red).unwrap();

        let channels = visible_channels(&store, Some("u1")).unwrap();
        let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["public", "red-team"]);
    }
}
