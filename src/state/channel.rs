//! Channel-related types and state.

use super::dashmap_ext::DashMapExt;
use crate::error::StateError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{Mutex, RwLock};
use relay_proto::{ChannelModes, MemberModes};
use std::collections::HashMap;
use std::sync::Arc;

/// A channel and its membership.
///
/// The member list and the per-member modes change together under one
/// mutex. Callers take snapshots and release the lock before writing to
/// any connection.
#[derive(Debug)]
pub struct Channel {
    pub name: String,
    topic: RwLock<String>,
    modes: RwLock<ChannelModes>,
    membership: Mutex<Membership>,
}

#[derive(Debug, Default)]
struct Membership {
    /// Nicknames in join order.
    members: Vec<String>,
    /// Modes per nickname. Survives the member leaving the list.
    modes: HashMap<String, MemberModes>,
}

impl Channel {
    /// Create an empty channel.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topic: RwLock::new(String::new()),
            modes: RwLock::new(ChannelModes::NONE),
            membership: Mutex::new(Membership::default()),
        }
    }

    /// Create a channel whose only member is `founder`, as operator.
    pub fn with_operator(name: impl Into<String>, founder: &str) -> Self {
        let channel = Self::new(name);
        {
            let mut membership = channel.membership.lock();
            membership.members.push(founder.to_string());
            membership
                .modes
                .insert(founder.to_string(), MemberModes::OPERATOR);
        }
        channel
    }

    /// Add `nick` to the member list and return its stored member modes.
    ///
    /// Joining twice does not duplicate the entry. A nickname seen for the
    /// first time gets no modes.
    pub fn join(&self, nick: &str) -> MemberModes {
        let mut membership = self.membership.lock();
        if !membership.members.iter().any(|m| m == nick) {
            membership.members.push(nick.to_string());
        }
        *membership
            .modes
            .entry(nick.to_string())
            .or_insert(MemberModes::NONE)
    }

    /// Member nicknames in join order.
    pub fn members(&self) -> Vec<String> {
        self.membership.lock().members.clone()
    }

    /// Nicknames as shown in a names reply: `@` for operators, space separated.
    pub fn names(&self) -> String {
        let membership = self.membership.lock();
        membership
            .members
            .iter()
            .map(|nick| {
                let modes = membership
                    .modes
                    .get(nick)
                    .copied()
                    .unwrap_or(MemberModes::NONE);
                format!("{}{}", modes.names_prefix(), nick)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn member_modes(&self, nick: &str) -> Option<MemberModes> {
        self.membership.lock().modes.get(nick).copied()
    }

    pub fn topic(&self) -> String {
        self.topic.read().clone()
    }

    pub fn modes(&self) -> ChannelModes {
        *self.modes.read()
    }
}

/// Concurrent name → channel map. Channels are never removed.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: DashMap<String, Arc<Channel>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `name`, creating it with `founder` as operator if absent.
    ///
    /// Returns the channel and whether this call created it. Two racing
    /// callers cannot both observe `true`.
    pub fn get_or_create(&self, name: &str, founder: &str) -> (Arc<Channel>, bool) {
        match self.channels.entry(name.to_string()) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(slot) => {
                let channel = Arc::new(Channel::with_operator(name, founder));
                slot.insert(Arc::clone(&channel));
                (channel, true)
            }
        }
    }

    /// Look up a channel that must exist.
    pub fn get(&self, name: &str) -> Result<Arc<Channel>, StateError> {
        self.find(name)
            .ok_or_else(|| StateError::NoSuchChannel(name.to_string()))
    }

    pub fn find(&self, name: &str) -> Option<Arc<Channel>> {
        self.channels.get_cloned(name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
