use crate::error::DeliveryError;
use auctions_text::{strip_color, TextComponent};
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// The per player opt outs, as toggled by the ignore commands.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IgnorePreferences {
    /// Ignoring every ignorable auction message.
    pub ignoring: bool,
    /// Ignoring only spammy messages such as bids.
    pub ignoring_spam: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    /// Non-interactive, always receives messages as legacy text.
    Console,
    Player(IgnorePreferences),
}

/// Anything that can be sent auction messages, implemented by the host for
/// its players and console.
pub trait MessageRecipient: Send + Sync {
    /// Identifies the recipient inside groups, each uuid is kept once.
    fn uuid(&self) -> u128;
    fn name(&self) -> &str;
    fn kind(&self) -> RecipientKind;

    /// Sends one line as json chat.
    fn send_chat_message(&self, line: &[TextComponent]) -> Result<(), DeliveryError>;

    /// Sends one line as `§` coded text, for recipients without json chat.
    fn send_legacy_message(&self, text: &str) -> Result<(), DeliveryError>;

    fn deliver(&self, line: &[TextComponent]) -> Result<(), DeliveryError> {
        match self.kind() {
            RecipientKind::Player(_) => self.send_chat_message(line),
            RecipientKind::Console => {
                self.send_legacy_message(&TextComponent::to_legacy_text(line))
            }
        }
    }
}

/// A console that writes to the log.
#[derive(Debug, Default)]
pub struct LogConsole;

impl MessageRecipient for LogConsole {
    fn uuid(&self) -> u128 {
        0
    }

    fn name(&self) -> &str {
        "CONSOLE"
    }

    fn kind(&self) -> RecipientKind {
        RecipientKind::Console
    }

    fn send_chat_message(&self, line: &[TextComponent]) -> Result<(), DeliveryError> {
        self.send_legacy_message(&TextComponent::to_legacy_text(line))
    }

    fn send_legacy_message(&self, text: &str) -> Result<(), DeliveryError> {
        info!(target: "auctions::console", "{}", strip_color(text));
        Ok(())
    }
}

/// A set of recipients that receive broadcasts, such as everyone in a world.
///
/// `recipients` is called once per broadcast, so membership may change at any
/// time. Recipients added after that call miss the broadcast.
pub trait MessageGroup: Send + Sync {
    fn name(&self) -> &str;
    fn recipients(&self) -> Vec<Arc<dyn MessageRecipient>>;
}

/// A `MessageGroup` with explicit membership.
pub struct RecipientGroup {
    name: String,
    members: RwLock<IndexMap<u128, Arc<dyn MessageRecipient>>>,
}

impl RecipientGroup {
    pub fn new(name: impl Into<String>) -> RecipientGroup {
        RecipientGroup {
            name: name.into(),
            members: Default::default(),
        }
    }

    /// Returns false if a recipient with the same uuid is already a member.
    pub fn add(&self, recipient: Arc<dyn MessageRecipient>) -> bool {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        if members.contains_key(&recipient.uuid()) {
            return false;
        }
        members.insert(recipient.uuid(), recipient);
        true
    }

    pub fn remove(&self, uuid: u128) -> bool {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(&uuid)
            .is_some()
    }

    pub fn contains(&self, uuid: u128) -> bool {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&uuid)
    }

    pub fn len(&self) -> usize {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageGroup for RecipientGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn recipients(&self) -> Vec<Arc<dyn MessageRecipient>> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

/// The groups broadcasts go to, keyed by group name.
///
/// Safe to modify from any thread while broadcasts are running, a broadcast
/// works on the groups registered when it started.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<IndexMap<String, Arc<dyn MessageGroup>>>,
}

impl GroupRegistry {
    pub fn new() -> GroupRegistry {
        Default::default()
    }

    /// Returns false if a group with the same name is already registered.
    pub fn add(&self, group: Arc<dyn MessageGroup>) -> bool {
        let mut groups = self.groups.write().unwrap_or_else(PoisonError::into_inner);
        if groups.contains_key(group.name()) {
            return false;
        }
        groups.insert(group.name().to_string(), group);
        true
    }

    pub fn remove(&self, name: &str) -> bool {
        self.groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(name)
            .is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn snapshot(&self) -> Vec<Arc<dyn MessageGroup>> {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(u128, &'static str);

    impl MessageRecipient for Named {
        fn uuid(&self) -> u128 {
            self.0
        }

        fn name(&self) -> &str {
            self.1
        }

        fn kind(&self) -> RecipientKind {
            RecipientKind::Player(IgnorePreferences::default())
        }

        fn send_chat_message(&self, _line: &[TextComponent]) -> Result<(), DeliveryError> {
            Ok(())
        }

        fn send_legacy_message(&self, _text: &str) -> Result<(), DeliveryError> {
            Ok(())
        }
    }

    #[test]
    fn group_membership_is_a_set() {
        let group = RecipientGroup::new("world");
        assert!(group.add(Arc::new(Named(1, "Notch"))));
        assert!(!group.add(Arc::new(Named(1, "Notch again"))));
        assert!(group.add(Arc::new(Named(2, "jeb_"))));
        assert_eq!(group.len(), 2);

        assert!(group.remove(1));
        assert!(!group.remove(1));
        let names: Vec<String> = group
            .recipients()
            .iter()
            .map(|recipient| recipient.name().to_string())
            .collect();
        assert_eq!(names, vec!["jeb_"]);
    }

    #[test]
    fn registry_by_name() {
        let registry = GroupRegistry::new();
        assert!(registry.add(Arc::new(RecipientGroup::new("world"))));
        assert!(!registry.add(Arc::new(RecipientGroup::new("world"))));
        assert!(registry.add(Arc::new(RecipientGroup::new("nether"))));
        assert_eq!(registry.snapshot().len(), 2);

        assert!(registry.remove("world"));
        assert!(!registry.remove("world"));
        assert!(!registry.contains("world"));
        assert!(registry.contains("nether"));
    }
}
