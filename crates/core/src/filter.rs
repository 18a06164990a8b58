use crate::messages::Message;
use crate::recipient::{IgnorePreferences, MessageRecipient, RecipientKind};

/// Whether `recipient` should be sent `message`. The console always is.
pub fn may_deliver(recipient: &dyn MessageRecipient, message: &Message) -> bool {
    match recipient.kind() {
        RecipientKind::Console => true,
        RecipientKind::Player(preferences) => {
            !can_ignore_message(preferences, message.ignorable, message.spammy)
        }
    }
}

/// Spam ignoring only applies to messages that are both ignorable and spammy,
/// general ignoring applies to every ignorable message.
pub fn can_ignore_message(preferences: IgnorePreferences, ignorable: bool, spammy: bool) -> bool {
    if !ignorable {
        false
    } else if spammy && preferences.ignoring_spam {
        true
    } else {
        preferences.ignoring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: IgnorePreferences = IgnorePreferences {
        ignoring: false,
        ignoring_spam: false,
    };
    const ALL: IgnorePreferences = IgnorePreferences {
        ignoring: true,
        ignoring_spam: false,
    };
    const SPAM: IgnorePreferences = IgnorePreferences {
        ignoring: false,
        ignoring_spam: true,
    };

    #[test]
    fn unignorable_always_delivered() {
        for preferences in [NONE, ALL, SPAM] {
            assert!(!can_ignore_message(preferences, false, false));
            assert!(!can_ignore_message(preferences, false, true));
        }
    }

    #[test]
    fn general_ignore() {
        assert!(can_ignore_message(ALL, true, false));
        assert!(can_ignore_message(ALL, true, true));
        assert!(!can_ignore_message(NONE, true, false));
        assert!(!can_ignore_message(NONE, true, true));
    }

    #[test]
    fn spam_ignore_is_narrower() {
        assert!(can_ignore_message(SPAM, true, true));
        assert!(!can_ignore_message(SPAM, true, false));
    }
}
