#![allow(dead_code)]

use auctions_core::error::{DeliveryError, SerializeError};
use auctions_core::item::ItemSerializer;
use auctions_core::{
    AuctionSnapshot, AuctionsConfig, IgnorePreferences, ItemStack, MessageFactory,
    MessageRecipient, RecipientKind, Reward,
};
use auctions_text::TextComponent;
use std::sync::{Arc, Mutex};

/// Everything a recipient was sent, as plain text in arrival order.
pub type Log = Arc<Mutex<Vec<(String, String)>>>;

pub fn new_log() -> Log {
    Default::default()
}

pub fn entries(log: &Log) -> Vec<(String, String)> {
    log.lock().unwrap().clone()
}

/// Lines received by `name`, in order.
pub fn lines_for(log: &Log, name: &str) -> Vec<String> {
    entries(log)
        .into_iter()
        .filter(|(recipient, _)| recipient == name)
        .map(|(_, line)| line)
        .collect()
}

pub struct RecordingRecipient {
    pub uuid: u128,
    pub name: String,
    pub kind: RecipientKind,
    pub fail: bool,
    pub log: Log,
    pub components: Mutex<Vec<Vec<TextComponent>>>,
}

impl RecordingRecipient {
    pub fn player(uuid: u128, name: &str, preferences: IgnorePreferences, log: &Log) -> Arc<Self> {
        Arc::new(RecordingRecipient {
            uuid,
            name: name.to_string(),
            kind: RecipientKind::Player(preferences),
            fail: false,
            log: log.clone(),
            components: Default::default(),
        })
    }

    pub fn console(log: &Log) -> Arc<Self> {
        Arc::new(RecordingRecipient {
            uuid: 0,
            name: "CONSOLE".to_string(),
            kind: RecipientKind::Console,
            fail: false,
            log: log.clone(),
            components: Default::default(),
        })
    }

    /// A player whose connection is gone, every send fails.
    pub fn broken(uuid: u128, name: &str, log: &Log) -> Arc<Self> {
        Arc::new(RecordingRecipient {
            uuid,
            name: name.to_string(),
            kind: RecipientKind::Player(IgnorePreferences::default()),
            fail: true,
            log: log.clone(),
            components: Default::default(),
        })
    }
}

impl MessageRecipient for RecordingRecipient {
    fn uuid(&self) -> u128 {
        self.uuid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RecipientKind {
        self.kind
    }

    fn send_chat_message(&self, line: &[TextComponent]) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Disconnected {
                name: self.name.clone(),
            });
        }
        self.components.lock().unwrap().push(line.to_vec());
        self.log
            .lock()
            .unwrap()
            .push((self.name.clone(), TextComponent::to_plain_text(line)));
        Ok(())
    }

    fn send_legacy_message(&self, text: &str) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Disconnected {
                name: self.name.clone(),
            });
        }
        self.log
            .lock()
            .unwrap()
            .push((self.name.clone(), auctions_text::strip_color(text)));
        Ok(())
    }
}

pub struct FailingSerializer;

impl ItemSerializer for FailingSerializer {
    fn serialize(&self, _item: &ItemStack) -> Result<String, SerializeError> {
        Err(SerializeError::Message("reflection failed".to_string()))
    }
}

pub fn item_auction() -> AuctionSnapshot {
    AuctionSnapshot {
        owner_name: "Notch".to_string(),
        reward: Reward::Item(ItemStack::new("minecraft:diamond_sword", 1)),
        bid: Some(2500.0),
        bidder_name: Some("jeb_".to_string()),
        time_left: 60,
        start_price: 1000.0,
        bid_increment: 100.0,
        autowin: 0.0,
    }
}

pub fn factory(console: Arc<RecordingRecipient>) -> MessageFactory {
    MessageFactory::builder(Arc::new(AuctionsConfig::default()), console)
        .finish()
        .unwrap()
}
