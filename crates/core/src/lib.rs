#![deny(rust_2018_idioms)]

pub mod auction;
pub mod config;
pub mod error;
pub mod factory;
pub mod filter;
pub mod item;
pub mod messages;
pub mod number;
pub mod placeholder;
pub mod recipient;
pub mod render;

pub use auction::{Auction, AuctionSnapshot, ItemStack, Reward};
pub use config::{AuctionsConfig, Settings, SharedSettings};
pub use factory::{DispatchHandle, MessageFactory, MessageFactoryBuilder};
pub use messages::{Message, MessageCatalog, MessagePath};
pub use recipient::{
    GroupRegistry, IgnorePreferences, LogConsole, MessageGroup, MessageRecipient, RecipientGroup,
    RecipientKind,
};
