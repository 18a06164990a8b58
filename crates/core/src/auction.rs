use serde::{Deserialize, Serialize};

/// Read-only view of a running auction, supplied by the auction subsystem
/// for the duration of one message.
pub trait Auction: Send + Sync {
    fn reward(&self) -> &Reward;
    fn owner_name(&self) -> &str;
    /// `None` while nobody has bid yet.
    fn bid(&self) -> Option<f64>;
    /// `None` with a bid present means the console placed it.
    fn bidder_name(&self) -> Option<&str>;
    /// Seconds until the auction ends.
    fn time_left(&self) -> u64;
    fn start_price(&self) -> f64;
    fn bid_increment(&self) -> f64;
    fn autowin(&self) -> f64;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Enchantment {
    pub id: String,
    pub level: u16,
}

/// The host item being auctioned. Only the parts the messages and the hover
/// preview need are modelled.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Namespaced id such as `minecraft:diamond_sword`.
    pub id: String,
    pub count: u32,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lore: Vec<String>,
    #[serde(default)]
    pub enchantments: Vec<Enchantment>,
}

impl ItemStack {
    pub fn new(id: impl Into<String>, count: u32) -> ItemStack {
        ItemStack {
            id: id.into(),
            count,
            display_name: None,
            lore: Vec::new(),
            enchantments: Vec::new(),
        }
    }

    /// The vanilla name of the item type, `minecraft:diamond_sword` gives
    /// `Diamond Sword`.
    pub fn type_name(&self) -> String {
        let path = self.id.rsplit(':').next().unwrap_or(&self.id);
        path.split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reward {
    Item(ItemStack),
    /// Anything that is not an item, e.g. money or a rank.
    Other { name: String, amount: u32 },
}

impl Reward {
    pub fn name(&self) -> String {
        match self {
            Reward::Item(item) => item.type_name(),
            Reward::Other { name, .. } => name.clone(),
        }
    }

    /// The custom name of an item reward when one is set, the plain name
    /// otherwise.
    pub fn display_name(&self) -> String {
        match self {
            Reward::Item(ItemStack {
                display_name: Some(display_name),
                ..
            }) => display_name.clone(),
            _ => self.name(),
        }
    }

    pub fn amount(&self) -> u32 {
        match self {
            Reward::Item(item) => item.count,
            Reward::Other { amount, .. } => *amount,
        }
    }

    pub fn item(&self) -> Option<&ItemStack> {
        match self {
            Reward::Item(item) => Some(item),
            Reward::Other { .. } => None,
        }
    }
}

/// A plain data copy of an auction, used where there is no live auction
/// object such as previews and fixtures.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AuctionSnapshot {
    pub owner_name: String,
    pub reward: Reward,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub bidder_name: Option<String>,
    #[serde(default)]
    pub time_left: u64,
    pub start_price: f64,
    pub bid_increment: f64,
    #[serde(default)]
    pub autowin: f64,
}

impl Auction for AuctionSnapshot {
    fn reward(&self) -> &Reward {
        &self.reward
    }

    fn owner_name(&self) -> &str {
        &self.owner_name
    }

    fn bid(&self) -> Option<f64> {
        self.bid
    }

    fn bidder_name(&self) -> Option<&str> {
        self.bidder_name.as_deref()
    }

    fn time_left(&self) -> u64 {
        self.time_left
    }

    fn start_price(&self) -> f64 {
        self.start_price
    }

    fn bid_increment(&self) -> f64 {
        self.bid_increment
    }

    fn autowin(&self) -> f64 {
        self.autowin
    }
}
