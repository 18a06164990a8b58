use crate::error::ConfigError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use toml::Value;
use toml_edit::{value, DocumentMut, Item, Table};
use tracing::{info, warn};

/// A message template together with how recipients may filter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    /// Players who ignore auctions do not get this message.
    pub ignorable: bool,
    /// Players who only ignore spam do not get this message, if it is also
    /// ignorable.
    pub spammy: bool,
}

impl Message {
    /// A message every player receives.
    pub fn new(text: impl Into<String>) -> Message {
        Message {
            text: text.into(),
            ignorable: false,
            spammy: false,
        }
    }

    pub fn ignorable(mut self, ignorable: bool) -> Message {
        self.ignorable = ignorable;
        self
    }

    pub fn spammy(mut self, spammy: bool) -> Message {
        self.spammy = spammy;
        self
    }
}

macro_rules! message_paths {
    (
        $( $variant:ident($path:literal, ignorable: $ignorable:literal, spammy: $spammy:literal) = $default:literal ),* $(,)?
    ) => {
        /// Every message the auctions plugin knows how to send.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MessagePath {
            $( $variant, )*
        }

        impl MessagePath {
            pub const ALL: &'static [MessagePath] = &[ $( MessagePath::$variant, )* ];

            /// The dotted key of this message in the messages file.
            pub fn path(self) -> &'static str {
                match self {
                    $( MessagePath::$variant => $path, )*
                }
            }

            pub fn default_text(self) -> &'static str {
                match self {
                    $( MessagePath::$variant => $default, )*
                }
            }

            pub fn is_ignorable(self) -> bool {
                match self {
                    $( MessagePath::$variant => $ignorable, )*
                }
            }

            pub fn is_spammy(self) -> bool {
                match self {
                    $( MessagePath::$variant => $spammy, )*
                }
            }

            pub fn from_path(path: &str) -> Option<MessagePath> {
                match path {
                    $( $path => Some(MessagePath::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

message_paths! {
    AuctionItemFormat("auction.itemformat", ignorable: false, spammy: false) = "&b[itemName]",
    AuctionStart("auction.start", ignorable: true, spammy: false) =
        "&6[ownername] &7is auctioning &6[itemamount]x [item]\n&7Starting price: &6$[startprice] &7Increment: &6$[increment]",
    AuctionStartAutowin("auction.startautowin", ignorable: true, spammy: false) =
        "&7Bid &6$[autowin] &7to win this auction instantly",
    AuctionBid("auction.bid", ignorable: true, spammy: true) =
        "&6[topbiddername] &7bid &6$[topbid] &7on [item]",
    AuctionTimeRemaining("auction.time", ignorable: true, spammy: true) =
        "&7The auction for [item] &7ends in &6[time]",
    AuctionEndWinner("auction.end.winner", ignorable: true, spammy: false) =
        "&6[topbiddername] &7won &6[itemamount]x [item] &7for &6$[topbid]",
    AuctionEndNoBids("auction.end.nobids", ignorable: true, spammy: false) =
        "&7The auction for [item] &7ended with no bids",
    AuctionCancelled("auction.cancelled", ignorable: true, spammy: false) =
        "&cThe auction for [item] &cwas cancelled",
    AuctionInfo("auction.info", ignorable: false, spammy: false) =
        "&7Item: &6[itemamount]x [item] &7([itemDisplayName]&7)\n&7Seller: &6[ownername]\n&7Top bid: &6$[topbid] &7by &6[topbiddername]\n&7Time left: &6[time]",
    AuctionTax("auction.tax", ignorable: false, spammy: false) =
        "&7A tax of &6[taxpercent]% &7was taken from your earnings",
    IgnoringEnabled("ignore.enabled", ignorable: false, spammy: false) =
        "&7You are now ignoring auction messages",
    IgnoringDisabled("ignore.disabled", ignorable: false, spammy: false) =
        "&7You are no longer ignoring auction messages",
    IgnoringSpamEnabled("ignore.spam.enabled", ignorable: false, spammy: false) =
        "&7You are now ignoring auction bid spam",
    IgnoringSpamDisabled("ignore.spam.disabled", ignorable: false, spammy: false) =
        "&7You are no longer ignoring auction bid spam",
}

/// The configured text of every `MessagePath`, falling back to the built in
/// defaults for anything the messages file leaves out.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    overrides: HashMap<MessagePath, String>,
}

impl MessageCatalog {
    pub fn get(&self, path: MessagePath) -> Message {
        Message {
            text: self.text(path).to_string(),
            ignorable: path.is_ignorable(),
            spammy: path.is_spammy(),
        }
    }

    pub fn text(&self, path: MessagePath) -> &str {
        self.overrides
            .get(&path)
            .map(String::as_str)
            .unwrap_or_else(|| path.default_text())
    }

    /// Format used in place of `[item]`, it has its own `[itemName]`.
    pub fn item_format(&self) -> &str {
        self.text(MessagePath::AuctionItemFormat)
    }

    pub fn set(&mut self, path: MessagePath, text: impl Into<String>) {
        self.overrides.insert(path, text.into());
    }

    /// Builds a catalog from the contents of a messages file.
    ///
    /// Keys may be nested tables or dotted keys, values are strings or arrays
    /// of strings that are joined into separate lines.
    pub fn from_toml(source: &str) -> Result<MessageCatalog, toml::de::Error> {
        let table: toml::Table = toml::from_str(source)?;
        let mut catalog = MessageCatalog::default();
        catalog.collect(&table, "");
        Ok(catalog)
    }

    fn collect(&mut self, table: &toml::Table, prefix: &str) {
        for (key, entry) in table {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            let text = match entry {
                Value::Table(inner) => {
                    self.collect(inner, &path);
                    continue;
                }
                Value::String(text) => text.clone(),
                Value::Array(lines) => {
                    let lines: Option<Vec<&str>> = lines.iter().map(Value::as_str).collect();
                    match lines {
                        Some(lines) => lines.join("\n"),
                        None => {
                            warn!("Message {} contains a non string line, skipping", path);
                            continue;
                        }
                    }
                }
                _ => {
                    warn!("Message {} is not a string, skipping", path);
                    continue;
                }
            };
            match MessagePath::from_path(&path) {
                Some(message_path) => {
                    self.overrides.insert(message_path, text);
                }
                None => warn!("Unknown message {} in messages file", path),
            }
        }
    }

    /// Loads the messages file, writing the default text of any missing
    /// message back into it.
    pub fn load(messages_file: impl AsRef<Path>) -> Result<MessageCatalog, ConfigError> {
        let path = messages_file.as_ref();
        let str = match fs::read_to_string(path) {
            Ok(str) => str,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        let mut doc = str.parse::<DocumentMut>().map_err(|source| ConfigError::Syntax {
            path: path.to_owned(),
            source,
        })?;

        for message_path in MessagePath::ALL {
            insert_default(
                doc.as_table_mut(),
                message_path.path(),
                message_path.default_text(),
            );
        }

        let patched = doc.to_string();
        if str != patched {
            info!("Writing default messages to {}", path.display());
            fs::write(path, &patched).map_err(|source| ConfigError::Io {
                path: path.to_owned(),
                source,
            })?;
        }

        MessageCatalog::from_toml(&patched).map_err(|source| ConfigError::Deserialize {
            path: path.to_owned(),
            source,
        })
    }
}

/// Walks `path` through nested tables, creating them as needed. A key that is
/// already set to a non table value is left untouched.
fn insert_default(mut table: &mut Table, path: &str, default: &str) {
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            table.entry(segment).or_insert_with(|| value(default));
            return;
        }
        let item = table
            .entry(segment)
            .or_insert_with(|| Item::Table(Table::new()));
        table = match item.as_table_mut() {
            Some(inner) => inner,
            None => return,
        };
    }
}
