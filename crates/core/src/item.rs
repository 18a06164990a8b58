use crate::auction::ItemStack;
use crate::error::SerializeError;
use auctions_text::TextComponent;
use serde_json::{json, Map, Value};

/// Turns an item into the string shown by a `show_item` hover event.
///
/// Hosts that can reach their own item serialization plug it in here. Any
/// error is treated as "no preview available".
pub trait ItemSerializer: Send + Sync {
    fn serialize(&self, item: &ItemStack) -> Result<String, SerializeError>;
}

/// Writes items in the json item format understood by the client.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonItemSerializer;

impl ItemSerializer for JsonItemSerializer {
    fn serialize(&self, item: &ItemStack) -> Result<String, SerializeError> {
        if item.id.is_empty() {
            return Err(SerializeError::MissingId);
        }
        if item.count == 0 || item.count > 127 {
            return Err(SerializeError::InvalidCount {
                id: item.id.clone(),
                count: item.count,
            });
        }

        let mut tag = Map::new();

        let mut display = Map::new();
        if let Some(name) = &item.display_name {
            display.insert("Name".into(), legacy_to_json(name));
        }
        if !item.lore.is_empty() {
            let lore = item.lore.iter().map(|line| legacy_to_json(line)).collect();
            display.insert("Lore".into(), Value::Array(lore));
        }
        if !display.is_empty() {
            tag.insert("display".into(), Value::Object(display));
        }

        if !item.enchantments.is_empty() {
            let enchantments = item
                .enchantments
                .iter()
                .map(|enchantment| json!({ "id": enchantment.id, "lvl": enchantment.level }))
                .collect();
            tag.insert("Enchantments".into(), Value::Array(enchantments));
        }

        let mut root = json!({ "id": item.id, "Count": item.count });
        if !tag.is_empty() {
            root["tag"] = Value::Object(tag);
        }
        Ok(serde_json::to_string(&root)?)
    }
}

fn legacy_to_json(text: &str) -> Value {
    Value::String(TextComponent::encode_line_json(
        &TextComponent::from_legacy_text(text),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::Enchantment;

    #[test]
    fn plain_item() {
        let json = JsonItemSerializer
            .serialize(&ItemStack::new("minecraft:stone", 3))
            .unwrap();
        assert_eq!(json, r#"{"Count":3,"id":"minecraft:stone"}"#);
    }

    #[test]
    fn named_enchanted_item() {
        let mut item = ItemStack::new("minecraft:diamond_sword", 1);
        item.display_name = Some("Excalibur".to_string());
        item.enchantments.push(Enchantment {
            id: "minecraft:sharpness".to_string(),
            level: 5,
        });
        let serialized = JsonItemSerializer.serialize(&item).unwrap();
        let json: Value = serde_json::from_str(&serialized).unwrap();

        assert_eq!(
            json["tag"]["display"]["Name"],
            r#"{"text":"","extra":[{"text":"Excalibur"}]}"#
        );
        assert_eq!(json["tag"]["Enchantments"][0]["lvl"], 5);
    }

    #[test]
    fn rejects_empty_stack() {
        let err = JsonItemSerializer
            .serialize(&ItemStack::new("minecraft:stone", 0))
            .unwrap_err();
        assert!(matches!(err, SerializeError::InvalidCount { count: 0, .. }));
    }
}
