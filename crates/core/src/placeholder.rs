use crate::auction::Auction;
use crate::config::Settings;
use crate::number::{format_readable, format_value};

pub const ITEM_NAME: &str = "[itemName]";
pub const ITEM_DISPLAY_NAME: &str = "[itemDisplayName]";
pub const ITEM_AMOUNT: &str = "[itemamount]";
pub const TIME: &str = "[time]";
pub const OWNER_NAME: &str = "[ownername]";
pub const TOP_BIDDER_NAME: &str = "[topbiddername]";
pub const TAX_PERCENT: &str = "[taxpercent]";
pub const AUTOWIN: &str = "[autowin]";
pub const INCREMENT: &str = "[increment]";
pub const TOP_BID: &str = "[topbid]";
pub const START_PRICE: &str = "[startprice]";

/// Substitutes every auction placeholder in `message`.
///
/// Without an auction the message is returned untouched, even if it contains
/// text that looks like a placeholder. Replacement is a single left to right
/// pass, so a substituted value is never expanded again.
pub fn replace_auction_placeholders(
    message: &str,
    auction: Option<&dyn Auction>,
    settings: &dyn Settings,
) -> String {
    let Some(auction) = auction else {
        return message.to_string();
    };

    let reward = auction.reward();
    let values = [
        (ITEM_NAME, reward.name()),
        (ITEM_DISPLAY_NAME, reward.display_name()),
        (ITEM_AMOUNT, reward.amount().to_string()),
        (TIME, time_left(auction)),
        (OWNER_NAME, auction.owner_name().to_string()),
        (TOP_BIDDER_NAME, top_bidder_name(auction).to_string()),
        (TAX_PERCENT, format_readable(settings.tax_percent())),
        (AUTOWIN, format_value(auction.autowin(), settings)),
        (INCREMENT, format_value(auction.bid_increment(), settings)),
        (TOP_BID, format_value(auction.bid().unwrap_or(0.0), settings)),
        (START_PRICE, format_value(auction.start_price(), settings)),
    ];

    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(token, _)| tail.starts_with(token)) {
            Some((token, value)) => {
                out.push_str(value);
                rest = &tail[token.len()..];
            }
            None => {
                out.push('[');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn top_bidder_name(auction: &dyn Auction) -> &str {
    match (auction.bid(), auction.bidder_name()) {
        (None, _) => "Nobody",
        (Some(_), None) => "Console",
        (Some(_), Some(name)) => name,
    }
}

// TODO: format `Auction::time_left` once there is a shortened/long time setting
fn time_left(_auction: &dyn Auction) -> String {
    "Unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::{AuctionSnapshot, ItemStack, Reward};
    use crate::config::AuctionsConfig;

    fn auction() -> AuctionSnapshot {
        let mut item = ItemStack::new("minecraft:diamond_sword", 1);
        item.display_name = Some("Excalibur".to_string());
        AuctionSnapshot {
            owner_name: "Notch".to_string(),
            reward: Reward::Item(item),
            bid: Some(1500.0),
            bidder_name: Some("jeb_".to_string()),
            time_left: 30,
            start_price: 1000.0,
            bid_increment: 50.0,
            autowin: 1_000_000.0,
        }
    }

    fn settings(truncate: bool) -> AuctionsConfig {
        AuctionsConfig {
            tax_percent: 7.5,
            truncate_numbers: truncate,
            ..Default::default()
        }
    }

    #[test]
    fn no_auction_is_pass_through() {
        let template = "[itemName] costs [topbid] &a[item]";
        assert_eq!(
            replace_auction_placeholders(template, None, &settings(false)),
            template
        );
    }

    #[test]
    fn replaces_every_placeholder() {
        let auction = auction();
        let expanded = replace_auction_placeholders(
            "[itemName]|[itemDisplayName]|[itemamount]|[time]|[ownername]|[topbiddername]|[taxpercent]|[autowin]|[increment]|[topbid]|[startprice]",
            Some(&auction),
            &settings(false),
        );
        assert_eq!(
            expanded,
            "Diamond Sword|Excalibur|1|Unknown|Notch|jeb_|7.5|1,000,000|50|1,500|1,000"
        );
    }

    #[test]
    fn truncated_money_but_readable_tax() {
        let auction = auction();
        let expanded = replace_auction_placeholders(
            "[topbid] [autowin] [taxpercent]",
            Some(&auction),
            &settings(true),
        );
        assert_eq!(expanded, "1.5K 1M 7.5");
    }

    #[test]
    fn repeated_and_unknown_tokens() {
        let auction = auction();
        let expanded = replace_auction_placeholders(
            "[ownername] [item] [[ownername]] [OWNERNAME] [ownername",
            Some(&auction),
            &settings(false),
        );
        assert_eq!(expanded, "Notch [item] [Notch] [OWNERNAME] [ownername");
    }

    #[test]
    fn values_are_not_expanded_twice() {
        let mut auction = auction();
        auction.bidder_name = Some("[ownername]".to_string());
        let expanded =
            replace_auction_placeholders("[topbiddername]", Some(&auction), &settings(false));
        assert_eq!(expanded, "[ownername]");
    }

    #[test]
    fn top_bidder_resolution() {
        let mut auction = auction();
        assert_eq!(top_bidder_name(&auction), "jeb_");
        auction.bidder_name = None;
        assert_eq!(top_bidder_name(&auction), "Console");
        auction.bid = None;
        assert_eq!(top_bidder_name(&auction), "Nobody");
    }
}
