use crate::auction::Auction;
use crate::item::ItemSerializer;
use crate::placeholder::ITEM_NAME;
use auctions_text::{translate_alternate_color_codes, HoverEvent, TextComponent};
use tracing::error;

/// Token replaced by the formatted item label, with a hover preview for item
/// rewards.
pub const ITEM: &str = "[item]";

/// One chat line ready to be handed to a recipient.
pub type RenderedLine = Vec<TextComponent>;

/// Splits `message` into lines and turns each into text components.
///
/// `message` must already have its color codes translated to `§`. Empty lines
/// between text are kept, trailing ones are dropped. With an auction, every `[item]` is replaced by `item_format`
/// (after substituting `[itemName]` and translating `&` codes) and, for item
/// rewards, given a hover preview from `serializer`. A failing serializer only
/// costs the preview.
pub fn split_and_format(
    message: &str,
    auction: Option<&dyn Auction>,
    item_format: &str,
    serializer: &dyn ItemSerializer,
) -> Vec<RenderedLine> {
    let mut lines: Vec<&str> = message.split('\n').collect();
    // An empty message is still one empty line
    if lines.len() > 1 {
        while lines.last() == Some(&"") {
            lines.pop();
        }
    }

    let mut item_label = auction.map(|auction| ItemLabel::new(auction, item_format));
    lines
        .into_iter()
        .map(|line| generate_line(line, item_label.as_mut(), serializer))
        .collect()
}

/// The `[item]` replacement for one message. The preview is only serialized
/// the first time a line needs it.
struct ItemLabel<'a> {
    auction: &'a dyn Auction,
    components: Vec<TextComponent>,
    hover: Option<Option<HoverEvent>>,
}

impl<'a> ItemLabel<'a> {
    fn new(auction: &'a dyn Auction, item_format: &str) -> ItemLabel<'a> {
        let format = item_format.replace(ITEM_NAME, &auction.reward().name());
        let colored = translate_alternate_color_codes('&', &format);
        ItemLabel {
            auction,
            components: TextComponent::from_legacy_text(&colored),
            hover: None,
        }
    }

    fn hover_event(&mut self, serializer: &dyn ItemSerializer) -> Option<HoverEvent> {
        let auction = self.auction;
        self.hover
            .get_or_insert_with(|| {
                let item = auction.reward().item()?;
                match serializer.serialize(item) {
                    Ok(json) => Some(HoverEvent::show_item(json)),
                    Err(err) => {
                        error!(
                            "Failed to serialize {} for its hover preview: {}",
                            item.id, err
                        );
                        None
                    }
                }
            })
            .clone()
    }

    /// The label wrapped in a single component that inherits `style`.
    fn component(
        &mut self,
        style: &TextComponent,
        serializer: &dyn ItemSerializer,
    ) -> TextComponent {
        let mut wrapper = style.styled_copy();
        wrapper.hover_event = self.hover_event(serializer);
        wrapper.extra = self.components.clone();
        wrapper
    }
}

fn generate_line(
    line: &str,
    item_label: Option<&mut ItemLabel<'_>>,
    serializer: &dyn ItemSerializer,
) -> RenderedLine {
    let components = TextComponent::from_legacy_text(line);

    // Only `[item]` is left to format into the components
    let Some(item_label) = item_label else {
        return components;
    };

    let mut formatted = Vec::with_capacity(components.len());
    for component in components {
        if !component.text.contains(ITEM) {
            formatted.push(component);
            continue;
        }

        let mut parts = component.text.split(ITEM);
        if let Some(first) = parts.next() {
            push_text(&mut formatted, &component, first);
        }
        for part in parts {
            formatted.push(item_label.component(&component, serializer));
            push_text(&mut formatted, &component, part);
        }
    }
    formatted
}

fn push_text(components: &mut RenderedLine, style: &TextComponent, text: &str) {
    if text.is_empty() {
        return;
    }
    let mut component = style.clone();
    component.text = text.to_string();
    components.push(component);
}
