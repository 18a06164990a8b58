use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// The section sign that prefixes every legacy formatting code.
pub const COLOR_CHAR: char = '§';

static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:https?://)?[-\w.]{2,}\.[a-z]{2,4}(?:/\S*)?$").unwrap());

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorCode {
    /// Codes are case insensitive, `&A` and `&a` are both green.
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code.to_ascii_lowercase() {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            ColorCode::Black => '0',
            ColorCode::DarkBlue => '1',
            ColorCode::DarkGreen => '2',
            ColorCode::DarkAqua => '3',
            ColorCode::DarkRed => '4',
            ColorCode::DarkPurple => '5',
            ColorCode::Gold => '6',
            ColorCode::Gray => '7',
            ColorCode::DarkGray => '8',
            ColorCode::Blue => '9',
            ColorCode::Green => 'a',
            ColorCode::Aqua => 'b',
            ColorCode::Red => 'c',
            ColorCode::LightPurple => 'd',
            ColorCode::Yellow => 'e',
            ColorCode::White => 'f',
            ColorCode::Obfuscated => 'k',
            ColorCode::Bold => 'l',
            ColorCode::Strikethrough => 'm',
            ColorCode::Underline => 'n',
            ColorCode::Italic => 'o',
            ColorCode::Reset => 'r',
        }
    }

    fn is_formatting(self) -> bool {
        use ColorCode::*;
        matches!(self, Obfuscated | Bold | Strikethrough | Underline | Italic)
    }
}

/// Replaces `alt_char` with [`COLOR_CHAR`] wherever it is directly followed by
/// a valid color or formatting code. Any other occurrence is left alone.
pub fn translate_alternate_color_codes(alt_char: char, text: &str) -> String {
    let mut translated = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == alt_char {
            if let Some(&next) = chars.peek() {
                if ColorCode::parse(next).is_some() {
                    translated.push(COLOR_CHAR);
                    continue;
                }
            }
        }
        translated.push(c);
    }
    translated
}

/// Removes every `§x` sequence that names a valid code.
pub fn strip_color(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == COLOR_CHAR {
            if let Some(&next) = chars.peek() {
                if ColorCode::parse(next).is_some() {
                    chars.next();
                    continue;
                }
            }
        }
        stripped.push(c);
    }
    stripped
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ClickEventType {
    OpenUrl,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    action: ClickEventType,
    value: String,
}

impl ClickEvent {
    pub fn open_url(url: impl Into<String>) -> ClickEvent {
        ClickEvent {
            action: ClickEventType::OpenUrl,
            value: url.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HoverAction {
    ShowText,
    ShowItem,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HoverEvent {
    pub action: HoverAction,
    pub value: Vec<TextComponent>,
}

impl HoverEvent {
    /// `item_json` is the serialized item, the client parses it out of the
    /// single text component.
    pub fn show_item(item_json: impl Into<String>) -> HoverEvent {
        HoverEvent {
            action: HoverAction::ShowItem,
            value: vec![TextComponent::from(item_json)],
        }
    }

    pub fn show_text(text: Vec<TextComponent>) -> HoverEvent {
        HoverEvent {
            action: HoverAction::ShowText,
            value: text,
        }
    }
}

/// This is only used for `TextComponent` serialize
#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(field: &bool) -> bool {
    !*field
}

pub struct TextComponentBuilder {
    component: TextComponent,
}

impl TextComponentBuilder {
    pub fn new(text: String) -> Self {
        let component = TextComponent {
            text,
            ..Default::default()
        };
        Self { component }
    }

    pub fn color_code(mut self, color: ColorCode) -> Self {
        self.component.color = Some(color);
        self
    }

    pub fn bold(mut self, val: bool) -> Self {
        self.component.bold = val;
        self
    }

    pub fn hover_event(mut self, event: HoverEvent) -> Self {
        self.component.hover_event = Some(event);
        self
    }

    pub fn extra(mut self, extra: Vec<TextComponent>) -> Self {
        self.component.extra = extra;
        self
    }

    pub fn finish(self) -> TextComponent {
        self.component
    }
}

#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub obfuscated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "clickEvent")]
    pub click_event: Option<ClickEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "hoverEvent")]
    pub hover_event: Option<HoverEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    /// Parses text containing `§` codes into a flat list of components.
    ///
    /// A color code starts a fresh component and clears any formatting, a
    /// formatting code is added on top of the current style. Words that look
    /// like links get an `open_url` click event.
    pub fn from_legacy_text(message: &str) -> Vec<TextComponent> {
        let mut components = Vec::new();
        let mut current = TextComponent::default();

        let mut chars = message.chars().peekable();
        while let Some(c) = chars.next() {
            if c == COLOR_CHAR {
                if let Some(code) = chars.peek().copied().and_then(ColorCode::parse) {
                    chars.next();
                    let style = current.styled_copy();
                    push_with_links(&mut components, std::mem::take(&mut current));
                    current = if code.is_formatting() {
                        style
                    } else if code == ColorCode::Reset {
                        TextComponent::default()
                    } else {
                        TextComponent {
                            color: Some(code),
                            ..Default::default()
                        }
                    };
                    match code {
                        ColorCode::Bold => current.bold = true,
                        ColorCode::Italic => current.italic = true,
                        ColorCode::Underline => current.underlined = true,
                        ColorCode::Strikethrough => current.strikethrough = true,
                        ColorCode::Obfuscated => current.obfuscated = true,
                        _ => {}
                    }
                    continue;
                }
            }
            current.text.push(c);
        }
        push_with_links(&mut components, current);

        if components.is_empty() {
            components.push(TextComponent::default());
        }
        components
    }

    /// Renders components back into `§` coded text, used for recipients that
    /// cannot display json chat.
    pub fn to_legacy_text(components: &[TextComponent]) -> String {
        let mut legacy = String::new();
        for component in components {
            component.write_legacy(&mut legacy);
        }
        legacy
    }

    /// The text of every component with all styling dropped.
    pub fn to_plain_text(components: &[TextComponent]) -> String {
        let mut plain = String::new();
        for component in components {
            component.write_plain(&mut plain);
        }
        plain
    }

    fn write_legacy(&self, out: &mut String) {
        if let Some(color) = self.color {
            out.push(COLOR_CHAR);
            out.push(color.code());
        }
        let flags = [
            (self.bold, ColorCode::Bold),
            (self.italic, ColorCode::Italic),
            (self.underlined, ColorCode::Underline),
            (self.strikethrough, ColorCode::Strikethrough),
            (self.obfuscated, ColorCode::Obfuscated),
        ];
        for (set, code) in flags {
            if set {
                out.push(COLOR_CHAR);
                out.push(code.code());
            }
        }
        out.push_str(&self.text);
        for child in &self.extra {
            child.write_legacy(out);
        }
    }

    fn write_plain(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.extra {
            child.write_plain(out);
        }
    }

    /// A copy of this component's style without text or children.
    pub fn styled_copy(&self) -> TextComponent {
        TextComponent {
            text: String::new(),
            extra: Vec::new(),
            ..self.clone()
        }
    }

    pub fn encode_json(&self) -> String {
        // Every field is a string, bool or nested component, none of which can fail
        serde_json::to_string(self).unwrap()
    }

    /// Wraps a whole line into one root component, the shape chat packets expect.
    pub fn encode_line_json(components: &[TextComponent]) -> String {
        TextComponent {
            extra: components.to_vec(),
            ..Default::default()
        }
        .encode_json()
    }

    pub fn is_text_only(&self) -> bool {
        !self.bold
            && !self.italic
            && !self.underlined
            && !self.strikethrough
            && !self.obfuscated
            && self.color.is_none()
            && self.click_event.is_none()
            && self.hover_event.is_none()
    }
}

/// Pushes `component`, splitting out any link-shaped words into their own
/// clickable components. Empty components are dropped.
fn push_with_links(components: &mut Vec<TextComponent>, component: TextComponent) {
    if component.text.is_empty() {
        return;
    }

    let mut buffer = String::new();
    for word in component.text.split_inclusive(' ') {
        let trimmed = word.trim_end_matches(' ');
        if !trimmed.is_empty() && URL_REGEX.is_match(trimmed) {
            if !buffer.is_empty() {
                let mut plain = component.styled_copy();
                plain.text = std::mem::take(&mut buffer);
                components.push(plain);
            }
            let url = if trimmed.starts_with("http") {
                trimmed.to_string()
            } else {
                format!("http://{}", trimmed)
            };
            let mut link = component.styled_copy();
            link.text = trimmed.to_string();
            link.click_event = Some(ClickEvent::open_url(url));
            components.push(link);
            buffer.push_str(&word[trimmed.len()..]);
        } else {
            buffer.push_str(word);
        }
    }
    if !buffer.is_empty() {
        let mut plain = component.styled_copy();
        plain.text = buffer;
        components.push(plain);
    }
}

impl<S> From<S> for TextComponent
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        TextComponent {
            text: value.into(),
            ..Default::default()
        }
    }
}
