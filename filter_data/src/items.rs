//! Block items: the typed conditions and styling actions inside a rule block.
//!
//! Every keyword the translator understands maps to one [`ItemKind`]. The kind
//! fixes the value shape, how many items of that kind a block may hold, the
//! order used when rendering, and (for numbers) the range the client accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default alpha applied when a colour line only carries RGB components.
pub const DEFAULT_ALPHA: u8 = 240;

/// Default volume for alert sounds written without an explicit volume.
pub const DEFAULT_SOUND_VOLUME: u16 = 79;

/// Loudest volume the client accepts for alert sounds.
pub const MAX_SOUND_VOLUME: u16 = 300;

/// What a rule block does with matching items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockAction {
    Show,
    Hide,
}

impl BlockAction {
    pub fn keyword(self) -> &'static str {
        match self {
            BlockAction::Show => "Show",
            BlockAction::Hide => "Hide",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "Show" => Some(BlockAction::Show),
            "Hide" => Some(BlockAction::Hide),
            _ => None,
        }
    }

    pub fn from_show(show: bool) -> Self {
        if show { BlockAction::Show } else { BlockAction::Hide }
    }

    pub fn is_show(self) -> bool {
        self == BlockAction::Show
    }
}

/// The shape of the value carried after an item keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Action,
    Numeric,
    StringList,
    Boolean,
    Color,
    Integer,
    Sound,
    Presence,
}

/// Static properties of one item kind.
#[derive(Debug, Clone, Copy)]
pub struct KindInfo {
    pub keyword: &'static str,
    pub shape: ValueShape,
    pub sort_order: u16,
    pub max_allowed: usize,
    /// Inclusive range accepted by the client for numeric and integer values.
    pub range: Option<(i32, i32)>,
}

const fn plain(keyword: &'static str, shape: ValueShape, sort_order: u16, max_allowed: usize) -> KindInfo {
    KindInfo {
        keyword,
        shape,
        sort_order,
        max_allowed,
        range: None,
    }
}

const fn ranged(keyword: &'static str, shape: ValueShape, sort_order: u16, min: i32, max: i32) -> KindInfo {
    let max_allowed = match shape {
        ValueShape::Numeric => 2,
        _ => 1,
    };
    KindInfo {
        keyword,
        shape,
        sort_order,
        max_allowed,
        range: Some((min, max)),
    }
}

/// Every kind of item a rule block may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Action,
    ItemLevel,
    DropLevel,
    Quality,
    Rarity,
    Sockets,
    LinkedSockets,
    Width,
    Height,
    GemLevel,
    MapTier,
    StackSize,
    Class,
    BaseType,
    SocketGroup,
    HasExplicitMod,
    Identified,
    Corrupted,
    ElderItem,
    ShaperItem,
    ShapedMap,
    ElderMap,
    SetTextColor,
    SetBackgroundColor,
    SetBorderColor,
    SetFontSize,
    PlayAlertSound,
    PlayAlertSoundPositional,
    DisableDropSound,
}

impl ItemKind {
    pub const ALL: [ItemKind; 29] = [
        ItemKind::Action,
        ItemKind::ItemLevel,
        ItemKind::DropLevel,
        ItemKind::Quality,
        ItemKind::Rarity,
        ItemKind::Sockets,
        ItemKind::LinkedSockets,
        ItemKind::Width,
        ItemKind::Height,
        ItemKind::GemLevel,
        ItemKind::MapTier,
        ItemKind::StackSize,
        ItemKind::Class,
        ItemKind::BaseType,
        ItemKind::SocketGroup,
        ItemKind::HasExplicitMod,
        ItemKind::Identified,
        ItemKind::Corrupted,
        ItemKind::ElderItem,
        ItemKind::ShaperItem,
        ItemKind::ShapedMap,
        ItemKind::ElderMap,
        ItemKind::SetTextColor,
        ItemKind::SetBackgroundColor,
        ItemKind::SetBorderColor,
        ItemKind::SetFontSize,
        ItemKind::PlayAlertSound,
        ItemKind::PlayAlertSoundPositional,
        ItemKind::DisableDropSound,
    ];

    pub const fn info(self) -> KindInfo {
        use ValueShape as S;
        match self {
            ItemKind::Action => plain("Show", S::Action, 0, 1),
            ItemKind::ItemLevel => ranged("ItemLevel", S::Numeric, 1, 0, 100),
            ItemKind::DropLevel => ranged("DropLevel", S::Numeric, 2, 0, 100),
            ItemKind::Quality => ranged("Quality", S::Numeric, 3, 0, 20),
            ItemKind::Rarity => ranged("Rarity", S::Numeric, 4, 0, 3),
            ItemKind::Class => plain("Class", S::StringList, 5, 1),
            ItemKind::BaseType => plain("BaseType", S::StringList, 6, 1),
            ItemKind::Sockets => ranged("Sockets", S::Numeric, 7, 0, 6),
            ItemKind::LinkedSockets => ranged("LinkedSockets", S::Numeric, 8, 0, 6),
            ItemKind::SocketGroup => plain("SocketGroup", S::StringList, 9, 1),
            ItemKind::Width => ranged("Width", S::Numeric, 10, 1, 2),
            ItemKind::Height => ranged("Height", S::Numeric, 11, 1, 4),
            ItemKind::Identified => plain("Identified", S::Boolean, 12, 1),
            ItemKind::Corrupted => plain("Corrupted", S::Boolean, 13, 1),
            ItemKind::ElderItem => plain("ElderItem", S::Boolean, 14, 1),
            ItemKind::ShaperItem => plain("ShaperItem", S::Boolean, 15, 1),
            ItemKind::ShapedMap => plain("ShapedMap", S::Boolean, 16, 1),
            ItemKind::ElderMap => plain("ElderMap", S::Boolean, 17, 1),
            ItemKind::GemLevel => ranged("GemLevel", S::Numeric, 18, 1, 21),
            ItemKind::MapTier => ranged("MapTier", S::Numeric, 19, 1, 17),
            ItemKind::StackSize => ranged("StackSize", S::Numeric, 20, 1, 1000),
            ItemKind::HasExplicitMod => plain("HasExplicitMod", S::StringList, 21, 1),
            ItemKind::SetTextColor => plain("SetTextColor", S::Color, 22, 1),
            ItemKind::SetBorderColor => plain("SetBorderColor", S::Color, 23, 1),
            ItemKind::SetBackgroundColor => plain("SetBackgroundColor", S::Color, 24, 1),
            ItemKind::SetFontSize => ranged("SetFontSize", S::Integer, 25, 11, 45),
            ItemKind::PlayAlertSound => plain("PlayAlertSound", S::Sound, 26, 1),
            ItemKind::PlayAlertSoundPositional => plain("PlayAlertSoundPositional", S::Sound, 27, 1),
            ItemKind::DisableDropSound => plain("DisableDropSound", S::Presence, 28, 1),
        }
    }

    pub fn keyword(self) -> &'static str {
        self.info().keyword
    }

    pub fn shape(self) -> ValueShape {
        self.info().shape
    }

    pub fn sort_order(self) -> u16 {
        self.info().sort_order
    }

    pub fn max_allowed(self) -> usize {
        self.info().max_allowed
    }

    pub fn range(self) -> Option<(i32, i32)> {
        self.info().range
    }

    /// Look up the kind for a property keyword. Action keywords are handled
    /// separately by the translator and never match here.
    ///
    /// ```
    /// use filter_data::ItemKind;
    ///
    /// assert_eq!(ItemKind::from_keyword("Quality"), Some(ItemKind::Quality));
    /// assert_eq!(ItemKind::from_keyword("Show"), None);
    /// assert_eq!(ItemKind::from_keyword("quality"), None);
    /// ```
    pub fn from_keyword(word: &str) -> Option<ItemKind> {
        ItemKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.shape() != ValueShape::Action && kind.keyword() == word)
    }

    /// Colour, font-size and sound items: the set replaced by a style paste.
    pub fn is_style(self) -> bool {
        matches!(self.shape(), ValueShape::Color | ValueShape::Integer | ValueShape::Sound)
    }

    /// Single-valued kinds where a later line replaces an earlier one instead
    /// of being rejected once the block is full.
    pub fn replaces_previous(self) -> bool {
        matches!(
            self.shape(),
            ValueShape::Boolean | ValueShape::Color | ValueShape::Integer | ValueShape::Sound | ValueShape::Presence
        )
    }

    /// The other kind sharing this kind's slot: the two alert sounds replace
    /// each other.
    pub fn shares_slot_with(self) -> Option<ItemKind> {
        match self {
            ItemKind::PlayAlertSound => Some(ItemKind::PlayAlertSoundPositional),
            ItemKind::PlayAlertSoundPositional => Some(ItemKind::PlayAlertSound),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Comparison operator of a numeric condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl FilterOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            FilterOperator::Equal => "=",
            FilterOperator::NotEqual => "!=",
            FilterOperator::Less => "<",
            FilterOperator::LessOrEqual => "<=",
            FilterOperator::Greater => ">",
            FilterOperator::GreaterOrEqual => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(FilterOperator::Equal),
            "!=" => Some(FilterOperator::NotEqual),
            "<" => Some(FilterOperator::Less),
            "<=" => Some(FilterOperator::LessOrEqual),
            ">" => Some(FilterOperator::Greater),
            ">=" => Some(FilterOperator::GreaterOrEqual),
            _ => None,
        }
    }
}

/// Operator plus integer operand, e.g. `>= 50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFilterPredicate {
    pub operator: FilterOperator,
    pub operand: i32,
}

impl NumericFilterPredicate {
    pub fn new(operator: FilterOperator, operand: i32) -> Self {
        Self { operator, operand }
    }
}

impl fmt::Display for NumericFilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator.symbol(), self.operand)
    }
}

/// Item rarities in ascending order; `Rarity` operands are written by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemRarity {
    Normal,
    Magic,
    Rare,
    Unique,
}

impl ItemRarity {
    pub fn name(self) -> &'static str {
        match self {
            ItemRarity::Normal => "Normal",
            ItemRarity::Magic => "Magic",
            ItemRarity::Rare => "Rare",
            ItemRarity::Unique => "Unique",
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(ItemRarity::Normal),
            1 => Some(ItemRarity::Magic),
            2 => Some(ItemRarity::Rare),
            3 => Some(ItemRarity::Unique),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [ItemRarity::Normal, ItemRarity::Magic, ItemRarity::Rare, ItemRarity::Unique]
            .into_iter()
            .find(|rarity| rarity.name().eq_ignore_ascii_case(name))
    }
}

/// RGBA colour used by the `Set*Color` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, DEFAULT_ALPHA)
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.a)
    }
}

/// Kind-specific payload of a block item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemValue {
    /// The action line itself; carries the literal trailing comment when block
    /// groups are not in use.
    Action { comment: Option<String> },
    Numeric(NumericFilterPredicate),
    StringList(Vec<String>),
    Boolean(bool),
    Color { color: Color, label: Option<String> },
    Integer(i32),
    Sound { id: String, volume: u16 },
    Presence { comment: Option<String> },
}

impl ItemValue {
    pub fn shape(&self) -> ValueShape {
        match self {
            ItemValue::Action { .. } => ValueShape::Action,
            ItemValue::Numeric(_) => ValueShape::Numeric,
            ItemValue::StringList(_) => ValueShape::StringList,
            ItemValue::Boolean(_) => ValueShape::Boolean,
            ItemValue::Color { .. } => ValueShape::Color,
            ItemValue::Integer(_) => ValueShape::Integer,
            ItemValue::Sound { .. } => ValueShape::Sound,
            ItemValue::Presence { .. } => ValueShape::Presence,
        }
    }
}

/// One condition or action line of a rule block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockItem {
    pub kind: ItemKind,
    pub value: ItemValue,
}

impl BlockItem {
    /// Pair a kind with a value. The value's shape must match the kind's.
    pub fn new(kind: ItemKind, value: ItemValue) -> Self {
        debug_assert_eq!(kind.shape(), value.shape(), "value shape does not match {kind}");
        Self { kind, value }
    }

    pub fn action(comment: Option<String>) -> Self {
        Self::new(ItemKind::Action, ItemValue::Action { comment })
    }

    pub fn numeric(kind: ItemKind, operator: FilterOperator, operand: i32) -> Self {
        Self::new(kind, ItemValue::Numeric(NumericFilterPredicate::new(operator, operand)))
    }

    pub fn boolean(kind: ItemKind, value: bool) -> Self {
        Self::new(kind, ItemValue::Boolean(value))
    }

    pub fn string_list<I, S>(kind: ItemKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(kind, ItemValue::StringList(values.into_iter().map(Into::into).collect()))
    }

    pub fn color(kind: ItemKind, color: Color, label: Option<String>) -> Self {
        Self::new(kind, ItemValue::Color { color, label })
    }

    pub fn font_size(size: i32) -> Self {
        Self::new(ItemKind::SetFontSize, ItemValue::Integer(size))
    }

    pub fn sound(positional: bool, id: impl Into<String>, volume: u16) -> Self {
        let kind = if positional {
            ItemKind::PlayAlertSoundPositional
        } else {
            ItemKind::PlayAlertSound
        };
        Self::new(kind, ItemValue::Sound { id: id.into(), volume })
    }

    pub fn presence(kind: ItemKind, comment: Option<String>) -> Self {
        Self::new(kind, ItemValue::Presence { comment })
    }

    pub fn sort_order(&self) -> u16 {
        self.kind.sort_order()
    }
}
