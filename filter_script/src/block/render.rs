use filter_data::{BlockItem, ItemKind, ItemRarity, ItemValue};

/// Render one item as its line text, without indentation. Action items render
/// empty; the block renderer writes the action line itself.
pub(super) fn render_item(item: &BlockItem) -> String {
    let keyword = item.kind.keyword();
    match &item.value {
        ItemValue::Action { .. } => String::new(),
        ItemValue::Numeric(predicate) => {
            let operand = match ItemRarity::from_value(predicate.operand) {
                Some(rarity) if item.kind == ItemKind::Rarity => rarity.name().to_string(),
                _ => predicate.operand.to_string(),
            };
            format!("{keyword} {} {operand}", predicate.operator.symbol())
        },
        ItemValue::StringList(values) => {
            if values.is_empty() {
                return String::new();
            }
            let quoted: Vec<String> = values.iter().map(|value| format!("\"{value}\"")).collect();
            format!("{keyword} {}", quoted.join(" "))
        },
        ItemValue::Boolean(value) => format!("{keyword} {}", if *value { "True" } else { "False" }),
        ItemValue::Color { color, label } => match label {
            Some(label) => format!("{keyword} {color} # {label}"),
            None => format!("{keyword} {color}"),
        },
        ItemValue::Integer(value) => format!("{keyword} {value}"),
        ItemValue::Sound { id, volume } => format!("{keyword} {id} {volume}"),
        ItemValue::Presence { comment } => match comment {
            Some(comment) => format!("{keyword} # {comment}"),
            None => keyword.to_string(),
        },
    }
}
