use filter_data::{BlockAction, Color, ItemKind, ItemValue, Script, Segment};
use filter_script::{parse_block, render_block, replace_style_items_from_text};

#[test]
fn pasted_block_joins_existing_groups() {
    let mut script = Script::new();
    let first = parse_block("Show # Flasks - Utility\r\n    Class \"Utility Flasks\"", &mut script).expect("parse");
    script.segments.push(Segment::Rule(first));

    let pasted = parse_block("#Hide # Flasks - Utility\n#    Quality < 10", &mut script).expect("parse");
    assert_eq!(pasted.action, BlockAction::Hide);
    assert!(!pasted.enabled);

    let flasks = script.groups.find_child(script.groups.root(), "Flasks").expect("Flasks");
    let utility = script.groups.find_child(flasks, "Utility").expect("Utility");
    assert_eq!(script.groups.named_children(flasks).count(), 1);
    assert_eq!(pasted.group.and_then(|leaf| script.groups[leaf].parent), Some(utility));

    assert_eq!(
        render_block(&pasted, &script.groups),
        "#Hide # Flasks - Utility\r\n#    Quality < 10"
    );
}

#[test]
fn rendered_blocks_survive_a_second_trip() {
    let text = "# Six links\nShow # Gear - ~Links\n LinkedSockets 6\n SocketGroup RRGGBB\n SetBackgroundColor 0 0 0\n \
                PlayAlertSoundPositional 6 300\n Width <= 2\n Height 4";
    let mut script = Script::new();
    let block = parse_block(text, &mut script).expect("parse");
    let once = render_block(&block, &script.groups);

    let mut fresh = Script::new();
    let again = parse_block(&once, &mut fresh).expect("reparse");
    assert_eq!(render_block(&again, &fresh.groups), once);
    assert_eq!(again.description.as_deref(), Some("Six links"));
    assert_eq!(again.items.len(), block.items.len());
}

#[test]
fn style_paste_keeps_conditions() {
    let mut script = Script::new();
    let mut block = parse_block("Show\n ItemLevel > 80\n SetFontSize 30\n SetTextColor 9 9 9", &mut script).expect("parse");

    replace_style_items_from_text(
        &mut block.items,
        "SetTextColor 250 250 250 # Bright\nSetFontSize 42",
        &mut script.theme,
    );

    assert_eq!(block.count_of(ItemKind::ItemLevel), 1);
    assert_eq!(
        block.items_of(ItemKind::SetTextColor).map(|i| i.value.clone()).collect::<Vec<_>>(),
        vec![ItemValue::Color { color: Color::rgb(250, 250, 250), label: Some("Bright".into()) }]
    );
    assert_eq!(
        block.items_of(ItemKind::SetFontSize).map(|i| i.value.clone()).collect::<Vec<_>>(),
        vec![ItemValue::Integer(42)]
    );
}
