use super::*;

#[test]
fn higher_layer_wins_hit_test() {
    let mut tree = HitTree::new();
    tree.push(Node::new(
        Rect::new(0, 0, 10, 1),
        Sense::CLICK,
        NodeKind::BoxHeader { id: BoxId(1) },
    ));
    tree.push(Node::new(
        Rect::new(5, 0, 5, 1),
        Sense::CLICK,
        NodeKind::HeaderButton {
            id: BoxId(1),
            button: HeaderButton::Delete,
        },
    ));
    tree.push(
        Node::new(
            Rect::new(0, 0, 3, 3),
            Sense::CLICK,
            NodeKind::PickerItem { index: 0 },
        )
        .on_layer(1),
    );

    assert_eq!(
        tree.hit_test(Pos::new(6, 0)).map(|n| n.kind),
        Some(NodeKind::HeaderButton {
            id: BoxId(1),
            button: HeaderButton::Delete
        })
    );
    assert_eq!(
        tree.hit_test(Pos::new(1, 0)).map(|n| n.kind),
        Some(NodeKind::PickerItem { index: 0 })
    );
    assert_eq!(
        tree.hit_test(Pos::new(4, 0)).map(|n| n.kind),
        Some(NodeKind::BoxHeader { id: BoxId(1) })
    );
    assert!(tree.hit_test_with_sense(Pos::new(4, 0), Sense::SCROLL).is_none());
}

#[test]
fn header_buttons_depend_on_kind() {
    let header = Rect::new(0, 4, 40, 1);

    let file = header_buttons(header, BoxKind::File);
    let kinds: Vec<HeaderButton> = file.iter().map(|(b, _)| *b).collect();
    assert_eq!(
        kinds,
        vec![HeaderButton::Delete, HeaderButton::Copy, HeaderButton::AddChild]
    );
    assert_eq!(file[0].1, Rect::new(35, 4, 5, 1));
    assert_eq!(file[1].1, Rect::new(28, 4, 6, 1));
    assert_eq!(file[2].1, Rect::new(19, 4, 8, 1));

    let method = header_buttons(header, BoxKind::Method);
    assert_eq!(method.len(), 2);
    assert!(method.iter().all(|(b, _)| *b != HeaderButton::AddChild));
}

#[test]
fn narrow_header_drops_buttons() {
    let buttons = header_buttons(Rect::new(0, 0, 8, 1), BoxKind::Class);
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].0, HeaderButton::Delete);
}

#[test]
fn toolbar_lays_out_left_to_right() {
    let buttons = toolbar_buttons(Rect::new(0, 0, 80, 1));
    assert_eq!(buttons.len(), 4);
    assert_eq!(buttons[0], (ToolbarAction::AddFile, Rect::new(0, 0, 10, 1)));
    assert_eq!(buttons[1], (ToolbarAction::Save, Rect::new(11, 0, 6, 1)));
}

#[test]
fn title_rect_sits_after_kind_and_stops_before_buttons() {
    let header = Rect::new(4, 2, 40, 1);

    assert_eq!(
        header_title_rect(header, BoxKind::Class, "Greeter", 30),
        Some(Rect::new(12, 2, 7, 1))
    );
    assert_eq!(
        header_title_rect(header, BoxKind::File, "a_very_long_module_name.py", 20),
        Some(Rect::new(11, 2, 9, 1))
    );
    assert_eq!(header_title_rect(header, BoxKind::Method, "run", 10), None);
}
