use super::*;

#[test]
fn rect_contains_is_half_open() {
    let r = Rect::new(2, 3, 4, 5);
    assert!(r.contains(Pos::new(2, 3)));
    assert!(r.contains(Pos::new(5, 7)));
    assert!(!r.contains(Pos::new(6, 7)));
    assert!(!r.contains(Pos::new(5, 8)));
    assert!(!Rect::new(0, 0, 0, 3).contains(Pos::new(0, 0)));
}

#[test]
fn intersect_clips_to_overlap() {
    let a = Rect::new(0, 0, 10, 10);
    assert_eq!(a.intersect(Rect::new(5, 8, 10, 10)), Rect::new(5, 8, 5, 2));
    assert!(a.intersect(Rect::new(20, 20, 1, 1)).is_empty());
}
