use super::*;

fn p(line: usize, character: usize) -> Position {
	Position::new(line, character)
}

#[test]
fn caret_selection() {
	let sel = Selection::caret(p(1, 4));
	assert!(sel.is_empty());
	assert!(!sel.is_reversed());
	assert_eq!(sel.range(), Range::empty(p(1, 4)));
}

#[test]
fn reversed_selection() {
	let sel = Selection::new(p(0, 9), p(0, 2));
	assert!(sel.is_reversed());
	assert_eq!(sel.start(), p(0, 2));
	assert_eq!(sel.end(), p(0, 9));
}

#[test]
fn reversed_selection_round_trips_direction() {
	let sel = Selection::new(p(2, 1), p(0, 0));
	let back = Selection::from_range(sel.range(), sel.is_reversed());
	assert_eq!(back, sel);
}

#[test]
fn with_range_keeps_direction() {
	let sel = Selection::new(p(0, 5), p(0, 1));
	let moved = sel.with_range(Range::from_coords(3, 0, 3, 7));
	assert_eq!(moved.anchor, p(3, 7));
	assert_eq!(moved.active, p(3, 0));
}

#[test]
fn flip_swaps_ends() {
	let sel = Selection::new(p(0, 1), p(0, 3));
	assert_eq!(sel.flip(), Selection::new(p(0, 3), p(0, 1)));
}
