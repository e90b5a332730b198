mod common;

use common::{board, board_with, note_at, roomy};
use stickyboard_shared::{
    ActionType, BoardConfig, Bounds, EditOrigin, MemoryStorage, Point, PointerDevice, UndoOutcome,
};

#[test]
fn undo_after_a_single_create_restores_the_empty_board() {
    let mut board = board(1000.0, 800.0);
    board.create_at(Point::new(200.0, 200.0), None);
    assert_eq!(board.notes().len(), 1);

    assert_eq!(board.undo(), UndoOutcome::Restored);
    assert!(board.notes().is_empty());
    assert_eq!(board.undo(), UndoOutcome::Exhausted);
}

#[test]
fn undo_after_create_keeps_existing_notes_exactly() {
    let mut board = board(1000.0, 800.0);
    note_at(&mut board, 10.0, 20.0);
    note_at(&mut board, 300.0, 40.0);
    let before = board.notes().to_vec();

    note_at(&mut board, 500.0, 500.0);
    board.undo();
    assert_eq!(board.notes(), before.as_slice());
}

#[test]
fn undoing_each_edit_walks_back_to_the_first_text() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    board
        .edit_content(&note.id, "draft", EditOrigin::Programmatic, &roomy())
        .unwrap();
    // programmatic writes are not undo steps
    let first = board.note(&note.id).unwrap().content.clone();
    assert_eq!(first, "draft");

    let edits = ["draft!", "draft!!", "buy milk", "buy milk and eggs"];
    for text in edits {
        board
            .edit_content(&note.id, text, EditOrigin::User, &roomy())
            .unwrap();
    }
    assert_eq!(board.note(&note.id).unwrap().content, "buy milk and eggs");

    for expected in ["buy milk", "draft!!", "draft!"] {
        board.undo();
        assert_eq!(board.note(&note.id).unwrap().content, expected);
    }
    board.undo();
    assert_eq!(board.note(&note.id).unwrap().content, first);
}

#[test]
fn unchanged_text_does_not_add_history() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    board
        .edit_content(&note.id, "same", EditOrigin::User, &roomy())
        .unwrap();
    let entries = board.history().len();
    board
        .edit_content(&note.id, "same", EditOrigin::User, &roomy())
        .unwrap();
    assert_eq!(board.history().len(), entries);
}

#[test]
fn history_is_capped_and_drops_the_oldest_entries() {
    let config = BoardConfig {
        max_history: 5,
        ..BoardConfig::default()
    };
    let mut board = board_with(config, MemoryStorage::new(), 1000.0, 800.0);
    let note = note_at(&mut board, 0.0, 0.0);
    for n in 0..20 {
        board.host_mut().advance(10.0);
        board
            .edit_content(&note.id, &format!("v{n}"), EditOrigin::User, &roomy())
            .unwrap();
        assert!(board.history().len() <= 5);
    }

    assert_eq!(board.history().len(), 5);
    assert!(board
        .history()
        .entries()
        .all(|entry| entry.action_type() == ActionType::Edit));
    let stamps: Vec<f64> = board.history().entries().map(|e| e.timestamp).collect();
    assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));

    for _ in 0..4 {
        assert_ne!(board.undo(), UndoOutcome::Exhausted);
    }
    assert_eq!(board.note(&note.id).unwrap().content, "v15");
    assert_eq!(board.undo(), UndoOutcome::Exhausted);
}

#[test]
fn new_action_after_undo_discards_the_undone_branch() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 0.0, 0.0);
    board
        .edit_content(&note.id, "a", EditOrigin::User, &roomy())
        .unwrap();
    board
        .edit_content(&note.id, "ab", EditOrigin::User, &roomy())
        .unwrap();
    board.undo();
    board
        .edit_content(&note.id, "ax", EditOrigin::User, &roomy())
        .unwrap();

    let history = board.history();
    assert_eq!(history.current_index(), Some(history.len() - 1));
    let kinds: Vec<ActionType> = history.entries().map(|e| e.action_type()).collect();
    assert_eq!(
        kinds,
        vec![
            ActionType::Load,
            ActionType::Create,
            ActionType::Edit,
            ActionType::Edit
        ]
    );
    board.undo();
    assert_eq!(board.note(&note.id).unwrap().content, "a");
}

#[test]
fn undoing_a_move_only_puts_that_note_back() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    board.select(&note.id).unwrap();

    board
        .begin_drag(&note.id, PointerDevice::Mouse, Point::new(120.0, 110.0))
        .unwrap();
    board.drag_to(Point::new(200.0, 150.0));
    board.drag_to(Point::new(420.0, 310.0));
    let dropped = board.end_drag().unwrap();
    assert_eq!((dropped.x, dropped.y), (400.0, 300.0));
    assert_eq!(dropped.x_percent, Some(40.0));

    assert_eq!(board.undo(), UndoOutcome::Moved(note.id.clone()));
    let restored = board.note(&note.id).unwrap();
    assert_eq!((restored.x, restored.y), (100.0, 100.0));
    assert_eq!(restored.x_percent, note.x_percent);
    assert_eq!(
        board.notes(),
        board.history().current().unwrap().notes.as_slice()
    );
    assert_eq!(board.selected(), Some(&note.id));
}

#[test]
fn micro_drags_save_the_position_without_an_undo_step() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    let entries = board.history().len();
    let saves = board.storage().saves();

    board
        .begin_drag(&note.id, PointerDevice::Touch, Point::new(150.0, 150.0))
        .unwrap();
    board.drag_to(Point::new(153.0, 146.0));
    board.end_drag();

    assert_eq!(board.history().len(), entries);
    assert_eq!(board.storage().saves(), saves + 1);
    let moved = board.note(&note.id).unwrap();
    assert_eq!((moved.x, moved.y), (103.0, 96.0));
}

#[test]
fn drops_outside_the_board_are_clamped_before_recording() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    board
        .begin_drag(&note.id, PointerDevice::Mouse, Point::new(100.0, 100.0))
        .unwrap();
    board.drag_to(Point::new(-300.0, 5000.0));
    let dropped = board.end_drag().unwrap();
    assert_eq!((dropped.x, dropped.y), (0.0, 650.0));
    match &board.history().current().unwrap().details {
        stickyboard_shared::ActionDetails::Move {
            prev_x,
            prev_y,
            new_x,
            new_y,
            ..
        } => assert_eq!((*prev_x, *prev_y, *new_x, *new_y), (100.0, 100.0, 0.0, 650.0)),
        other => panic!("expected a move, got {other:?}"),
    }
}

#[test]
fn only_one_drag_at_a_time() {
    let mut board = board(1000.0, 800.0);
    let first = note_at(&mut board, 0.0, 0.0);
    let second = note_at(&mut board, 300.0, 300.0);
    assert!(board
        .begin_drag(&first.id, PointerDevice::Mouse, Point::new(10.0, 10.0))
        .unwrap());
    assert!(!board
        .begin_drag(&second.id, PointerDevice::Touch, Point::new(310.0, 310.0))
        .unwrap());
    board.end_drag();
    assert!(!board.is_dragging());
    assert!(board.end_drag().is_none());
}

#[test]
fn move_undo_after_a_resize_falls_back_to_a_full_restore() {
    let mut board = board(1000.0, 800.0);
    let moved = note_at(&mut board, 100.0, 100.0);
    let other = note_at(&mut board, 600.0, 400.0);
    board
        .begin_drag(&moved.id, PointerDevice::Mouse, Point::new(100.0, 100.0))
        .unwrap();
    board.drag_to(Point::new(300.0, 100.0));
    board.end_drag();

    board.resize(Bounds::sized(500.0, 400.0));
    assert_eq!(board.undo(), UndoOutcome::Restored);

    let other_now = board.note(&other.id).unwrap();
    assert_eq!((other_now.x, other_now.y), (300.0, 200.0));
    let moved_now = board.note(&moved.id).unwrap();
    assert_eq!((moved_now.x, moved_now.y), (50.0, 50.0));
    assert_eq!(board.selected(), None);
}

#[test]
fn deleted_notes_come_back_with_undo() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    board
        .edit_content(&note.id, "keep me", EditOrigin::User, &roomy())
        .unwrap();
    let before = board.notes().to_vec();

    let removed = board.delete_note(&note.id).unwrap();
    assert_eq!(removed.content, "keep me");
    assert!(board.notes().is_empty());
    match &board.history().current().unwrap().details {
        stickyboard_shared::ActionDetails::Delete { note } => assert_eq!(note.content, "keep me"),
        other => panic!("expected a delete, got {other:?}"),
    }

    board.undo();
    assert_eq!(board.notes(), before.as_slice());
}

#[test]
fn undo_in_the_middle_of_a_drag_ends_the_gesture() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    board
        .begin_drag(&note.id, PointerDevice::Mouse, Point::new(100.0, 100.0))
        .unwrap();
    board.drag_to(Point::new(400.0, 300.0));
    board.end_drag();

    board
        .begin_drag(&note.id, PointerDevice::Mouse, Point::new(400.0, 300.0))
        .unwrap();
    board.drag_to(Point::new(500.0, 500.0));
    board.undo();

    assert!(!board.is_dragging());
    assert_eq!(board.drag_to(Point::new(700.0, 700.0)), None);
    let restored = board.note(&note.id).unwrap();
    assert_eq!((restored.x, restored.y), (100.0, 100.0));
}

#[test]
fn a_release_from_another_device_keeps_the_drag_going() {
    let mut board = board(1000.0, 800.0);
    let note = note_at(&mut board, 100.0, 100.0);
    board
        .begin_drag(&note.id, PointerDevice::Touch, Point::new(100.0, 100.0))
        .unwrap();
    board.drag_to(Point::new(300.0, 100.0));

    assert!(board.release_pointer(PointerDevice::Mouse).is_none());
    assert!(board.is_dragging());
    board.drag_to(Point::new(400.0, 200.0));

    let dropped = board.release_pointer(PointerDevice::Touch).unwrap();
    assert_eq!((dropped.x, dropped.y), (400.0, 200.0));
    assert!(!board.is_dragging());
    assert_eq!(
        board.history().current().unwrap().action_type(),
        ActionType::Move
    );
}
