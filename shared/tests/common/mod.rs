#![allow(dead_code)]

use stickyboard_shared::{
    Board, BoardConfig, Bounds, GridMeasure, ManualHost, MemoryStorage, Note, Point,
};

pub const START_MS: f64 = 1_700_000_000_000.0;

pub type TestBoard = Board<MemoryStorage, ManualHost>;

pub fn board(width: f64, height: f64) -> TestBoard {
    board_with(BoardConfig::default(), MemoryStorage::new(), width, height)
}

pub fn board_with(
    config: BoardConfig,
    storage: MemoryStorage,
    width: f64,
    height: f64,
) -> TestBoard {
    Board::open(
        config,
        storage,
        ManualHost::new(START_MS),
        Bounds::sized(width, height),
    )
}

/// Creates a note whose top-left corner lands on (x, y) for a 150px note.
pub fn note_at(board: &mut TestBoard, x: f64, y: f64) -> Note {
    board.host_mut().advance(1.0);
    let origin = board.bounds().origin();
    board.create_at(Point::new(origin.x + x + 75.0, origin.y + y + 75.0), None)
}

pub fn roomy() -> GridMeasure {
    GridMeasure::new(1000, 1000)
}
