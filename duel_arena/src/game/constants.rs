/// Number of cells on the 3x3 board.
pub const BOARD_CELLS: usize = 9;

/// Cell triples that win the game: three rows, three columns, two diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
