pub type Direction = (isize, isize);

pub const DIRECTIONS: [Direction; 8] = [
    (0, 1),   // right
    (1, 0),   // down
    (1, 1),   // down-right
    (1, -1),  // down-left
    (0, -1),  // left
    (-1, 0),  // up
    (-1, -1), // up-left
    (-1, 1),  // up-right
];
