//! The live court frame: canvas, position bars and proximity status.

use crate::{
    render::{HEADER, rule},
    state::{game::GameState, kinematics::TRACK_WIDTH, scoring::Band},
};

const COURT_ROWS: usize = 20;
const PLAYER_COLUMN: i64 = 25;
const PLAYER: char = '🧍';
const FREE_THROW_START: i64 = 15;
const FREE_THROW_END: i64 = 35;
/// Half width of the backboard around the hoop cell.
const BACKBOARD_REACH: i64 = 6;
const WIDTH: i64 = TRACK_WIDTH as i64;

/// One row of the court; writes outside the track are dropped.
struct Row {
    cells: Vec<char>,
}

impl Row {
    fn filled(fill: char) -> Self {
        Self {
            cells: vec![fill; TRACK_WIDTH],
        }
    }

    fn put(&mut self, x: i64, ch: char) {
        if let Some(cell) = usize::try_from(x).ok().and_then(|x| self.cells.get_mut(x)) {
            *cell = ch;
        }
    }

    /// Draw `left`, `fill`…, `right` over the inclusive span `[from, to]`.
    fn span(&mut self, from: i64, to: i64, left: char, fill: char, right: char) {
        for x in from..=to {
            let ch = if x == from {
                left
            } else if x == to {
                right
            } else {
                fill
            };
            self.put(x, ch);
        }
    }

    fn render(self) -> String {
        self.cells.into_iter().collect()
    }
}

/// Render the full aiming frame for `game`. Pure: equal games give equal frames.
pub fn frame(game: &GameState) -> String {
    let hoop_x = game.hoop.cell() as i64;
    let aim_x = game.aim.cell() as i64;

    let mut lines = Vec::with_capacity(COURT_ROWS + 9);
    lines.push(HEADER.to_string());
    lines.push("```".to_string());
    lines.push(rule());

    for y in 0..COURT_ROWS {
        let mut row = Row::filled(' ');
        draw_hoop(&mut row, hoop_x, y);
        match y {
            15 => row.put(aim_x, '▲'),
            16 => row.put(aim_x, '│'),
            17 => row.put(PLAYER_COLUMN, PLAYER),
            18 => {
                for x in FREE_THROW_START..=FREE_THROW_END {
                    row.put(x, '─');
                }
            }
            _ => {}
        }
        lines.push(row.render());
    }

    lines.push(rule());
    lines.push("```".to_string());
    lines.push(position_bar("HOOP:  ", hoop_x, '█'));
    lines.push(position_bar("AIM:   ", aim_x, '▲'));
    lines.push(String::new());
    lines.push(status_line(Band::from_distance(game.alignment_distance())).to_string());

    lines.join("\n")
}

/// Proximity hint shown under the bars while aiming.
pub fn status_line(band: Band) -> &'static str {
    match band {
        Band::Perfect => "🔥 **PERFECT ZONE! React with 🏀 NOW!** 🔥",
        Band::VeryClose => "🎯 **VERY CLOSE!** Almost perfect! 🎯",
        Band::Close => "⚠️ Getting closer...",
        Band::Miss => "⏱️ Wait for alignment...",
    }
}

fn position_bar(label: &str, x: i64, marker: char) -> String {
    let mut bar = Row::filled('░');
    bar.put(x, marker);
    format!("{label}[{}]", bar.render())
}

/// Backboard, target square, bracket, rim and net for court row `y`.
fn draw_hoop(row: &mut Row, x: i64, y: usize) {
    let left = x - BACKBOARD_REACH;
    let right = x + BACKBOARD_REACH;
    // The backboard is only drawn when it fits on the court as a whole.
    let board_fits = left >= 0 && right < WIDTH;

    match y {
        3 if board_fits => row.span(left, right, '╔', '═', '╗'),
        4..=7 => {
            if board_fits {
                row.span(left, right, '║', '▓', '║');
            }
            match y {
                5 => row.span(x - 1, x + 1, '╔', '═', '╗'),
                6 => {
                    row.put(x - 1, '║');
                    row.put(x + 1, '║');
                    row.put(x, ' ');
                }
                7 => row.span(x - 1, x + 1, '╚', '═', '╝'),
                _ => {}
            }
        }
        8 if board_fits => {
            row.span(left, right, '╚', '═', '╝');
            row.put(x, '╤');
        }
        9 => row.put(x, '│'),
        10 => row.put(x, '○'),
        11 => row.span(x - 1, x + 1, '═', '═', '═'),
        12 => row.span(x - 2, x + 2, '\\', '│', '/'),
        13 => row.span(x - 1, x + 1, '\\', '│', '/'),
        14 => row.put(x, 'V'),
        _ => {}
    }
}
