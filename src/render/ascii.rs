//! Text board for terminals

use super::{parse_square, BoardRenderer};

/// Renderer that keeps the latest board state and draws it as text.
///
/// Highlighted squares are drawn in brackets, arrows are listed under the board.
#[derive(Debug, Clone, Default)]
pub struct AsciiBoard {
    fen: String,
    highlights: Vec<String>,
    arrows: Vec<(String, String)>,
    revision: u64,
}

impl AsciiBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    /// Incremented on every renderer call; lets callers redraw only on change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn draw(&self) -> String {
        let mut out = String::new();

        match placement_grid(&self.fen) {
            Some(grid) => {
                let mut marked = [[false; 8]; 8];
                for (file, rank) in self.highlights.iter().filter_map(|s| parse_square(s)) {
                    marked[rank as usize][file as usize] = true;
                }
                for rank in (0..8).rev() {
                    out.push_str(&format!("{} ", rank + 1));
                    for file in 0..8 {
                        let piece = grid[rank][file].unwrap_or('.');
                        if marked[rank][file] {
                            out.push_str(&format!("[{}]", piece));
                        } else {
                            out.push_str(&format!(" {} ", piece));
                        }
                    }
                    out.push('\n');
                }
                out.push_str("   a  b  c  d  e  f  g  h\n");
            }
            None => {
                out.push_str(&format!("(unreadable position) {}\n", self.fen));
            }
        }

        for (from, to) in &self.arrows {
            out.push_str(&format!("arrow {} -> {}\n", from, to));
        }

        out
    }
}

/// Piece grid from a FEN placement field, indexed `[rank][file]` from a1.
fn placement_grid(fen: &str) -> Option<[[Option<char>; 8]; 8]> {
    let placement = fen.split_whitespace().next()?;
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return None;
    }

    let mut grid = [[None; 8]; 8];
    for (row_index, row) in rows.iter().enumerate() {
        let rank = 7 - row_index;
        let mut file = 0usize;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
            } else if "pnbrqkPNBRQK".contains(c) {
                if file >= 8 {
                    return None;
                }
                grid[rank][file] = Some(c);
                file += 1;
            } else {
                return None;
            }
        }
        if file != 8 {
            return None;
        }
    }
    Some(grid)
}

impl BoardRenderer for AsciiBoard {
    fn set_position(&mut self, fen: &str) {
        self.fen = fen.to_string();
        self.revision += 1;
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
        self.revision += 1;
    }

    fn add_highlight(&mut self, square: &str) {
        self.highlights.push(square.to_string());
        self.revision += 1;
    }

    fn clear_arrows(&mut self) {
        self.arrows.clear();
        self.revision += 1;
    }

    fn add_arrow(&mut self, from: &str, to: &str) {
        self.arrows.push((from.to_string(), to.to_string()));
        self.revision += 1;
    }
}
