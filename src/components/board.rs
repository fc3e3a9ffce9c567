use matchflow_api::GroupBucket;
use matchflow_api::planner::BracketMatch;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: home line, name line, away line.
pub const MATCH_HEIGHT: u16 = 3;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum match cell width in wider terminals.
const CELL_W_FULL: u16 = 26;

/// Slot height at bracket depth `d`: SH[0] = MATCH_HEIGHT; SH[d] = 2*SH[d-1] + 1.
fn slot_height(depth: usize) -> u16 {
    let mut h = MATCH_HEIGHT;
    for _ in 0..depth {
        h = 2 * h + 1;
    }
    h
}

// ---------------------------------------------------------------------------
// MatchCell — pre-computed position for one match
// ---------------------------------------------------------------------------

/// Pre-computed layout position for one match within the knockout board grid.
#[derive(Debug, Clone)]
pub struct MatchCell {
    /// Row index of the name line (center of the 3-row cell). Relative to the
    /// board origin; not scroll-adjusted.
    pub center_row: u16,
    /// Starting x-column for this cell within the grid (origin-relative).
    pub col: u16,
    pub cell_width: u16,
    /// Round column this cell belongs to (0 = first bracket round).
    pub round: usize,
    /// Index of this match within its round (0-based).
    pub match_idx: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid — layout engine for the knockout board
// ---------------------------------------------------------------------------

/// Pre-computed layout for a knockout board of arbitrary depth.
///
/// Unlike a fixed tournament template, the generated bracket's depth depends
/// on the shape parameters, so the grid is computed from the per-round match
/// counts. Center rows follow the triangle recurrence
///   center[d][i] = SH[d]/2 + i * (SH[d] + 1)
/// which puts every parent on the midpoint of its two children when the
/// rounds form a full binary tree. Manually appended matches simply extend a
/// column downward.
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// All cells in round-major order.
    pub cells: Vec<MatchCell>,
    /// Starting x-column for each round column.
    pub round_cols: Vec<u16>,
    /// Match count per round, as laid out.
    pub round_counts: Vec<usize>,
    #[allow(dead_code)]
    pub total_width: u16,
    /// Total grid height in board rows; bounds vertical scrolling.
    pub total_height: u16,
    pub cell_width: u16,
}

impl BracketGrid {
    /// Compute the board layout for the given per-round match counts and
    /// terminal width. Cell width shrinks to fit all round columns, down to a
    /// floor of 12 columns; beyond that the board relies on clipping.
    pub fn compute(round_counts: &[usize], terminal_width: u16) -> Self {
        let rounds = round_counts.len().max(1);
        let connector_total = CONNECTOR_WIDTH * (rounds as u16).saturating_sub(1);
        let per_col = terminal_width.saturating_sub(connector_total) / rounds as u16;
        let cell_width: u16 = per_col.clamp(12, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;

        let round_cols: Vec<u16> = (0..rounds).map(|d| stride * d as u16).collect();
        let total_width = stride * (rounds as u16 - 1) + cell_width;

        let mut cells = Vec::new();
        let mut total_height = 0u16;
        for (d, &count) in round_counts.iter().enumerate() {
            let sh = slot_height(d);
            let first_center = sh / 2;
            let spacing = sh + 1;
            for i in 0..count {
                let center_row = first_center + i as u16 * spacing;
                total_height = total_height.max(center_row + 2);
                cells.push(MatchCell {
                    center_row,
                    col: round_cols[d],
                    cell_width,
                    round: d,
                    match_idx: i,
                });
            }
        }

        Self {
            cells,
            round_cols,
            round_counts: round_counts.to_vec(),
            total_width,
            total_height,
            cell_width,
        }
    }

    /// Cells for one round column.
    pub fn cells_for_round(&self, round: usize) -> &[MatchCell] {
        let start: usize = self.round_counts.iter().take(round).sum();
        let end = start + self.round_counts.get(round).copied().unwrap_or(0);
        &self.cells[start..end]
    }
}

// ---------------------------------------------------------------------------
// BracketBoard widget
// ---------------------------------------------------------------------------

/// Renders the knockout board: one column per round, 3-row match cells,
/// box-drawing connectors from each pair of feeding matches to their parent.
pub struct BracketBoard<'a> {
    /// Matches per round, in generation order (no re-sorting).
    pub rounds: &'a [Vec<&'a BracketMatch>],
    /// Pre-computed layout. Rebuild when the bracket shape or width changes.
    pub grid: &'a BracketGrid,
    /// (round, match) of the highlighted cell.
    pub selected: Option<(usize, usize)>,
    /// Highlight the away line instead of the home line.
    pub selected_away: bool,
    /// Vertical scroll offset in terminal rows.
    pub scroll_offset: u16,
}

impl Widget for BracketBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 16 || area.height < MATCH_HEIGHT {
            return;
        }

        // Pass 1: match cells.
        for cell in &self.grid.cells {
            let m = self
                .rounds
                .get(cell.round)
                .and_then(|round| round.get(cell.match_idx))
                .copied();
            let selected = self.selected == Some((cell.round, cell.match_idx));
            draw_match_cell(
                m,
                cell,
                selected,
                self.selected_away,
                area,
                self.scroll_offset,
                buf,
            );
        }

        // Pass 2: connectors. Parent j at round d+1 is fed by matches 2j and
        // 2j+1 of round d; skip pairs that manual edits left incomplete.
        for d in 0..self.grid.round_counts.len().saturating_sub(1) {
            let child_cells = self.grid.cells_for_round(d);
            let parent_cells = self.grid.cells_for_round(d + 1);
            let conn_x_base = area.x + self.grid.round_cols[d] + self.grid.cell_width;

            for (j, parent) in parent_cells.iter().enumerate() {
                let (Some(child_top), Some(child_bot)) =
                    (child_cells.get(2 * j), child_cells.get(2 * j + 1))
                else {
                    continue;
                };
                draw_connector(
                    child_top.center_row,
                    parent.center_row,
                    child_bot.center_row,
                    conn_x_base,
                    area,
                    self.scroll_offset,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// GroupCard widget
// ---------------------------------------------------------------------------

/// Renders one group: a header line and one line per participant slot.
/// Empty slots show as `EMPTY SPOT`, matching the drafting board idiom.
pub struct GroupCard<'a> {
    pub group: &'a GroupBucket,
    /// Slot index to highlight, when this card holds the cursor.
    pub selected_slot: Option<usize>,
}

impl GroupCard<'_> {
    /// Rows this card needs: header + one per slot.
    pub fn height(group: &GroupBucket) -> u16 {
        group.participants.len() as u16 + 1
    }
}

impl Widget for GroupCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 8 || area.height < 2 {
            return;
        }
        let width = area.width as usize;

        let header_style = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
        let header: String = self.group.name.chars().take(width).collect();
        buf.set_string(area.x, area.y, &header, header_style);

        for (idx, slot) in self.group.participants.iter().enumerate() {
            let y = area.y + 1 + idx as u16;
            if y >= area.y + area.height {
                break;
            }
            let selected = self.selected_slot == Some(idx);
            let (text, style) = if slot.trim().is_empty() {
                (
                    format!("{:2}. EMPTY SPOT", idx + 1),
                    if selected {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                )
            } else {
                (
                    format!("{:2}. {slot}", idx + 1),
                    if selected {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    },
                )
            };
            let clipped: String = text.chars().take(width).collect();
            buf.set_string(area.x, y, &clipped, style);
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Convert a board-relative row to an absolute screen y, applying scroll +
/// area bounds. Returns `None` if the row is off-screen.
fn screen_y(board_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if board_row < scroll {
        return None;
    }
    let rel = board_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn draw_match_cell(
    m: Option<&BracketMatch>,
    cell: &MatchCell,
    selected: bool,
    selected_away: bool,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;

    let top_row = cell.center_row.saturating_sub(1);
    let mid_row = cell.center_row;
    let bot_row = cell.center_row.saturating_add(1);

    for (board_row, slot_idx) in [(top_row, 0u8), (mid_row, 1), (bot_row, 2)] {
        let Some(sy) = screen_y(board_row, scroll, area) else {
            continue;
        };

        let content = format_match_row(m, slot_idx, cell.cell_width as usize);
        let text: String = content.chars().take(avail_w).collect();

        let side_selected = selected
            && match slot_idx {
                0 => !selected_away,
                2 => selected_away,
                _ => false,
            };
        let style = match slot_idx {
            1 => {
                if selected {
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                }
            }
            _ => {
                if side_selected {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                }
            }
        };

        buf.set_string(x, sy, &text, style);
    }
}

/// Format one row of a match cell.
/// `slot_idx`: 0 = home line, 1 = name line, 2 = away line.
fn format_match_row(m: Option<&BracketMatch>, slot_idx: u8, width: usize) -> String {
    match m {
        None => " ".repeat(width),
        Some(m) => match slot_idx {
            0 => format_side_line(&m.home, width),
            2 => format_side_line(&m.away, width),
            _ => {
                let raw = format!(" {}", m.name);
                pad_to_width(&raw, width)
            }
        },
    }
}

/// Seed / placeholder line: `" A1 ..."`, blank side reads `EMPTY SPOT`.
fn format_side_line(side: &str, width: usize) -> String {
    let name = if side.trim().is_empty() { "EMPTY SPOT" } else { side };
    pad_to_width(&format!(" {name}"), width)
}

fn pad_to_width(raw: &str, width: usize) -> String {
    let padded = format!("{raw:<width$}");
    if padded.chars().count() > width {
        padded.chars().take(width).collect()
    } else {
        padded
    }
}

/// Draw box-drawing connectors between one parent and its two children.
///
/// ```text
///  child_top  ──┐         (col_a='─'  col_b='┐')
///               │         (col_b='│')
///  parent     ──├──       (col_a='─'  col_b='├'  col_c='─')
///               │         (col_b='│')
///  child_bot  ──┘         (col_a='─'  col_b='┘')
/// ```
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let style = Style::default().fg(Color::DarkGray);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    macro_rules! put {
        ($x:expr, $row:expr, $ch:expr) => {
            if $x < limit_x {
                if let Some(sy) = screen_y($row, scroll, area) {
                    put_char(buf, $x, sy, $ch, style);
                }
            }
        };
    }

    put!(col_a, r_top, '─');
    put!(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put!(col_b, row, '│');
    }
    put!(col_a, r_mid, '─');
    put!(col_b, r_mid, '├');
    put!(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put!(col_b, row, '│');
    }
    put!(col_a, r_bot, '─');
    put!(col_b, r_bot, '┘');
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use matchflow_api::planner::generate_groups_skeleton;

    #[test]
    fn test_slot_heights_follow_recurrence() {
        assert_eq!(slot_height(0), 3);
        assert_eq!(slot_height(1), 7);
        assert_eq!(slot_height(2), 15);
        assert_eq!(slot_height(3), 31);
    }

    #[test]
    fn test_grid_cell_count_for_bracket_of_eight() {
        let grid = BracketGrid::compute(&[4, 2, 1], 120);
        assert_eq!(grid.cells.len(), 7);
        assert_eq!(grid.round_cols.len(), 3);
    }

    #[test]
    fn test_first_round_centers() {
        let grid = BracketGrid::compute(&[4, 2, 1], 120);
        let centers: Vec<u16> = grid.cells_for_round(0).iter().map(|c| c.center_row).collect();
        assert_eq!(centers, vec![1, 5, 9, 13]);
    }

    #[test]
    fn test_second_round_centers() {
        let grid = BracketGrid::compute(&[4, 2, 1], 120);
        let centers: Vec<u16> = grid.cells_for_round(1).iter().map(|c| c.center_row).collect();
        assert_eq!(centers, vec![3, 11]);
    }

    #[test]
    fn test_final_center_is_tree_midpoint() {
        let grid = BracketGrid::compute(&[4, 2, 1], 120);
        let finals = grid.cells_for_round(2);
        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].center_row, 7);
    }

    #[test]
    fn test_parent_center_is_midpoint_of_children() {
        let grid = BracketGrid::compute(&[8, 4, 2, 1], 200);
        for depth in 0..3usize {
            let children = grid.cells_for_round(depth);
            let parents = grid.cells_for_round(depth + 1);
            for (j, parent) in parents.iter().enumerate() {
                let c_top = children[2 * j].center_row;
                let c_bot = children[2 * j + 1].center_row;
                assert_eq!(
                    parent.center_row,
                    (c_top + c_bot) / 2,
                    "depth={depth} parent={j}"
                );
            }
        }
    }

    #[test]
    fn test_grid_handles_uneven_round_counts() {
        // A manually appended third-place match next to the final.
        let grid = BracketGrid::compute(&[4, 2, 2], 120);
        let finals = grid.cells_for_round(2);
        assert_eq!(finals.len(), 2);
        assert_eq!(finals[0].center_row, 7);
        assert_eq!(finals[1].center_row, 7 + slot_height(2) + 1);
    }

    #[test]
    fn test_total_height_covers_lowest_cell() {
        let grid = BracketGrid::compute(&[4, 2, 1], 120);
        // Lowest cell is the last first-round match at center 13 -> bottom row 15.
        assert_eq!(grid.total_height, 15);
    }

    #[test]
    fn test_cell_width_shrinks_to_fit() {
        let narrow = BracketGrid::compute(&[4, 2, 1], 60);
        let wide = BracketGrid::compute(&[4, 2, 1], 300);
        assert!(narrow.cell_width < wide.cell_width);
        assert_eq!(wide.cell_width, CELL_W_FULL);
        assert!(narrow.cell_width >= 12);
    }

    #[test]
    fn test_round_columns_advance_by_stride() {
        let grid = BracketGrid::compute(&[4, 2, 1], 120);
        let stride = grid.cell_width + CONNECTOR_WIDTH;
        assert_eq!(grid.round_cols, vec![0, stride, stride * 2]);
    }

    #[test]
    fn test_format_side_line_width_and_placeholder() {
        let line = format_side_line("A1", 14);
        assert_eq!(line.chars().count(), 14);
        assert!(line.starts_with(" A1"));
        let empty = format_side_line("   ", 14);
        assert!(empty.contains("EMPTY SPOT"));
    }

    #[test]
    fn test_group_card_height() {
        let groups = generate_groups_skeleton(1, 4, &[]);
        assert_eq!(GroupCard::height(&groups[0]), 5);
    }
}
