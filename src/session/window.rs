// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-window viewport state: line addressing, scrolling, point movement.

use std::sync::Arc;

use memchr::memchr_iter;
use smol_str::SmolStr;

use crate::model::Node;

/// What the renderer must do after a viewport mutation.
///
/// `Scroll` is chosen only when shifting the existing rows is cheaper than
/// repainting; the exact threshold is a performance heuristic, not a
/// correctness contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    None,
    /// Shift the viewport by this many lines (positive = content moves up).
    Scroll { lines: i32 },
    Full,
}

/// History entry: where a window was before a node-changing navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowState {
    pub filename: SmolStr,
    pub nodename: SmolStr,
    pub page_top: usize,
    pub point: usize,
}

/// Column → byte-offset map for a single line, computed lazily for the line
/// containing point and never for off-screen lines.
#[derive(Debug, Default, Clone)]
struct LineMap {
    stamp: u64,
    line: usize,
    offsets: Vec<usize>,
    valid: bool,
}

/// One window over one node's contents.
///
/// Addressing is by byte offset ("point") and by physical line index;
/// `page_top` is the first visible line and is kept within
/// `[0, line_count - 1]`, with point actively relocated into the visible
/// range on every page move.
#[derive(Debug)]
pub struct Window {
    filename: SmolStr,
    nodename: SmolStr,
    contents: Arc<str>,
    line_starts: Vec<usize>,
    page_top: usize,
    point: usize,
    goal_column: Option<usize>,
    history: Vec<WindowState>,
    line_map: LineMap,
    height: usize,
    width: usize,
    // Bumped on node switch so a stale line map can never be reused.
    stamp: u64,
}

impl Window {
    pub fn new(node: &Node, height: usize, width: usize) -> Self {
        let contents = node.contents_arc();
        let line_starts = compute_line_starts(&contents);
        Self {
            filename: SmolStr::new(node.filename()),
            nodename: SmolStr::new(node.name()),
            contents,
            line_starts,
            page_top: 0,
            point: 0,
            goal_column: None,
            history: Vec::new(),
            line_map: LineMap::default(),
            height,
            width,
            stamp: 0,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn nodename(&self) -> &str {
        &self.nodename
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn page_top(&self) -> usize {
        self.page_top
    }

    pub fn point(&self) -> usize {
        self.point
    }

    /// Places point directly; offsets past the end clamp to it.
    pub fn set_point(&mut self, point: usize) {
        self.point = point.min(self.contents.len());
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn resize(&mut self, height: usize, width: usize) {
        self.height = height;
        self.width = width;
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }

    /// Displays another node, resetting view state. History is the caller's
    /// concern ([`Window::push_history`] before switching).
    pub fn set_node(&mut self, node: &Node) {
        self.filename = SmolStr::new(node.filename());
        self.nodename = SmolStr::new(node.name());
        self.contents = node.contents_arc();
        self.line_starts = compute_line_starts(&self.contents);
        self.page_top = 0;
        self.point = 0;
        self.goal_column = None;
        self.line_map = LineMap::default();
        self.stamp += 1;
    }

    pub fn push_history(&mut self) {
        self.history.push(WindowState {
            filename: self.filename.clone(),
            nodename: self.nodename.clone(),
            page_top: self.page_top,
            point: self.point,
        });
    }

    pub fn pop_history(&mut self) -> Option<WindowState> {
        self.history.pop()
    }

    pub fn history(&self) -> &[WindowState] {
        &self.history
    }

    /// Restores a scroll/point position recorded before a node change. The
    /// caller has already re-attached the node this state refers to.
    pub fn restore(&mut self, state: &WindowState) {
        let max_top = self.line_count() - 1;
        self.page_top = state.page_top.min(max_top);
        self.point = state.point.min(self.contents.len());
        self.goal_column = None;
    }

    /// Greatest line index whose start is at or before `point`.
    pub fn line_of_point(&self) -> usize {
        self.line_of(self.point)
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset) - 1
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line.min(self.line_count() - 1)]
    }

    fn line_end(&self, line: usize) -> usize {
        self.line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.contents.len())
    }

    /// Sets the first visible line, enforcing the viewport invariants.
    ///
    /// The desired value clamps to `[0, line_count - 1]`; setting the current
    /// value is a no-op with no side effects. Otherwise point is relocated
    /// onto the first or last visible line when the move pushed it off
    /// screen, and the cheaper of a partial scroll and a full repaint is
    /// chosen.
    pub fn set_page_top(&mut self, desired: isize) -> Redraw {
        let max_top = (self.line_count() - 1) as isize;
        let desired = desired.clamp(0, max_top) as usize;
        if desired == self.page_top {
            return Redraw::None;
        }

        let old = self.page_top;
        self.page_top = desired;

        // Make sure point still appears inside this window.
        let point_line = self.line_of_point();
        if point_line < desired {
            self.point = self.line_starts[desired];
        } else if point_line >= desired + self.height {
            let bottom = desired + self.height.saturating_sub(1);
            self.point = self.line_starts[bottom.min(self.line_count() - 1)];
        }

        // Scroll only when it saves refresh time: more than one line (no
        // status-line flicker while a movement key repeats), less than a
        // window's worth, and small enough relative to the height that
        // shifting beats repainting. Heuristic, not contract.
        let amount = old.abs_diff(desired);
        if self.height > 0
            && amount > 1
            && amount < self.height
            && (self.height - amount) * 10 >= self.height
        {
            Redraw::Scroll {
                lines: desired as i32 - old as i32,
            }
        } else {
            Redraw::Full
        }
    }

    /// Column of point within its line, through the lazily built line map.
    pub fn cursor_column(&mut self) -> usize {
        self.compute_line_map();
        let offsets = &self.line_map.offsets;
        if self.point <= offsets[0] {
            return 0;
        }
        offsets.partition_point(|&offset| offset <= self.point) - 1
    }

    /// Row/column of the cursor relative to the visible page, when point is
    /// on screen.
    pub fn cursor_position(&mut self) -> Option<(usize, usize)> {
        let line = self.line_of_point();
        if line < self.page_top || line >= self.page_top + self.height.max(1) {
            return None;
        }
        let column = self.cursor_column();
        Some((line - self.page_top, column))
    }

    fn compute_line_map(&mut self) {
        let line = self.line_of_point();
        if self.line_map.valid && self.line_map.stamp == self.stamp && self.line_map.line == line {
            return;
        }

        let start = self.line_starts[line];
        let end = self.line_end(line);
        let mut offsets: Vec<usize> = self.contents[start..end]
            .char_indices()
            .filter(|&(_, c)| c != '\n')
            .map(|(at, _)| start + at)
            .collect();
        if offsets.is_empty() {
            // An empty line still has an addressable column zero.
            offsets.push(start);
        }
        // TODO: account for double-width characters when mapping columns.
        self.line_map = LineMap {
            stamp: self.stamp,
            line,
            offsets,
            valid: true,
        };
    }

    /// Seeds the goal column on the first vertical move of a run.
    pub fn seed_goal_column(&mut self) {
        if self.goal_column.is_none() {
            self.goal_column = Some(self.cursor_column());
        }
    }

    /// Any non-vertical command forgets the goal column.
    pub fn clear_goal_column(&mut self) {
        self.goal_column = None;
    }

    pub fn goal_column(&self) -> Option<usize> {
        self.goal_column
    }

    /// Moves point to the start of the next physical line; `false` at the
    /// last line.
    pub fn point_next_line(&mut self) -> bool {
        let line = self.line_of_point();
        if line + 1 >= self.line_count() {
            return false;
        }
        self.point = self.line_starts[line + 1];
        true
    }

    /// Moves point to the start of the previous physical line; `false` at
    /// the first line.
    pub fn point_prev_line(&mut self) -> bool {
        let line = self.line_of_point();
        if line == 0 {
            return false;
        }
        self.point = self.line_starts[line - 1];
        true
    }

    /// Re-applies the goal column on the line now containing point, clamped
    /// to the line's width so short lines do not lose the column.
    pub fn move_to_goal(&mut self) {
        let Some(goal) = self.goal_column else {
            return;
        };
        self.compute_line_map();
        let column = goal.min(self.line_map.offsets.len() - 1);
        self.point = self.line_map.offsets[column];
    }

    /// Moves point one column right, wrapping to the next line start past
    /// the end of line.
    pub fn point_forward_char(&mut self) {
        self.compute_line_map();
        let last = *self.line_map.offsets.last().expect("line map is never empty");
        if self.point >= last {
            let line = self.line_of_point();
            if line + 1 < self.line_count() {
                self.point = self.line_starts[line + 1];
            }
            return;
        }
        let column = self.cursor_column();
        self.point = self.line_map.offsets[column + 1];
    }

    /// Moves point one column left, wrapping to the previous line end.
    pub fn point_backward_char(&mut self) {
        let column = self.cursor_column();
        if column > 0 {
            self.point = self.line_map.offsets[column - 1];
            return;
        }
        let line = self.line_of_point();
        if line > 0 {
            self.point = self.line_starts[line - 1];
            self.compute_line_map();
            self.point = *self.line_map.offsets.last().expect("line map is never empty");
        }
    }

    pub fn point_beginning_of_line(&mut self) {
        self.compute_line_map();
        self.point = self.line_map.offsets[0];
    }

    pub fn point_end_of_line(&mut self) {
        self.compute_line_map();
        self.point = *self.line_map.offsets.last().expect("line map is never empty");
    }

    /// Scrolls so that point is visible, recentering when it left the page.
    pub fn show_point(&mut self) -> Redraw {
        let line = self.line_of_point();
        if line >= self.page_top && line < self.page_top + self.height.max(1) {
            return Redraw::None;
        }
        let centered = line.saturating_sub(self.height.saturating_sub(1) / 2);
        self.set_page_top(centered as isize)
    }

    /// Positions the window at `percent` of the node: 0 is the top, 100 the
    /// bottom, anything between interpolates linearly over the line count.
    /// Point is re-derived from the new page top.
    pub fn goto_percentage(&mut self, percent: u32) -> Redraw {
        let max_line = self.line_count() - 1;
        let desired = if percent == 0 {
            0
        } else if percent >= 100 {
            max_line
        } else {
            max_line * percent as usize / 100
        };
        let plan = self.set_page_top(desired as isize);
        self.point = self.line_starts[self.page_top];
        plan
    }

    pub fn beginning_of_node(&mut self) -> Redraw {
        self.point = 0;
        self.set_page_top(0)
    }

    pub fn end_of_node(&mut self) -> Redraw {
        self.point = self.line_starts[self.line_count() - 1];
        let desired = self.line_count() as isize - self.height as isize;
        self.set_page_top(desired)
    }

    /// Status ("mode") line text for this window, GNU Info style.
    pub fn status_line(&self) -> String {
        let line_count = self.line_count();
        let lines_remaining = line_count - self.page_top;
        let location = if self.page_top == 0 {
            if lines_remaining <= self.height {
                "All".to_owned()
            } else {
                "Top".to_owned()
            }
        } else if lines_remaining <= self.height {
            "Bot".to_owned()
        } else {
            let scrollable = line_count - self.height;
            format!("{}%", 100 * self.page_top / scrollable)
        };

        let base = self.filename.split('.').next().unwrap_or(&self.filename);
        let mut status = format!(
            "-----Info: ({base}){}, {line_count} lines --{location}",
            self.nodename
        );
        if status.len() < self.width {
            status.extend(std::iter::repeat('-').take(self.width - status.len()));
        }
        status
    }
}

/// Byte offsets of every physical line start. A trailing newline does not
/// open a phantom line, and empty contents still count one line, so the
/// result is never empty.
fn compute_line_starts(contents: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for at in memchr_iter(b'\n', contents.as_bytes()) {
        if at + 1 < contents.len() {
            starts.push(at + 1);
        }
    }
    starts
}
