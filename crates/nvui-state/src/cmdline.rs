#![forbid(unsafe_code)]

//! Command-line state, one entry per nesting level.

use ahash::AHashMap;

use crate::content::ContentPart;

/// One visible command line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cmdline {
    pub content: Vec<ContentPart>,
    /// Cursor byte position within the content.
    pub position: i64,
    /// The prompt character (`:`, `/`, `?`, or empty for prompts).
    pub first_char: String,
    pub prompt: String,
    pub indent: i64,
    pub level: i64,
    /// Pending special character shown at the cursor (`^V` input).
    pub special_char: String,
    /// Whether the special character shifts the content right.
    pub shift_after_special: bool,
}

/// The stack of visible command lines plus the shared block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cmdlines {
    levels: AHashMap<i64, Cmdline>,
    /// The level shown last, used to route level-less events.
    pub last_level: Option<i64>,
    /// Lines of a multi-line command block above the command line.
    pub block_lines: Vec<Vec<ContentPart>>,
}

impl Cmdlines {
    /// Install or replace the command line at its level. The pending
    /// special character is reset, matching a fresh redraw of the line.
    pub fn show(&mut self, cmdline: Cmdline) {
        self.last_level = Some(cmdline.level);
        self.levels.insert(cmdline.level, cmdline);
    }

    /// Move the cursor within the command line at `level`.
    ///
    /// Returns `false` when no command line is shown at that level.
    pub fn set_position(&mut self, position: i64, level: i64) -> bool {
        match self.levels.get_mut(&level) {
            Some(cmdline) => {
                cmdline.position = position;
                true
            }
            None => false,
        }
    }

    /// Set the pending special character at `level`.
    ///
    /// Returns `false` when no command line is shown at that level.
    pub fn set_special_char(&mut self, c: String, shift: bool, level: i64) -> bool {
        match self.levels.get_mut(&level) {
            Some(cmdline) => {
                cmdline.special_char = c;
                cmdline.shift_after_special = shift;
                true
            }
            None => false,
        }
    }

    /// Hide the command line at `level`.
    pub fn hide(&mut self, level: i64) {
        self.levels.remove(&level);
        if self.last_level == Some(level) {
            self.last_level = self.levels.keys().max().copied();
        }
    }

    /// The command line at `level`, if shown.
    pub fn get(&self, level: i64) -> Option<&Cmdline> {
        self.levels.get(&level)
    }

    /// Visible command lines ordered by level, innermost last.
    pub fn ordered(&self) -> Vec<&Cmdline> {
        let mut cmdlines: Vec<&Cmdline> = self.levels.values().collect();
        cmdlines.sort_by_key(|cmdline| cmdline.level);
        cmdlines
    }

    /// Whether any command line is visible.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Replace the block lines shown above the command line.
    pub fn block_show(&mut self, lines: Vec<Vec<ContentPart>>) {
        self.block_lines = lines;
    }

    /// Append one line to the block.
    pub fn block_append(&mut self, line: Vec<ContentPart>) {
        self.block_lines.push(line);
    }

    /// Hide the block.
    pub fn block_hide(&mut self) {
        self.block_lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmdline(level: i64) -> Cmdline {
        Cmdline {
            first_char: ":".to_string(),
            level,
            ..Cmdline::default()
        }
    }

    #[test]
    fn show_then_hide_empties_the_stack() {
        let mut cmdlines = Cmdlines::default();
        cmdlines.show(cmdline(1));
        assert!(!cmdlines.is_empty());
        assert_eq!(cmdlines.last_level, Some(1));
        cmdlines.hide(1);
        assert!(cmdlines.is_empty());
        assert_eq!(cmdlines.last_level, None);
    }

    #[test]
    fn nested_levels_stack_and_unwind() {
        let mut cmdlines = Cmdlines::default();
        cmdlines.show(cmdline(1));
        cmdlines.show(cmdline(2));
        assert_eq!(cmdlines.last_level, Some(2));
        cmdlines.hide(2);
        assert_eq!(cmdlines.last_level, Some(1));
        assert!(cmdlines.get(1).is_some());
    }

    #[test]
    fn position_targets_one_level() {
        let mut cmdlines = Cmdlines::default();
        cmdlines.show(cmdline(1));
        cmdlines.show(cmdline(2));
        assert!(cmdlines.set_position(5, 1));
        assert_eq!(cmdlines.get(1).unwrap().position, 5);
        assert_eq!(cmdlines.get(2).unwrap().position, 0);
        assert!(!cmdlines.set_position(5, 9));
    }

    #[test]
    fn special_char_requires_shown_level() {
        let mut cmdlines = Cmdlines::default();
        assert!(!cmdlines.set_special_char("^".to_string(), false, 1));
        cmdlines.show(cmdline(1));
        assert!(cmdlines.set_special_char("^".to_string(), true, 1));
        let shown = cmdlines.get(1).unwrap();
        assert_eq!(shown.special_char, "^");
        assert!(shown.shift_after_special);
    }

    #[test]
    fn block_lines_accumulate() {
        let mut cmdlines = Cmdlines::default();
        cmdlines.block_show(vec![vec![]]);
        cmdlines.block_append(vec![]);
        assert_eq!(cmdlines.block_lines.len(), 2);
        cmdlines.block_hide();
        assert!(cmdlines.block_lines.is_empty());
    }
}
