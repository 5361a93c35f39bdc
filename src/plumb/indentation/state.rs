//! Indentation state
//!
//!     All the data the indentation state machine carries from one event to the next, in one
//!     struct. Expectations are columns; pending deltas are counted in indent levels and only
//!     turned into columns when they are applied at a line transition.

/// An open paren, bracket, brace or keyword block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenGroup {
    /// Line the group was opened on.
    pub line: usize,
    /// Column of the opening token.
    pub column: usize,
    /// Whether opening this group raised the next line's expectation. Only the first opener
    /// of a line does; the closer undoes exactly what its opener did.
    pub counted: bool,
    /// Column continuation lines align to when argument alignment is on.
    pub align_column: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentationState {
    pub expected_this_line: usize,
    pub expected_next_line: usize,
    pub pending_delta_this_line: isize,
    pub pending_delta_next_line: isize,

    pub paren_lines: Vec<OpenGroup>,
    pub bracket_lines: Vec<OpenGroup>,
    pub brace_lines: Vec<OpenGroup>,
    pub keyword_lines: Vec<OpenGroup>,
    /// Lines string literals still open were started on.
    pub string_nesting: Vec<usize>,
    /// Depth of `brace_lines` at each open interpolation.
    pub embedded_expr_open: Vec<usize>,

    pub last_comma_continuation_line: Option<usize>,
    pub last_period_continuation_line: Option<usize>,
    pub op_continuation_line: Option<usize>,
    /// Expectation the current leading-period chain started from.
    pub period_chain: Option<usize>,

    pub indent_keyword_line: Option<usize>,
    /// A block opening (non modifier) keyword was seen on the current line.
    pub indent_keyword_this_line: bool,
    pub modifier_in_line: bool,
    pub in_keyword_plus_op: bool,
    pub in_keyword_plus_comma: bool,
    pub in_keyword_plus_period: bool,

    /// `expected_this_line` as it was when the current line began.
    pub line_start_expectation: usize,
    /// Alignment column of the innermost open argument list, if it has one.
    pub aligned_expectation: Option<usize>,
    pub actual_indentation: usize,
    pub running: bool,
}

impl Default for IndentationState {
    fn default() -> Self {
        IndentationState {
            expected_this_line: 0,
            expected_next_line: 0,
            pending_delta_this_line: 0,
            pending_delta_next_line: 0,
            paren_lines: Vec::new(),
            bracket_lines: Vec::new(),
            brace_lines: Vec::new(),
            keyword_lines: Vec::new(),
            string_nesting: Vec::new(),
            embedded_expr_open: Vec::new(),
            last_comma_continuation_line: None,
            last_period_continuation_line: None,
            op_continuation_line: None,
            period_chain: None,
            indent_keyword_line: None,
            indent_keyword_this_line: false,
            modifier_in_line: false,
            in_keyword_plus_op: false,
            in_keyword_plus_comma: false,
            in_keyword_plus_period: false,
            line_start_expectation: 0,
            aligned_expectation: None,
            actual_indentation: 0,
            running: true,
        }
    }
}

impl IndentationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no paren, bracket or brace group is open.
    pub fn groups_closed(&self) -> bool {
        self.paren_lines.is_empty() && self.bracket_lines.is_empty() && self.brace_lines.is_empty()
    }

    /// True if every nesting stack is empty.
    pub fn is_balanced(&self) -> bool {
        self.groups_closed()
            && self.keyword_lines.is_empty()
            && self.string_nesting.is_empty()
            && self.embedded_expr_open.is_empty()
    }

    /// True if a paren, bracket or brace group opened on `line` or later is still open.
    pub fn group_open_since(&self, line: usize) -> bool {
        self.paren_lines
            .iter()
            .chain(&self.bracket_lines)
            .chain(&self.brace_lines)
            .any(|group| group.line >= line)
    }

    /// Alignment column of the innermost open paren, bracket or brace group. Braces never
    /// carry one, so an innermost brace means no alignment.
    pub fn innermost_alignment(&self) -> Option<usize> {
        [
            self.paren_lines.last(),
            self.bracket_lines.last(),
            self.brace_lines.last(),
        ]
        .into_iter()
        .flatten()
        .max_by_key(|group| (group.line, group.column))
        .and_then(|group| group.align_column)
    }
}

/// Move `column` by `levels` indent levels of `unit` columns, never below zero.
pub fn shift(column: usize, levels: isize, unit: usize) -> usize {
    let delta = levels.unsigned_abs() * unit;
    if levels >= 0 {
        column + delta
    } else {
        column.saturating_sub(delta)
    }
}
