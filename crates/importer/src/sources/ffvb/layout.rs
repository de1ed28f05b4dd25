//! Positions of the data on the federation pages.
//!
//! These offsets are a fixed contract with the page markup. Indices count
//! from zero. Row cell indices count only `td` elements carrying at least one
//! attribute, while raw child indices count every child node of the row.

use crate::dom::{NodePath, Step};

/// Text node holding the competition name: second row, first cell of the
/// fifth child of `<body>`.
pub const COMPETITION_NAME: NodePath = NodePath::new(
    "competition-name",
    &[
        Step::FirstElement("html"),
        Step::FirstElement("body"),
        Step::Child(4),
        Step::Child(0),
        Step::Child(1),
        Step::Child(0),
        Step::Child(0),
    ],
);

/// `<tbody>` of the match table, the eighth child of `<body>`.
pub const MATCH_TABLE: NodePath = NodePath::new(
    "match-table",
    &[
        Step::FirstElement("html"),
        Step::FirstElement("body"),
        Step::Child(7),
        Step::Child(0),
    ],
);

pub const MATCH_ID_CELL: usize = 0;
pub const DATE_CELL: usize = 1;
pub const TIME_CELL: usize = 2;
pub const HOME_TEAM_CELL: usize = 3;
pub const AWAY_TEAM_CELL: usize = 5;
pub const SETS_CELL: usize = 8;
pub const REFEREE_CELL: usize = 10;

/// Raw child of the row holding the score sheet link.
pub const FILE_LINK_CHILD: usize = 11;
/// Attribute of that child whose value is the relative link.
pub const FILE_LINK_ATTR: usize = 2;
/// Leading characters of the relative link (`..`) dropped before joining it
/// to the base URL.
pub const FILE_LINK_SKIP: usize = 2;

pub const ROW_TAG: &str = "tr";
pub const CELL_TAG: &str = "td";
