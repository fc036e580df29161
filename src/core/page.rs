/// Page model the board client mutates: nodes addressed by id, laid out the
/// way the game page markup lays them out.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::markup;

/// Id prefix shared by every board cell node
pub const CELL_PREFIX: &str = "game_board_";
/// Id of the single status node
pub const MESSAGE_ID: &str = "message";
/// Class marking a cell as clickable
pub const POINTER_CLASS: &str = "cursor-pointer";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("no element with id `{0}`")]
    MissingNode(String),
    #[error("board size {0} is outside 3..=10")]
    InvalidBoardSize(usize),
}

/// Board position of a cell node
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// `game_board_<row>_<col>`
    pub fn cell_id(&self) -> String {
        format!("{}{}_{}", CELL_PREFIX, self.row, self.col)
    }

    pub fn from_cell_id(id: &str) -> Option<Self> {
        let (row, col) = id.strip_prefix(CELL_PREFIX)?.split_once('_')?;
        Some(Self {
            row: row.parse().ok()?,
            col: col.parse().ok()?,
        })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Callback attached to clickable cells
pub type ClickHandler = Arc<dyn Fn(Coord) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Text(String),
    Markup(String),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

#[derive(Default, Clone)]
pub struct Element {
    id: String,
    content: Content,
    classes: BTreeSet<String>,
    on_click: Option<ClickHandler>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_inner_html(&mut self, markup: &str) {
        self.content = Content::Markup(markup.to_string());
    }

    pub fn set_inner_text(&mut self, text: &str) {
        self.content = Content::Text(text.to_string());
    }

    /// Raw content as last written, markup included
    pub fn inner_html(&self) -> &str {
        match &self.content {
            Content::Text(s) | Content::Markup(s) => s,
        }
    }

    /// What the node displays
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::Text(s) => s.clone(),
            Content::Markup(s) => markup::to_text(s),
        }
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn set_onclick(&mut self, handler: Option<ClickHandler>) {
        self.on_click = handler;
    }

    pub fn has_onclick(&self) -> bool {
        self.on_click.is_some()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("content", &self.content)
            .field("classes", &self.classes)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// The surface the board client writes to. A terminal host uses [`Page`];
/// anything else that can address nodes by id can stand in.
pub trait Document {
    fn get_element_by_id(&mut self, id: &str) -> Option<&mut Element>;

    /// Visit every node whose id starts with `prefix`
    fn for_each_with_prefix(&mut self, prefix: &str, f: &mut dyn FnMut(&mut Element));

    fn location(&self) -> &str;

    /// Navigate away, replacing the current history entry
    fn replace_location(&mut self, location: &str);

    /// Replace the board with `rows` x `cols` empty cells
    fn mount_board(&mut self, rows: usize, cols: usize);
}

/// In-memory document holding the game page's nodes
#[derive(Debug, Clone)]
pub struct Page {
    nodes: BTreeMap<String, Element>,
    location: String,
}

impl Page {
    /// An empty game page at `location` with its status node in place
    pub fn new(location: impl Into<String>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(MESSAGE_ID.to_string(), Element::new(MESSAGE_ID));
        Self {
            nodes,
            location: location.into(),
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.nodes.get(id)
    }

    pub fn insert(&mut self, element: Element) {
        self.nodes.insert(element.id.clone(), element);
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        self.nodes.remove(id)
    }

    pub fn message(&self) -> Option<String> {
        self.element(MESSAGE_ID).map(Element::text_content)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Element> {
        self.element(&coord.cell_id())
    }

    /// Rows and columns spanned by the mounted cells, `None` without a board
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.nodes
            .keys()
            .filter_map(|id| Coord::from_cell_id(id))
            .fold(None, |acc, c| match acc {
                None => Some((c.row + 1, c.col + 1)),
                Some((rows, cols)) => Some((rows.max(c.row + 1), cols.max(c.col + 1))),
            })
    }

    /// Fire the click handler of the node `id`. Returns whether one ran.
    pub fn click(&self, id: &str) -> bool {
        let Some(handler) = self.nodes.get(id).and_then(|el| el.on_click.clone()) else {
            return false;
        };
        let Some(coord) = Coord::from_cell_id(id) else {
            return false;
        };
        handler(coord);
        true
    }
}

impl Document for Page {
    fn get_element_by_id(&mut self, id: &str) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    fn for_each_with_prefix(&mut self, prefix: &str, f: &mut dyn FnMut(&mut Element)) {
        for (id, element) in self.nodes.range_mut(prefix.to_string()..) {
            if !id.starts_with(prefix) {
                break;
            }
            f(element);
        }
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn replace_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    fn mount_board(&mut self, rows: usize, cols: usize) {
        self.nodes.retain(|id, _| !id.starts_with(CELL_PREFIX));
        for row in 0..rows {
            for col in 0..cols {
                let id = Coord::new(row, col).cell_id();
                self.nodes.insert(id.clone(), Element::new(id));
            }
        }
    }
}
