//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NodeName`] - Validated node identifier (doubles as the DOT node id)
//! - [`DisplayColor`] - Display color tag with the `ecru` alias resolved
//! - [`ModelError`] - Errors from model construction and access
//!
//! # Validation
//!
//! These types enforce validity at construction time. A `NodeName` that
//! would break the quoted-identifier or record-label grammar of the DOT
//! output cannot be represented.

use std::fmt;

use thiserror::Error;

/// Errors from model construction and access.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A slot was accessed by a name that does not exist on the node.
    #[error("node '{node}' has no slot named '{slot}'")]
    UnknownSlot { node: String, slot: String },

    /// Dynamic attribute access matched neither a slot nor a built-in.
    #[error("node '{node}' has no slot or attribute named '{attr}'")]
    NoSuchAttribute { node: String, attr: String },

    /// A pointer slot held something other than a node reference.
    #[error("slot '{slot}' on node '{node}' does not hold a node reference")]
    NotANodeRef { node: String, slot: String },

    /// The node name would break the DOT grammar.
    #[error("invalid node name: {0}")]
    InvalidName(String),

    /// A second node was registered under an existing name.
    #[error("a node named '{0}' is already registered")]
    DuplicateNode(String),
}

/// A validated node name.
///
/// Node names are the rendering identity: they appear as the quoted DOT node
/// id and inside record labels. Names must therefore be:
/// - Non-empty
/// - Free of double quotes, backslashes, and control characters
/// - Free of the record-label specials `|`, `{`, `}`, `<`, `>`
///
/// # Example
///
/// ```
/// use heapdot::core::types::NodeName;
///
/// let name = NodeName::new("tm_type@1").unwrap();
/// assert_eq!(name.as_str(), "tm_type@1");
///
/// assert!(NodeName::new("").is_err());
/// assert!(NodeName::new("bad|name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeName(String);

impl NodeName {
    /// Create a new validated node name.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidName` if the name would break the DOT
    /// quoted-identifier or record-label grammar.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), ModelError> {
        if name.is_empty() {
            return Err(ModelError::InvalidName("name cannot be empty".into()));
        }

        const RECORD_SPECIALS: [char; 7] = ['"', '\\', '|', '{', '}', '<', '>'];
        for c in RECORD_SPECIALS {
            if name.contains(c) {
                return Err(ModelError::InvalidName(format!(
                    "name cannot contain '{c}'"
                )));
            }
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(ModelError::InvalidName(
                "name cannot contain control characters".into(),
            ));
        }

        Ok(())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The concrete value the `ecru` alias resolves to.
const ECRU_HEX: &str = "#C2B280";

/// The color that renders as a dotted outline instead of a fill.
const PALE: &str = "white";

/// A display color tag for a node.
///
/// Colors are open-ended names passed through to DOT, with two special
/// cases fixed at construction time:
/// - `ecru` resolves to the concrete hex value `#C2B280`
/// - `white` is the pale marker; it renders as `style=dotted` rather than
///   as a color attribute
///
/// # Example
///
/// ```
/// use heapdot::core::types::DisplayColor;
///
/// assert_eq!(DisplayColor::new("ecru").as_str(), "#C2B280");
/// assert_eq!(DisplayColor::new("green").as_str(), "green");
/// assert!(DisplayColor::new("white").is_pale());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayColor(String);

impl DisplayColor {
    /// Create a display color, resolving the `ecru` alias.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == "ecru" {
            Self(ECRU_HEX.to_string())
        } else {
            Self(name)
        }
    }

    /// Get the resolved color value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this color renders as a dotted outline.
    pub fn is_pale(&self) -> bool {
        self.0 == PALE
    }
}

impl fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
