//! Path algebra: the store-native traversal expression.
//!
//! A `Path` is a tree. Leaves pick a starting set of nodes (`All`, `Fixed`,
//! `Here`); every other variant transforms the bindings produced by its
//! `from` child. Paths are plain values: they own their children, never
//! reference the store, and can be cloned freely into sub-expressions.
//!
//! `Here` is the relative start. It only has meaning when the path is
//! evaluated from a seed binding (inside `Optional` and `Where`).

use regex::Regex;

use crate::value::Value;
use crate::NodeId;

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    LessThan,
    LessThanEquals,
    GreaterThan,
    GreaterThanEquals,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::LessThan => "<",
            CompareOp::LessThanEquals => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanEquals => ">=",
        }
    }
}

/// Predicate over resolved node values.
///
/// Type mismatches never fail: a value the filter cannot judge is simply
/// excluded.
#[derive(Debug, Clone)]
pub enum ValueFilter {
    Compare { op: CompareOp, value: Value },
    /// Unanchored regular expression over string-like literals.
    Regex(Regex),
    /// SQL-style `LIKE` pattern over string-like literals.
    Wildcard { pattern: String, regex: Regex },
}

impl ValueFilter {
    pub fn compare(op: CompareOp, value: Value) -> Self {
        ValueFilter::Compare { op, value }
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(ValueFilter::Regex(Regex::new(pattern)?))
    }

    /// `%` matches any run of characters, `_` exactly one; everything else is
    /// literal and the match is anchored at both ends.
    pub fn wildcard(pattern: &str) -> Result<Self, regex::Error> {
        let mut re = String::from("(?s)^");
        let mut literal = String::new();
        for c in pattern.chars() {
            match c {
                '%' | '_' => {
                    re.push_str(&regex::escape(&literal));
                    literal.clear();
                    re.push_str(if c == '%' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        re.push_str(&regex::escape(&literal));
        re.push('$');
        Ok(ValueFilter::Wildcard {
            pattern: pattern.to_string(),
            regex: Regex::new(&re)?,
        })
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueFilter::Compare { op, value: bound } => {
                let Some(ord) = value.compare_native(bound) else {
                    return false;
                };
                match op {
                    CompareOp::LessThan => ord.is_lt(),
                    CompareOp::LessThanEquals => ord.is_le(),
                    CompareOp::GreaterThan => ord.is_gt(),
                    CompareOp::GreaterThanEquals => ord.is_ge(),
                }
            }
            ValueFilter::Regex(re) | ValueFilter::Wildcard { regex: re, .. } => {
                value.text().is_some_and(|text| re.is_match(text))
            }
        }
    }
}

impl PartialEq for ValueFilter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ValueFilter::Compare { op: a, value: va },
                ValueFilter::Compare { op: b, value: vb },
            ) => a == b && va == vb,
            (ValueFilter::Regex(a), ValueFilter::Regex(b)) => a.as_str() == b.as_str(),
            (ValueFilter::Wildcard { pattern: a, .. }, ValueFilter::Wildcard { pattern: b, .. }) => {
                a == b
            }
            _ => false,
        }
    }
}

// ============================================================================
// Path expression
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    /// Every node in store order.
    All,
    /// A fixed list of nodes, duplicates kept.
    Fixed(Vec<NodeId>),
    /// The seed binding of a relative evaluation.
    Here,

    /// Follow outgoing edges whose predicate is produced by `via`.
    Out { from: Box<Path>, via: Box<Path> },
    /// Follow incoming edges whose predicate is produced by `via`.
    In { from: Box<Path>, via: Box<Path> },
    /// Both directions, in quad order.
    Both { from: Box<Path>, via: Box<Path> },

    /// Move to the distinct predicates of outgoing edges.
    OutPredicates { from: Box<Path> },
    /// Move to the distinct predicates of incoming edges.
    InPredicates { from: Box<Path> },
    /// Stay; one binding per distinct predicate, tagged under `tag`.
    SavePredicates {
        from: Box<Path>,
        tag: String,
        reverse: bool,
    },

    /// Stay; tag the far end of each `via` edge under `tag`. Bindings
    /// without such an edge are dropped.
    Save {
        from: Box<Path>,
        via: Box<Path>,
        tag: String,
        reverse: bool,
    },
    /// Stay; tag the far end of every edge under the predicate's name.
    SaveAll { from: Box<Path>, reverse: bool },

    /// Keep nodes with a `via` edge to one of `values` (`None`: any node).
    Has {
        from: Box<Path>,
        via: Box<Path>,
        values: Option<Vec<NodeId>>,
        reverse: bool,
    },
    /// Keep nodes equal to one of `values`.
    Is { from: Box<Path>, values: Vec<NodeId> },

    Tag { from: Box<Path>, name: String },
    /// Move to the node bound under `tag`, or to the start node when `None`.
    Back { from: Box<Path>, tag: Option<String> },

    Union(Box<Path>, Box<Path>),
    /// Join on the current node; tags merge with the left side winning.
    Intersect(Box<Path>, Box<Path>),
    Except(Box<Path>, Box<Path>),

    Limit { from: Box<Path>, limit: usize },
    Skip { from: Box<Path>, offset: usize },
    Unique { from: Box<Path> },
    Order { from: Box<Path> },

    /// Left outer join of `from` with `extension` evaluated from each binding.
    Optional { from: Box<Path>, extension: Box<Path> },
    /// Every clause must match from each binding; tags accumulate.
    Where { from: Box<Path>, clauses: Vec<Path> },

    Filter { from: Box<Path>, filter: ValueFilter },
}

impl Path {
    pub fn all() -> Self {
        Path::All
    }

    pub fn fixed(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Path::Fixed(nodes.into_iter().collect())
    }

    pub fn here() -> Self {
        Path::Here
    }

    pub fn outgoing(self, via: Path) -> Self {
        Path::Out {
            from: Box::new(self),
            via: Box::new(via),
        }
    }

    pub fn incoming(self, via: Path) -> Self {
        Path::In {
            from: Box::new(self),
            via: Box::new(via),
        }
    }

    pub fn both(self, via: Path) -> Self {
        Path::Both {
            from: Box::new(self),
            via: Box::new(via),
        }
    }

    pub fn out_predicates(self) -> Self {
        Path::OutPredicates {
            from: Box::new(self),
        }
    }

    pub fn in_predicates(self) -> Self {
        Path::InPredicates {
            from: Box::new(self),
        }
    }

    pub fn save_predicates(self, tag: impl Into<String>, reverse: bool) -> Self {
        Path::SavePredicates {
            from: Box::new(self),
            tag: tag.into(),
            reverse,
        }
    }

    pub fn save(self, via: Path, tag: impl Into<String>) -> Self {
        Path::Save {
            from: Box::new(self),
            via: Box::new(via),
            tag: tag.into(),
            reverse: false,
        }
    }

    pub fn save_reverse(self, via: Path, tag: impl Into<String>) -> Self {
        Path::Save {
            from: Box::new(self),
            via: Box::new(via),
            tag: tag.into(),
            reverse: true,
        }
    }

    pub fn save_all(self, reverse: bool) -> Self {
        Path::SaveAll {
            from: Box::new(self),
            reverse,
        }
    }

    pub fn has(self, via: Path, values: Option<Vec<NodeId>>) -> Self {
        Path::Has {
            from: Box::new(self),
            via: Box::new(via),
            values,
            reverse: false,
        }
    }

    pub fn has_reverse(self, via: Path, values: Option<Vec<NodeId>>) -> Self {
        Path::Has {
            from: Box::new(self),
            via: Box::new(via),
            values,
            reverse: true,
        }
    }

    pub fn is(self, values: Vec<NodeId>) -> Self {
        Path::Is {
            from: Box::new(self),
            values,
        }
    }

    pub fn tag(self, name: impl Into<String>) -> Self {
        Path::Tag {
            from: Box::new(self),
            name: name.into(),
        }
    }

    pub fn back(self, tag: Option<String>) -> Self {
        Path::Back {
            from: Box::new(self),
            tag,
        }
    }

    pub fn union(self, other: Path) -> Self {
        Path::Union(Box::new(self), Box::new(other))
    }

    pub fn intersect(self, other: Path) -> Self {
        Path::Intersect(Box::new(self), Box::new(other))
    }

    pub fn except(self, other: Path) -> Self {
        Path::Except(Box::new(self), Box::new(other))
    }

    pub fn limit(self, limit: usize) -> Self {
        Path::Limit {
            from: Box::new(self),
            limit,
        }
    }

    pub fn skip(self, offset: usize) -> Self {
        Path::Skip {
            from: Box::new(self),
            offset,
        }
    }

    pub fn unique(self) -> Self {
        Path::Unique {
            from: Box::new(self),
        }
    }

    pub fn order(self) -> Self {
        Path::Order {
            from: Box::new(self),
        }
    }

    pub fn optional(self, extension: Path) -> Self {
        Path::Optional {
            from: Box::new(self),
            extension: Box::new(extension),
        }
    }

    pub fn where_clauses(self, clauses: Vec<Path>) -> Self {
        Path::Where {
            from: Box::new(self),
            clauses,
        }
    }

    pub fn filter(self, filter: ValueFilter) -> Self {
        Path::Filter {
            from: Box::new(self),
            filter,
        }
    }

    /// Short variant name, used in trace output.
    pub fn kind(&self) -> &'static str {
        match self {
            Path::All => "all",
            Path::Fixed(_) => "fixed",
            Path::Here => "here",
            Path::Out { .. } => "out",
            Path::In { .. } => "in",
            Path::Both { .. } => "both",
            Path::OutPredicates { .. } => "out_predicates",
            Path::InPredicates { .. } => "in_predicates",
            Path::SavePredicates { .. } => "save_predicates",
            Path::Save { .. } => "save",
            Path::SaveAll { .. } => "save_all",
            Path::Has { .. } => "has",
            Path::Is { .. } => "is",
            Path::Tag { .. } => "tag",
            Path::Back { .. } => "back",
            Path::Union(..) => "union",
            Path::Intersect(..) => "intersect",
            Path::Except(..) => "except",
            Path::Limit { .. } => "limit",
            Path::Skip { .. } => "skip",
            Path::Unique { .. } => "unique",
            Path::Order { .. } => "order",
            Path::Optional { .. } => "optional",
            Path::Where { .. } => "where",
            Path::Filter { .. } => "filter",
        }
    }
}
