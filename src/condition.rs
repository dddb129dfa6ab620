//! Affix applicability patterns
//!
//! A condition is the last column of a `PFX`/`SFX` rule line: a fixed-length
//! character pattern the restored root must satisfy around the affix
//! boundary. The syntax is tiny (literals, `.`, `[abc]`, `[^abc]`) so we
//! parse it once into elements instead of dragging in a whole regex engine.

use std::fmt;

/// One position of a parsed condition
#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
	/// `.` — any character
	Any,
	/// A literal character
	Char(char),
	/// `[abc]` / `[^abc]` — a (possibly negated) character group
	Group { chars: Vec<char>, negated: bool },
}

impl Element {
	fn matches(&self, c: char) -> bool {
		match self {
			Self::Any => true,
			Self::Char(l) => *l == c,
			Self::Group { chars, negated } => chars.contains(&c) != *negated,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConditionParseError {
	#[error("unclosed character group in condition `{0}`")]
	UnclosedGroup(String),
	#[error("empty character group in condition `{0}`")]
	EmptyGroup(String),
}

/// A parsed affix condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Condition {
	elements: Vec<Element>,
	/// The source text, kept verbatim for display
	source: String,
}

impl Condition {
	pub(crate) fn parse(source: &str) -> Result<Self, ConditionParseError> {
		let mut elements = Vec::new();
		let mut chars = source.chars();

		while let Some(c) = chars.next() {
			match c {
				'.' => elements.push(Element::Any),
				'[' => {
					let mut group = Vec::new();
					let mut negated = false;
					let mut closed = false;
					for (n, g) in chars.by_ref().enumerate() {
						match g {
							'^' if n == 0 => negated = true,
							']' => {
								closed = true;
								break;
							}
							_ => group.push(g),
						}
					}
					if !closed {
						return Err(ConditionParseError::UnclosedGroup(source.to_owned()));
					}
					if group.is_empty() {
						return Err(ConditionParseError::EmptyGroup(source.to_owned()));
					}
					elements.push(Element::Group { chars: group, negated });
				}
				_ => elements.push(Element::Char(c)),
			}
		}

		Ok(Self { elements, source: source.to_owned() })
	}

	/// Test against the start of a restored root, for prefix rules
	pub(crate) fn matches_prefix(&self, root: &str) -> bool {
		let mut chars = root.chars();
		self.elements
			.iter()
			.all(|el| chars.next().is_some_and(|c| el.matches(c)))
	}

	/// Test against the end of a restored root, for suffix rules
	///
	/// Elements and root are walked right to left, so a condition longer
	/// than the root fails instead of matching a truncated pattern.
	pub(crate) fn matches_suffix(&self, root: &str) -> bool {
		let mut chars = root.chars().rev();
		self.elements
			.iter()
			.rev()
			.all(|el| chars.next().is_some_and(|c| el.matches(c)))
	}
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.source)
	}
}
