//! Sorted replacement pattern tables
//!
//! Two closely related tables live here. [`RepList`] is the plain rewrite
//! table behind `ICONV` and `OCONV`: longest pattern wins, applied greedily
//! left to right. [`ReplacementTable`] is the `REP` table the suggester
//! walks, where a `_` anchors a pattern to the word start or end and picks
//! one of four boundary-typed outputs.

/// A `(pattern, out)` rewrite pair
#[derive(Debug, Clone)]
struct RepPair {
	pattern: String,
	out: String,
}

/// A conversion table, kept sorted by pattern for binary search
#[derive(Debug, Default)]
pub(crate) struct RepList {
	pairs: Vec<RepPair>,
}

impl RepList {
	pub(crate) fn add(&mut self, pattern: &str, out: &str) {
		if pattern.is_empty() {
			return;
		}
		// underscores stand for spaces in replacement text
		let pair = RepPair {
			pattern: pattern.to_owned(),
			out: out.replace('_', " "),
		};
		let at = self
			.pairs
			.partition_point(|p| p.pattern.as_str() < pattern);
		self.pairs.insert(at, pair);
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	/// The longest pattern that prefixes `text`, if any
	fn longest_match(&self, text: &str) -> Option<&RepPair> {
		let upper = self.pairs.partition_point(|p| p.pattern.as_str() <= text);
		let first = text.chars().next()?;

		self.pairs[..upper]
			.iter()
			.rev()
			.take_while(|p| p.pattern.starts_with(first))
			.filter(|p| text.starts_with(&p.pattern))
			.max_by_key(|p| p.pattern.len())
	}

	/// Rewrite `word`, scanning left to right and favouring long patterns
	pub(crate) fn conv(&self, word: &str) -> String {
		let mut out = String::with_capacity(word.len());
		let mut rest = word;

		while !rest.is_empty() {
			match self.longest_match(rest) {
				Some(pair) => {
					out.push_str(&pair.out);
					rest = &rest[pair.pattern.len()..];
				}
				None => {
					let mut chars = rest.chars();
					if let Some(c) = chars.next() {
						out.push(c);
					}
					rest = chars.as_str();
				}
			}
		}

		out
	}
}

/// One `REP` line, with its outputs split by boundary type
///
/// Index 0 holds the output usable anywhere, 1 only at the word start,
/// 2 only at the word end, 3 only when the pattern is the whole word.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReplacementEntry {
	pub(crate) pattern: String,
	pub(crate) outs: [Option<String>; 4],
}

impl ReplacementEntry {
	/// Pick the output for a match at `at_start`/`at_end`, falling back to a
	/// less anchored one when the exact boundary type has no text
	pub(crate) fn out_for(&self, at_start: bool, at_end: bool) -> Option<&str> {
		let mut ty = usize::from(at_start) + 2 * usize::from(at_end);
		loop {
			if let Some(out) = &self.outs[ty] {
				return Some(out);
			}
			ty = match ty {
				// an end-anchored miss mid-word falls back to unanchored
				2 if !at_start => 0,
				0 => return None,
				n => n - 1,
			};
		}
	}
}

/// The `REP` table
#[derive(Debug, Default)]
pub(crate) struct ReplacementTable {
	pub(crate) entries: Vec<ReplacementEntry>,
}

impl ReplacementTable {
	pub(crate) fn add(&mut self, pattern: &str, out: &str) {
		let mut ty = 0;
		let pattern = pattern.strip_prefix('_').map_or(pattern, |p| {
			ty += 1;
			p
		});
		let pattern = pattern.strip_suffix('_').map_or(pattern, |p| {
			ty += 2;
			p
		});
		if pattern.is_empty() {
			return;
		}

		let out = out.replace('_', " ");
		if let Some(entry) = self.entries.iter_mut().find(|e| e.pattern == pattern) {
			entry.outs[ty] = Some(out);
		} else {
			let mut entry = ReplacementEntry {
				pattern: pattern.to_owned(),
				..ReplacementEntry::default()
			};
			entry.outs[ty] = Some(out);
			self.entries.push(entry);
		}
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn longest_pattern_wins() {
		let mut list = RepList::default();
		list.add("a", "X");
		list.add("ab", "Y");
		list.add("b", "Z");

		assert_eq!(list.conv("aab"), "XY");
		assert_eq!(list.conv("ba"), "ZX");
	}

	#[test]
	fn unmatched_characters_pass_through() {
		let mut list = RepList::default();
		list.add("'", "’");

		assert_eq!(list.conv("l'arbre"), "l’arbre");
		assert_eq!(list.conv("plain"), "plain");
	}

	#[test]
	fn underscores_become_spaces_in_outputs() {
		let mut table = ReplacementTable::default();
		table.add("alot", "a_lot");

		let entry = &table.entries[0];
		assert_eq!(entry.out_for(true, true), Some("a lot"));
	}

	#[test]
	fn anchored_entries_only_fire_on_their_boundary() {
		let mut table = ReplacementTable::default();
		table.add("_foo", "bar");

		let entry = &table.entries[0];
		assert_eq!(entry.pattern, "foo");
		assert_eq!(entry.out_for(true, false), Some("bar"));
		assert_eq!(entry.out_for(false, false), None);
		// a whole-word match may still use the start-anchored text
		assert_eq!(entry.out_for(true, true), Some("bar"));
	}
}
