use std::collections::HashMap;

/// A prefix tree used to prune affix candidates by their added text
///
/// Suffix rules are inserted under their reversed `add` string, so walking
/// a reversed word collects every suffix that could end it.
#[derive(Debug)]
pub(crate) struct Trie<V> {
	root: TrieNode<V>,
}

impl<V> Default for Trie<V> {
	fn default() -> Self {
		Self { root: TrieNode::default() }
	}
}

#[derive(Debug)]
struct TrieNode<V> {
	leaves: HashMap<char, Self>,
	data: Option<Vec<V>>,
}

impl<V> Default for TrieNode<V> {
	fn default() -> Self {
		Self { leaves: HashMap::default(), data: None }
	}
}

impl<V> Trie<V> {
	pub(crate) fn insert(&mut self, key: &str, value: V) {
		let mut current = &mut self.root;
		for char in key.chars() {
			current = current.leaves.entry(char).or_default();
		}

		match &mut current.data {
			None => current.data = Some(vec![value]),
			Some(vec) => vec.push(value),
		}
	}

	/// Values stored along `key`'s path, the empty key included
	pub(crate) fn get_all<'a>(&'a self, key: &str) -> Vec<&'a V> {
		let mut current = &self.root;
		let mut results: Vec<&V> = current.data.iter().flatten().collect();

		for char in key.chars() {
			current = match current.leaves.get(&char) {
				Some(node) => node,
				None => break,
			};

			if let Some(values) = &current.data {
				results.extend(values);
			}
		}

		results
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn can_create_and_search() {
		let mut trie = Trie::default();
		trie.insert("pr", ());
		trie.insert("pre", ());
		trie.insert("pred", ());
		trie.insert("preda", ());

		let results = trie.get_all("pred");
		assert_eq!(results.len(), 3);
	}

	#[test]
	fn empty_keys_land_on_the_root() {
		let mut trie = Trie::default();
		trie.insert("", 1);
		trie.insert("s", 2);

		assert_eq!(trie.get_all("respell"), vec![&1]);
		assert_eq!(trie.get_all("spell"), vec![&1, &2]);
	}
}
