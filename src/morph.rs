//! Morphological queries: analysis, stemming and generation over the
//! data fields carried by dictionary entries and affix rules

use crate::{
	dic::DataField,
	lookup::{AffixMatch, Compound},
	Dictionary,
};

/// Morphological methods of the [`Dictionary`]
impl Dictionary {
	/// One description line per reading of `word`, built from the data
	/// fields of the matched stem and of the affixes that shaped it
	#[must_use]
	pub fn analyze(&self, word: &str) -> Vec<String> {
		let mut lines = Vec::new();

		for stem in self.homonyms_all(word) {
			push_unique(&mut lines, describe(&stem.data_fields, &[], &[]));
		}
		for found in self.readings(word) {
			let prefix_fields = found.prefix.map_or(&[][..], |p| &p.data_fields);
			let mut suffix_fields: Vec<&DataField> = Vec::new();
			if let Some(suffix) = found.suffix {
				suffix_fields.extend(&suffix.data_fields);
			}
			if let Some(outer) = found.outer_suffix {
				suffix_fields.extend(&outer.data_fields);
			}
			push_unique(
				&mut lines,
				describe(&found.stem.data_fields, prefix_fields, &suffix_fields),
			);
		}

		lines.retain(|line| !line.is_empty());
		lines
	}

	/// The stems a word resolves to; the `st:` field wins over the root
	#[must_use]
	pub fn stem(&self, word: &str) -> Vec<String> {
		let mut stems = Vec::new();

		for stem in self.homonyms_all(word) {
			push_unique(&mut stems, stem_name(stem.data_fields.iter(), &stem.root));
		}
		for found in self.readings(word) {
			push_unique(
				&mut stems,
				stem_name(found.stem.data_fields.iter(), &found.stem.root),
			);
		}

		stems
	}

	/// Forms of `word` wearing the affixes that produce `example` from its
	/// own stems
	#[must_use]
	pub fn generate(&self, word: &str, example: &str) -> Vec<String> {
		let full_strip = self.aff.options.full_strip;
		let mut out = Vec::new();

		for model in self.readings(example) {
			for stem in self.homonyms_all(word) {
				let mut form = stem.root.clone();
				if let Some(suffix) = model.suffix {
					if !stem.flags.contains(suffix.flag) {
						continue;
					}
					match suffix.apply(&form, full_strip) {
						Some(suffixed) => form = suffixed,
						None => continue,
					}
				}
				if let Some(prefix) = model.prefix {
					if !stem.flags.contains(prefix.flag) {
						continue;
					}
					match prefix.apply(&form, full_strip) {
						Some(prefixed) => form = prefixed,
						None => continue,
					}
				}
				if model.prefix.is_some() || model.suffix.is_some() {
					push_unique(&mut out, form);
				}
			}
		}

		out
	}

	/// All affix readings of a word, case taken as written
	fn readings(&self, word: &str) -> Vec<AffixMatch<'_>> {
		self.affix_matches(word, None, Compound::No, false, true)
	}
}

fn describe(stem: &[DataField], prefix: &[DataField], suffix: &[&DataField]) -> String {
	let mut parts: Vec<String> = Vec::new();
	for field in stem.iter().chain(prefix) {
		parts.push(field.to_string());
	}
	for field in suffix {
		parts.push(field.to_string());
	}
	parts.join(" ")
}

fn stem_name<'a>(mut fields: impl Iterator<Item = &'a DataField>, root: &str) -> String {
	fields
		.find_map(|field| match field {
			DataField::Stem(stem) => Some(stem.clone()),
			_ => None,
		})
		.unwrap_or_else(|| root.to_owned())
}

fn push_unique(items: &mut Vec<String>, item: String) {
	if !items.iter().any(|seen| seen == &item) {
		items.push(item);
	}
}
