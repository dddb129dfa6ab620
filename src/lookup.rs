//! Logic of the [`Dictionary`] to validate a word

use crate::{
	aff::{Affix, Prefix, Suffix},
	deadline::{Deadline, COMPOUND_TIME_LIMIT},
	dic::{initcap, lowercase, Casing, Stem},
	flags::Flag,
	Dictionary,
};

/// Maximum word length to check
//
/// This limit is the same in `Hunspell`, it's arbitrary
const WORD_LOOKUP_MAX_LENGTH: usize = 100;

/// Recursion bound for `BREAK` splitting
const MAX_BREAK_DEPTH: usize = 10;

/// Informs why a malformed word has been refused or failed to lookup
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
	/// Word is too long and makes no sense to check
	#[error("word should not be over {} chars long", WORD_LOOKUP_MAX_LENGTH)]
	WordTooLong,
}

/// Compound position a member check runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Compound {
	/// Not inside a compound at all
	No,
	Begin,
	Middle,
	End,
}

/// One validated reading of a word: the stem it resolves to plus the
/// affixes that produce the surface form from it
#[derive(Debug, Clone)]
pub(crate) struct AffixMatch<'a> {
	pub(crate) stem: &'a Stem,
	pub(crate) prefix: Option<&'a Affix<Prefix>>,
	pub(crate) suffix: Option<&'a Affix<Suffix>>,
	/// Second-level suffix, stripped before `suffix` was
	pub(crate) outer_suffix: Option<&'a Affix<Suffix>>,
}

/// Methods for querying the dictionary
impl Dictionary {
	/// # Errors
	/// Check [`LookupError`] to see all the ways this function breaks
	pub fn lookup(&self, word: &str) -> Result<bool, LookupError> {
		if word.chars().count() > WORD_LOOKUP_MAX_LENGTH {
			return Err(LookupError::WordTooLong);
		}

		let mut word = word.trim().to_owned();
		if !self.aff.options.ignore.is_empty() {
			let ignore = &self.aff.options.ignore;
			word.retain(|c| !ignore.contains(&c));
		}
		if !self.aff.options.input_conversion.is_empty() {
			word = self.aff.options.input_conversion.conv(&word);
		}

		if word.is_empty() {
			return Ok(true);
		}

		Ok(self.spell_with_breaks(&word, 0))
	}

	/// Whole word first, then abbreviation dots, then `BREAK` patterns.
	/// A space always splits.
	fn spell_with_breaks(&self, word: &str, depth: usize) -> bool {
		if self.spell_casing(word) {
			return true;
		}

		// abbreviation dots
		if word.ends_with('.') {
			let bare = word.trim_end_matches('.');
			if !bare.is_empty() && self.spell_with_breaks(bare, depth) {
				return true;
			}
		}

		if depth >= MAX_BREAK_DEPTH {
			return false;
		}

		let space = " ".to_owned();
		let patterns = std::iter::once(&space).chain(self.aff.options.break_table.iter());
		for pattern in patterns {
			if let Some(tail) = pattern.strip_prefix('^') {
				if let Some(rest) = word.strip_prefix(tail) {
					if !rest.is_empty() && self.spell_with_breaks(rest, depth + 1) {
						return true;
					}
				}
			} else if let Some(head) = pattern.strip_suffix('$') {
				if let Some(rest) = word.strip_suffix(head) {
					if !rest.is_empty() && self.spell_with_breaks(rest, depth + 1) {
						return true;
					}
				}
			} else {
				// infix break: both sides must hold
				for (at, _) in word.match_indices(pattern.as_str()) {
					if at == 0 || at + pattern.len() >= word.len() {
						continue;
					}
					let (left, right) = (&word[..at], &word[at + pattern.len()..]);
					if self.spell_with_breaks(left, depth + 1)
						&& self.spell_with_breaks(right, depth + 1)
					{
						return true;
					}
				}
			}
		}

		false
	}

	/// Try the word as spelled, then the case variants its casing admits
	fn spell_casing(&self, word: &str) -> bool {
		let case = Casing::guess(word);

		let mut variants: Vec<String> = vec![word.to_owned()];
		match case {
			Casing::No | Casing::Huh => {}
			Casing::Init => variants.push(lowercase(word)),
			Casing::All => {
				let lower = lowercase(word);
				variants.push(initcap(&lower));
				variants.push(lower);
			}
			Casing::HuhInit => {
				let mut chars = word.chars();
				if let Some(first) = chars.next() {
					let rest = chars.as_str();
					let mut lowered: String = first.to_lowercase().collect();
					lowered.push_str(rest);
					variants.push(lowered);
				}
			}
		}

		let allow_onlyupcase = case == Casing::All;
		for (at, variant) in variants.iter().enumerate() {
			if self.check_word(variant, case, at > 0, allow_onlyupcase) {
				return true;
			}
		}
		false
	}

	/// Direct stem, affixed form, compound, in that order. A forbidden
	/// homonym always loses.
	fn check_word(&self, word: &str, origin: Casing, variant: bool, allow_onlyupcase: bool) -> bool {
		let special = &self.aff.special;

		let forbid_warn = self.aff.options.forbid_warn;
		for stem in self.homonyms_all(word) {
			if stem.flags.contains_opt(special.forbidden_word) {
				return false;
			}
			// FORBIDWARN hardens rare words into errors
			if forbid_warn && stem.flags.contains_opt(special.warn) {
				return false;
			}
			if stem.flags.contains_opt(special.need_affix)
				|| stem.flags.contains_opt(special.only_in_compound)
			{
				continue;
			}
			if stem.flags.contains(Flag::ONLY_UPCASE) && !allow_onlyupcase {
				continue;
			}
			if variant && stem.flags.contains_opt(special.keep_case) {
				continue;
			}
			return true;
		}

		for found in self.affix_matches(word, None, Compound::No, allow_onlyupcase, false) {
			if variant && found.stem.flags.contains_opt(special.keep_case) {
				continue;
			}
			if forbid_warn && found.stem.flags.contains_opt(special.warn) {
				continue;
			}
			return true;
		}

		let deadline = Deadline::after(COMPOUND_TIME_LIMIT);
		self.compound_check(word, origin, false, None, &deadline)
	}

	/// Every homonym of `word` across the main and extra word lists
	pub(crate) fn homonyms_all<'a>(&'a self, word: &str) -> impl Iterator<Item = &'a Stem> + 'a {
		let mut found: Vec<&'a Stem> = self.dic.homonyms(word).collect();
		for dic in &self.extra {
			found.extend(dic.homonyms(word));
		}
		found.into_iter()
	}

	// ——— affix analysis

	/// Every reading of `word` through the affix rules: pure prefix,
	/// cross products, pure suffix, then two-level suffixes. With
	/// `collect_all` false the search stops at the first reading.
	pub(crate) fn affix_matches<'a>(
		&'a self,
		word: &str,
		needflag: Option<Flag>,
		compound: Compound,
		allow_onlyupcase: bool,
		collect_all: bool,
	) -> Vec<AffixMatch<'a>> {
		let mut out = Vec::new();
		let full_strip = self.aff.options.full_strip;

		for &at in self.aff.prefix_index.get_all(word) {
			let prefix = &self.aff.prefixes[at];
			let Some(stem_word) = prefix.to_stem(word, full_strip) else {
				continue;
			};

			for stem in self.homonyms_all(&stem_word) {
				if self.prefix_gate(stem, prefix, needflag, compound, allow_onlyupcase) {
					out.push(AffixMatch {
						stem,
						prefix: Some(prefix),
						suffix: None,
						outer_suffix: None,
					});
					if !collect_all {
						return out;
					}
				}
			}

			if prefix.cross_product {
				self.suffix_matches(
					&stem_word,
					Some(prefix),
					needflag,
					compound,
					allow_onlyupcase,
					collect_all,
					&mut out,
				);
				if !collect_all && !out.is_empty() {
					return out;
				}
			}
		}

		self.suffix_matches(
			word,
			None,
			needflag,
			compound,
			allow_onlyupcase,
			collect_all,
			&mut out,
		);
		if !collect_all && !out.is_empty() {
			return out;
		}

		if self.aff.has_cont_classes {
			self.twosfx_matches(word, needflag, compound, allow_onlyupcase, collect_all, &mut out);
		}

		out
	}

	#[allow(clippy::too_many_arguments)]
	fn suffix_matches<'a>(
		&'a self,
		word: &str,
		prefix: Option<&'a Affix<Prefix>>,
		needflag: Option<Flag>,
		compound: Compound,
		allow_onlyupcase: bool,
		collect_all: bool,
		out: &mut Vec<AffixMatch<'a>>,
	) {
		let full_strip = self.aff.options.full_strip;
		let reversed: String = word.chars().rev().collect();

		for &at in self.aff.suffix_index.get_all(&reversed) {
			let suffix = &self.aff.suffixes[at];
			if prefix.is_some() && !suffix.cross_product {
				continue;
			}
			let Some(stem_word) = suffix.to_stem(word, full_strip) else {
				continue;
			};

			for stem in self.homonyms_all(&stem_word) {
				if self.suffix_gate(
					stem,
					suffix,
					prefix,
					None,
					needflag,
					compound,
					allow_onlyupcase,
				) {
					out.push(AffixMatch {
						stem,
						prefix,
						suffix: Some(suffix),
						outer_suffix: None,
					});
					if !collect_all {
						return;
					}
				}
			}
		}
	}

	/// Second-level suffixation: an outer suffix stripped first, then an
	/// inner one whose continuation classes admit the outer
	fn twosfx_matches<'a>(
		&'a self,
		word: &str,
		needflag: Option<Flag>,
		compound: Compound,
		allow_onlyupcase: bool,
		collect_all: bool,
		out: &mut Vec<AffixMatch<'a>>,
	) {
		let full_strip = self.aff.options.full_strip;
		let reversed: String = word.chars().rev().collect();

		for &outer_at in self.aff.suffix_index.get_all(&reversed) {
			let outer = &self.aff.suffixes[outer_at];
			let Some(mid) = outer.to_stem(word, full_strip) else {
				continue;
			};
			let mid_reversed: String = mid.chars().rev().collect();

			for &inner_at in self.aff.suffix_index.get_all(&mid_reversed) {
				let inner = &self.aff.suffixes[inner_at];
				if !inner.cont_flags.contains(outer.flag) {
					continue;
				}
				let Some(stem_word) = inner.to_stem(&mid, full_strip) else {
					continue;
				};

				for stem in self.homonyms_all(&stem_word) {
					if self.suffix_gate(
						stem,
						inner,
						None,
						Some(outer),
						needflag,
						compound,
						allow_onlyupcase,
					) {
						out.push(AffixMatch {
							stem,
							prefix: None,
							suffix: Some(inner),
							outer_suffix: Some(outer),
						});
						if !collect_all {
							return;
						}
					}
				}
			}
		}
	}

	/// Whether this stem may take this prefix standing alone
	fn prefix_gate(
		&self,
		stem: &Stem,
		prefix: &Affix<Prefix>,
		needflag: Option<Flag>,
		compound: Compound,
		allow_onlyupcase: bool,
	) -> bool {
		let special = &self.aff.special;
		let flags = &stem.flags;

		if !flags.contains(prefix.flag) {
			return false;
		}
		if flags.contains_opt(special.forbidden_word) {
			return false;
		}
		if flags.contains(Flag::ONLY_UPCASE) && !allow_onlyupcase {
			return false;
		}
		if let Some(nf) = needflag {
			if !flags.contains(nf) && !prefix.cont_flags.contains(nf) {
				return false;
			}
		}
		// a lone prefix can satisfy neither a circumfix nor a needaffix
		// riding on its continuation classes
		if prefix.cont_flags.contains_opt(special.circumfix)
			|| prefix.cont_flags.contains_opt(special.need_affix)
		{
			return false;
		}

		match compound {
			Compound::No => {
				!flags.contains_opt(special.only_in_compound)
					&& !prefix.cont_flags.contains_opt(special.only_in_compound)
			}
			// a prefix sits naturally on the first member only
			Compound::Begin => !prefix.cont_flags.contains_opt(special.compound_forbid),
			Compound::Middle | Compound::End => {
				!prefix.cont_flags.contains_opt(special.compound_forbid)
					&& prefix.cont_flags.contains_opt(special.compound_permit)
			}
		}
	}

	/// Whether this stem may take this suffix, possibly through a cross
	/// product prefix or under an outer second-level suffix
	#[allow(clippy::too_many_arguments)]
	fn suffix_gate(
		&self,
		stem: &Stem,
		suffix: &Affix<Suffix>,
		prefix: Option<&Affix<Prefix>>,
		outer: Option<&Affix<Suffix>>,
		needflag: Option<Flag>,
		compound: Compound,
		allow_onlyupcase: bool,
	) -> bool {
		let special = &self.aff.special;
		let flags = &stem.flags;

		// the suffix is enabled by the stem or through the prefix's
		// continuation classes
		let enabled = flags.contains(suffix.flag)
			|| prefix.is_some_and(|p| p.cont_flags.contains(suffix.flag));
		if !enabled {
			return false;
		}
		// in a cross product the prefix may be enabled through the suffix
		if let Some(p) = prefix {
			if !flags.contains(p.flag) && !suffix.cont_flags.contains(p.flag) {
				return false;
			}
		}
		if flags.contains_opt(special.forbidden_word) {
			return false;
		}
		if flags.contains(Flag::ONLY_UPCASE) && !allow_onlyupcase {
			return false;
		}
		if let Some(nf) = needflag {
			let satisfied = flags.contains(nf)
				|| suffix.cont_flags.contains(nf)
				|| outer.is_some_and(|o| o.cont_flags.contains(nf));
			if !satisfied {
				return false;
			}
		}

		// circumfix halves must pair up
		let suffix_cf = suffix.cont_flags.contains_opt(special.circumfix)
			|| outer.is_some_and(|o| o.cont_flags.contains_opt(special.circumfix));
		let prefix_cf = prefix.is_some_and(|p| p.cont_flags.contains_opt(special.circumfix));
		if suffix_cf != prefix_cf {
			return false;
		}

		// needaffix on the suffix itself wants one more affix around
		if suffix.cont_flags.contains_opt(special.need_affix) && prefix.is_none() && outer.is_none()
		{
			return false;
		}

		let edge = outer.map_or(suffix, |o| o);
		match compound {
			Compound::No => {
				!flags.contains_opt(special.only_in_compound)
					&& !suffix.cont_flags.contains_opt(special.only_in_compound)
					&& !edge.cont_flags.contains_opt(special.only_in_compound)
			}
			// a suffix sits naturally on the last member only
			Compound::End => !edge.cont_flags.contains_opt(special.compound_forbid),
			Compound::Begin | Compound::Middle => {
				!edge.cont_flags.contains_opt(special.compound_forbid)
					&& edge.cont_flags.contains_opt(special.compound_permit)
			}
		}
	}
}
