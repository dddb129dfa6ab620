//! Logic of the [`Dictionary`] to suggest corrections
//!
//! Suggestions come in two phases: cheap edit candidates first (swapped
//! letters, keyboard slips, `REP` rewrites, word splits), then an n-gram
//! similarity scan over the whole word list when the edits found nothing.

use crate::{
	deadline::{Deadline, COMPOUND_TIME_LIMIT, STEP_TIME_LIMIT},
	dic::{initcap, lowercase, Casing, Stem},
	flags::Flag,
	lookup::Compound,
	ngram::{self, NgramOpts},
	Dictionary,
};

/// Hard cap on the suggestion list
const MAX_SUGGESTIONS: usize = 15;
/// How far a letter may travel in swap and move candidates
const MAX_CHAR_DISTANCE: usize = 4;
/// Roots kept in the first n-gram pool
const MAX_ROOTS: usize = 100;
/// Expanded guesses kept for fine scoring
const MAX_GUESSES: usize = 200;
/// Expansions produced per root
const MAX_WORDS: usize = 100;
/// Phonetic suggestions riding behind the n-gram ones
const MAX_PHON_SUGGESTIONS: usize = 2;
/// Longer words than this are not worth suggesting for
const MAX_SUGGEST_LENGTH: usize = 100;

const LONGER_WORSE: NgramOpts = NgramOpts {
	weighted: false,
	longer_worse: true,
	any_mismatch: false,
};
const ANY_MISMATCH: NgramOpts = NgramOpts {
	weighted: false,
	longer_worse: false,
	any_mismatch: true,
};
const ANY_MISMATCH_WEIGHTED: NgramOpts = NgramOpts {
	weighted: true,
	longer_worse: false,
	any_mismatch: true,
};

/// Methods for suggesting words based on the dictionary
impl Dictionary {
	/// Ranked corrections for a misspelled word, at most fifteen
	#[must_use]
	pub fn suggest(&self, word: &str) -> Vec<String> {
		let options = &self.aff.options;

		let mut word = word.trim().to_owned();
		if !options.ignore.is_empty() {
			let ignore = &options.ignore;
			word.retain(|c| !ignore.contains(&c));
		}
		if !options.input_conversion.is_empty() {
			word = options.input_conversion.conv(&word);
		}

		// abbreviation dots come off here and go back on at the end
		let dots = word.chars().rev().take_while(|&c| c == '.').count();
		word.truncate(word.len() - dots);

		if word.is_empty() || word.chars().count() > MAX_SUGGEST_LENGTH {
			return Vec::new();
		}

		let case = Casing::guess(&word);
		let mut sugs: Vec<String> = Vec::new();

		match case {
			Casing::No | Casing::Huh => self.edit_suggest(&word, &mut sugs),
			Casing::Init => {
				self.edit_suggest(&word, &mut sugs);
				let mut from_lower = Vec::new();
				self.edit_suggest(&lowercase(&word), &mut from_lower);
				for sug in from_lower {
					push_unique(&mut sugs, initcap(&sug));
				}
			}
			Casing::HuhInit => {
				self.edit_suggest(&word, &mut sugs);
				let mut chars = word.chars();
				if let Some(first) = chars.next() {
					let mut lowered: String = first.to_lowercase().collect();
					lowered.push_str(chars.as_str());
					let mut from_lower = Vec::new();
					self.edit_suggest(&lowered, &mut from_lower);
					for sug in from_lower {
						push_unique(&mut sugs, initcap(&sug));
					}
				}
			}
			Casing::All => {
				let mut from_lower = Vec::new();
				self.edit_suggest(&lowercase(&word), &mut from_lower);
				for sug in from_lower {
					let upper: String = sug.chars().flat_map(char::to_uppercase).collect();
					push_unique(&mut sugs, upper);
				}
				if sugs.is_empty() {
					self.edit_suggest(&word, &mut sugs);
				}
			}
		}

		// second phase: similarity scan when the edits came up dry
		if sugs.is_empty() && options.max_ngram_suggestions > 0 {
			match case {
				Casing::Init | Casing::All => {
					let mut from_lower = Vec::new();
					self.ngram_suggest(&lowercase(&word), &mut from_lower);
					for sug in from_lower {
						let recased = if case == Casing::Init {
							initcap(&sug)
						} else {
							sug.chars().flat_map(char::to_uppercase).collect()
						};
						push_unique(&mut sugs, recased);
					}
				}
				_ => self.ngram_suggest(&word, &mut sugs),
			}
		}

		sugs.truncate(MAX_SUGGESTIONS);

		let tail = if options.suggest_with_dots {
			".".repeat(dots)
		} else {
			String::new()
		};
		sugs.into_iter()
			.map(|sug| {
				let sug = if options.output_conversion.is_empty() {
					sug
				} else {
					options.output_conversion.conv(&sug)
				};
				format!("{sug}{tail}")
			})
			.collect()
	}

	/// First phase: every edit generator, against plain words first, then
	/// two-word compounds, then longer ones, each pass only as a fallback
	fn edit_suggest(&self, word: &str, sugs: &mut Vec<String>) {
		let options = &self.aff.options;
		let special = &self.aff.special;

		self.edit_candidates(word, 0, MAX_SUGGESTIONS, sugs);

		let compounds_possible = special.compound.is_some()
			|| special.compound_begin.is_some()
			|| !options.compound_rules.is_empty();
		if compounds_possible {
			// two-word compounds first, longer splits only as a last resort
			let budget = options.max_compound_suggestions.min(MAX_SUGGESTIONS);
			if sugs.is_empty() {
				self.edit_candidates(word, 1, budget, sugs);
			}
			if sugs.is_empty() {
				self.edit_candidates(word, 2, budget, sugs);
			}
		}
	}

	fn edit_candidates(&self, word: &str, cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		let chars: Vec<char> = word.chars().collect();

		self.capchars(&chars, cpd, budget, sugs);
		self.replchars(word, cpd, budget, sugs);
		self.mapchars(word, cpd, budget, sugs);
		self.swapchar(&chars, cpd, budget, sugs);
		self.longswapchar(&chars, cpd, budget, sugs);
		self.badcharkey(&chars, cpd, budget, sugs);
		self.extrachar(&chars, cpd, budget, sugs);
		self.forgotchar(&chars, cpd, budget, sugs);
		self.movechar(&chars, cpd, budget, sugs);
		self.badchar(&chars, cpd, budget, sugs);
		self.doubletwochars(&chars, cpd, budget, sugs);
		if !self.aff.options.no_split_suggestions {
			self.twowords(&chars, cpd, budget, sugs);
		}
	}

	/// Keep `candidate` when it is new, fits the budget and spells
	fn testsug(
		&self,
		sugs: &mut Vec<String>,
		candidate: &str,
		cpd: usize,
		budget: usize,
		timer: Option<&Deadline>,
	) {
		if sugs.len() >= budget || sugs.iter().any(|s| s == candidate) {
			return;
		}
		if self.checkword(candidate, cpd, timer) > 0 {
			sugs.push(candidate.to_owned());
		}
	}

	/// Suggestion-side validity oracle. Returns 0 for unusable words,
	/// higher values for compoundable ones.
	fn checkword(&self, word: &str, cpd: usize, timer: Option<&Deadline>) -> usize {
		if timer.is_some_and(Deadline::expired) {
			return 0;
		}
		let special = &self.aff.special;

		if cpd >= 1 {
			// the first compound pass only admits two-member splits
			let cap = (cpd == 1).then_some(2);
			let deadline = Deadline::after(COMPOUND_TIME_LIMIT);
			return if self.compound_check(word, Casing::No, true, cap, &deadline) {
				3
			} else {
				0
			};
		}

		for stem in self.homonyms_all(word) {
			if stem.flags.contains_opt(special.forbidden_word)
				|| stem.flags.contains_opt(special.no_suggest)
				|| stem.flags.contains_opt(special.substandard)
			{
				return 0;
			}
			if stem.flags.contains_opt(special.need_affix)
				|| stem.flags.contains(Flag::ONLY_UPCASE)
				|| stem.flags.contains_opt(special.only_in_compound)
			{
				continue;
			}
			let compoundable = stem.flags.contains_opt(special.compound)
				|| stem.flags.contains_opt(special.compound_begin)
				|| stem.flags.contains_opt(special.compound_end);
			return if compoundable { 2 } else { 1 };
		}

		for found in self.affix_matches(word, None, Compound::No, false, false) {
			if found.stem.flags.contains_opt(special.no_suggest) {
				continue;
			}
			return 1;
		}

		0
	}

	// ——— edit generators, in the order they historically run

	/// Wrong capitalization: try the all-caps and capitalized spellings
	fn capchars(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		let upper: String = chars.iter().flat_map(|c| c.to_uppercase()).collect();
		self.testsug(sugs, &upper, cpd, budget, None);
		let word: String = chars.iter().collect();
		self.testsug(sugs, &initcap(&word), cpd, budget, None);
	}

	/// `REP` rewrites; a rewrite containing a space is offered when both
	/// halves spell on their own
	fn replchars(&self, word: &str, cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		if word.chars().count() < 2 {
			return;
		}
		for entry in &self.aff.options.replacements.entries {
			for (at, _) in word.match_indices(&entry.pattern) {
				let at_start = at == 0;
				let at_end = at + entry.pattern.len() == word.len();
				let Some(out) = entry.out_for(at_start, at_end) else {
					continue;
				};
				let candidate =
					format!("{}{out}{}", &word[..at], &word[at + entry.pattern.len()..]);
				self.testsug(sugs, &candidate, cpd, budget, None);

				if let Some((left, right)) = candidate.split_once(' ') {
					if self.checkword(left, cpd, None) > 0 && self.checkword(right, cpd, None) > 0
					{
						push_unique_capped(sugs, candidate.clone(), budget);
					}
				}
			}
		}
	}

	/// Swap out related characters from the `MAP` sets, in every combination
	/// the timer allows
	fn mapchars(&self, word: &str, cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		if self.aff.options.map_related.is_empty() || word.chars().count() < 2 {
			return;
		}
		let timer = Deadline::after(STEP_TIME_LIMIT);
		self.map_rec(word.to_owned(), 0, 0, cpd, budget, sugs, &timer);
	}

	#[allow(clippy::too_many_arguments)]
	fn map_rec(
		&self,
		candidate: String,
		at: usize,
		depth: usize,
		cpd: usize,
		budget: usize,
		sugs: &mut Vec<String>,
		timer: &Deadline,
	) {
		if timer.expired() {
			return;
		}
		if at >= candidate.len() {
			if depth > 0 {
				self.testsug(sugs, &candidate, cpd, budget, Some(timer));
			}
			return;
		}

		for group in &self.aff.options.map_related {
			for from in group {
				if !candidate[at..].starts_with(from.as_str()) {
					continue;
				}
				for to in group {
					if to == from {
						continue;
					}
					let mut next = candidate.clone();
					next.replace_range(at..at + from.len(), to);
					self.map_rec(next, at + to.len(), depth + 1, cpd, budget, sugs, timer);
				}
			}
		}

		// keep this character and move on
		let step = candidate[at..].chars().next().map_or(1, char::len_utf8);
		self.map_rec(candidate, at + step, depth, cpd, budget, sugs, timer);
	}

	/// Adjacent swaps, plus the double swaps that rescue short words like
	/// `ahev` for `have`
	fn swapchar(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		for at in 0..chars.len().saturating_sub(1) {
			let mut candidate = chars.to_vec();
			candidate.swap(at, at + 1);
			self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
		}

		let len = chars.len();
		if len == 4 || len == 5 {
			let mut candidate = chars.to_vec();
			candidate.swap(0, 1);
			candidate.swap(len - 2, len - 1);
			self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);

			if len == 5 {
				let mut candidate = chars.to_vec();
				candidate.swap(1, 2);
				candidate.swap(len - 2, len - 1);
				self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
			}
		}
	}

	/// Swap two non-adjacent characters, a few positions apart at most
	fn longswapchar(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		for first in 0..chars.len() {
			for second in first + 2..chars.len().min(first + MAX_CHAR_DISTANCE + 1) {
				let mut candidate = chars.to_vec();
				candidate.swap(first, second);
				self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
			}
		}
	}

	/// A letter hit instead of its `KEY` neighbour, or a missed shift key
	fn badcharkey(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		let key: Vec<char> = self.aff.options.key.chars().collect();

		for at in 0..chars.len() {
			let orig = chars[at];

			if let Some(upper) = orig.to_uppercase().next() {
				if upper != orig {
					let mut candidate = chars.to_vec();
					candidate[at] = upper;
					self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
				}
			}

			for (pos, &k) in key.iter().enumerate() {
				if k != orig {
					continue;
				}
				let mut neighbours = Vec::new();
				if pos > 0 && key[pos - 1] != '|' {
					neighbours.push(key[pos - 1]);
				}
				if pos + 1 < key.len() && key[pos + 1] != '|' {
					neighbours.push(key[pos + 1]);
				}
				for neighbour in neighbours {
					let mut candidate = chars.to_vec();
					candidate[at] = neighbour;
					self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
				}
			}
		}
	}

	/// One character too many, removed back to front
	fn extrachar(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		if chars.len() < 2 {
			return;
		}
		for at in (0..chars.len()).rev() {
			let mut candidate = chars.to_vec();
			candidate.remove(at);
			self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
		}
	}

	/// One `TRY` character missed, inserted back to front
	fn forgotchar(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		let timer = Deadline::after(STEP_TIME_LIMIT);
		for &try_char in &self.aff.options.try_chars {
			for at in (0..=chars.len()).rev() {
				let mut candidate = chars.to_vec();
				candidate.insert(at, try_char);
				self.testsug(
					sugs,
					&candidate.iter().collect::<String>(),
					cpd,
					budget,
					Some(&timer),
				);
			}
		}
	}

	/// A character that drifted a few positions, either direction
	fn movechar(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		for from in 0..chars.len() {
			for to in from + 2..chars.len().min(from + MAX_CHAR_DISTANCE + 1) {
				let mut candidate = chars.to_vec();
				let moved = candidate.remove(from);
				candidate.insert(to, moved);
				self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
			}
		}
		for from in (0..chars.len()).rev() {
			for to in from.saturating_sub(MAX_CHAR_DISTANCE)..from.saturating_sub(1) {
				let mut candidate = chars.to_vec();
				let moved = candidate.remove(from);
				candidate.insert(to, moved);
				self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
			}
		}
	}

	/// One wrong character, replaced from the `TRY` set back to front
	fn badchar(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		let timer = Deadline::after(STEP_TIME_LIMIT);
		for &try_char in &self.aff.options.try_chars {
			for at in (0..chars.len()).rev() {
				if chars[at] == try_char {
					continue;
				}
				let mut candidate = chars.to_vec();
				candidate[at] = try_char;
				self.testsug(
					sugs,
					&candidate.iter().collect::<String>(),
					cpd,
					budget,
					Some(&timer),
				);
			}
		}
	}

	/// A doubled syllable, `vacacation` style. Tracks how long the two
	/// character period has been repeating and cuts one copy out.
	fn doubletwochars(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		let mut state = 0;
		for at in 2..chars.len() {
			if chars[at] == chars[at - 2] {
				state += 1;
				if state == 3 || (state == 2 && at >= 4) {
					let mut candidate = chars.to_vec();
					candidate.drain(at - 1..=at);
					self.testsug(sugs, &candidate.iter().collect::<String>(), cpd, budget, None);
					state = 0;
				}
			} else {
				state = 0;
			}
		}
	}

	/// A forgotten space or dash between two words. A split the dictionary
	/// lists as a word pair wins outright and clears the other edit guesses.
	fn twowords(&self, chars: &[char], cpd: usize, budget: usize, sugs: &mut Vec<String>) {
		if chars.len() < 3 {
			return;
		}
		let use_dash = self
			.aff
			.options
			.break_table
			.iter()
			.any(|pattern| pattern == "-");

		let mut paired = false;
		for split in 1..chars.len() {
			let left: String = chars[..split].iter().collect();
			let right: String = chars[split..].iter().collect();
			let pair = format!("{left} {right}");

			if self.checkword(&pair, cpd, None) > 0 {
				if !paired {
					paired = true;
					sugs.clear();
				}
				if !sugs.iter().any(|s| s == &pair) {
					sugs.insert(0, pair);
				}
				continue;
			}

			if self.checkword(&left, cpd, None) > 0 && self.checkword(&right, cpd, None) > 0 {
				push_unique_capped(sugs, pair, budget);
				if use_dash {
					push_unique_capped(sugs, format!("{left}-{right}"), budget);
				}
			}
		}
	}

	// ——— second phase: n-gram similarity

	/// Score every stem against the misspelling, expand the best roots
	/// through their affixes, and emit the top guesses
	fn ngram_suggest(&self, word: &str, sugs: &mut Vec<String>) {
		let options = &self.aff.options;
		let special = &self.aff.special;

		let target: Vec<char> = word.chars().collect();
		let target_lower = ngram::lowercase(&target);
		let n = target.len();
		let case = Casing::guess(word);

		let ph_target: Option<Vec<char>> = self
			.aff
			.phonet
			.as_ref()
			.map(|table| table.phonet(&word.to_uppercase()).chars().collect());

		struct Root<'a> {
			stem: &'a Stem,
			score: i32,
		}
		let mut roots: Vec<Root> = Vec::new();
		let mut phon_roots: Vec<(String, i32)> = Vec::new();

		let dics = std::iter::once(&self.dic).chain(self.extra.iter());
		for stem in dics.flat_map(crate::dic::DicFile::stems) {
			let root_chars: Vec<char> = stem.root.chars().collect();
			if root_chars.len().abs_diff(n) > 4 {
				continue;
			}
			if stem.flags.contains(Flag::ONLY_UPCASE)
				|| stem.flags.contains_opt(special.forbidden_word)
				|| stem.flags.contains_opt(special.no_suggest)
				|| stem.flags.contains_opt(special.no_ngram_suggest)
				|| stem.flags.contains_opt(special.only_in_compound)
			{
				continue;
			}
			// a capitalized stem is no guess for an all-lowercase word
			if case == Casing::No
				&& stem.case != Casing::No
				&& stem.alt_spellings().next().is_none()
			{
				continue;
			}

			let root_lower = ngram::lowercase(&root_chars);
			let mut score = ngram::ngram(3, &target_lower, &root_lower, LONGER_WORSE)
				+ ngram::leftcommonsubstring(&target_lower, &root_chars);
			for alt in stem.alt_spellings() {
				let alt_chars: Vec<char> = alt.chars().collect();
				let alt_score =
					ngram::ngram(3, &target_lower, &ngram::lowercase(&alt_chars), LONGER_WORSE)
						+ ngram::leftcommonsubstring(&target_lower, &alt_chars);
				score = score.max(alt_score);
			}

			roots.push(Root { stem, score });

			if let (Some(ph_target), Some(table)) = (&ph_target, self.aff.phonet.as_ref()) {
				if score > 2 && root_chars.len().abs_diff(n) <= 3 {
					let ph_root: Vec<char> =
						table.phonet(&stem.root.to_uppercase()).chars().collect();
					let phon_score = 2 * ngram::ngram(3, ph_target, &ph_root, LONGER_WORSE);
					phon_roots.push((stem.root.clone(), phon_score));
				}
			}
		}

		roots.sort_by(|a, b| b.score.cmp(&a.score));
		roots.truncate(MAX_ROOTS);

		// ngram score of the word against mangled copies of itself sets the
		// admission threshold for guesses
		let mut thresh = 0;
		for start in 1..=3 {
			let mut mangled = target_lower.clone();
			let mut at = start;
			while at < mangled.len() {
				mangled[at] = '*';
				at += 4;
			}
			thresh += ngram::ngram(n, &target_lower, &mangled, ANY_MISMATCH);
		}
		thresh = thresh / 3 - 1;

		struct Guess {
			text: String,
			score: i32,
		}
		let mut guesses: Vec<Guess> = Vec::new();
		for root in &roots {
			for text in self.expand_rootword(root.stem, word) {
				let guess_chars: Vec<char> = text.chars().collect();
				let guess_lower = ngram::lowercase(&guess_chars);
				let score = ngram::ngram(n, &target_lower, &guess_lower, ANY_MISMATCH)
					+ ngram::leftcommonsubstring(&target_lower, &guess_chars);
				if score > thresh {
					guesses.push(Guess { text, score });
				}
			}
		}
		guesses.sort_by(|a, b| b.score.cmp(&a.score));
		guesses.truncate(MAX_GUESSES);

		// fine-grained rescoring of the surviving guesses
		#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
		let fact = (10 - options.max_diff.min(10)) as f64 / 5.0;
		#[allow(clippy::cast_possible_wrap)]
		let len_t = n as i32;
		for guess in &mut guesses {
			let guess_chars: Vec<char> = guess.text.chars().collect();
			let guess_lower = ngram::lowercase(&guess_chars);
			#[allow(clippy::cast_possible_wrap)]
			let len_g = guess_lower.len() as i32;

			let lcs = ngram::lcslen(&target_lower, &guess_lower);
			let mut score = 2 * lcs - (len_t - len_g).abs();
			score += ngram::leftcommonsubstring(&target_lower, &guess_chars);
			let (common_pos, is_swap) =
				ngram::commoncharacterpositions(&target_lower, &guess_lower);
			score += common_pos;
			if is_swap {
				score += 10;
			}
			score += ngram::ngram(4, &target_lower, &guess_lower, ANY_MISMATCH);
			let bigrams = ngram::ngram(2, &target_lower, &guess_lower, ANY_MISMATCH_WEIGHTED)
				+ ngram::ngram(2, &guess_lower, &target_lower, ANY_MISMATCH_WEIGHTED);
			score += bigrams;
			#[allow(clippy::cast_precision_loss)]
			if f64::from(bigrams) < f64::from(len_t + len_g) * fact {
				score -= 1000;
			}
			if lcs == len_t && lcs == len_g {
				// a case-insensitive exact hit
				score += 2000;
			}
			guess.score = score;
		}
		guesses.sort_by(|a, b| b.score.cmp(&a.score));

		let mut emitted = 0;
		for guess in &guesses {
			if sugs.len() >= MAX_SUGGESTIONS {
				break;
			}
			if emitted >= options.max_ngram_suggestions && guess.score <= 1000 {
				break;
			}
			if guess.score < -100 && (emitted > 0 || options.only_max_diff) {
				break;
			}
			if sugs
				.iter()
				.any(|s| s == &guess.text || guess.text.contains(s.as_str()))
			{
				continue;
			}
			// expansions can collide with forbidden or unsuggestable homonyms
			if self.checkword(&guess.text, 0, None) == 0 {
				continue;
			}
			sugs.push(guess.text.clone());
			emitted += 1;
		}

		// phonetically close roots ride behind the n-gram guesses
		for (text, score) in &mut phon_roots {
			let chars: Vec<char> = text.chars().collect();
			*score += 2 * ngram::lcslen(&target_lower, &ngram::lowercase(&chars));
		}
		phon_roots.sort_by(|a, b| b.1.cmp(&a.1));

		let mut phon_emitted = 0;
		for (text, _) in phon_roots {
			if phon_emitted >= MAX_PHON_SUGGESTIONS || sugs.len() >= MAX_SUGGESTIONS {
				break;
			}
			if sugs.iter().any(|s| s == &text || text.contains(s.as_str())) {
				continue;
			}
			if self.checkword(&text, 0, None) == 0 {
				continue;
			}
			sugs.push(text);
			phon_emitted += 1;
		}
	}

	/// Every surface form of a stem that stays close to the misspelling:
	/// the root itself, suffixed forms, prefixed forms and cross products
	fn expand_rootword(&self, stem: &Stem, bad: &str) -> Vec<String> {
		let special = &self.aff.special;
		let full_strip = self.aff.options.full_strip;
		let flags = &stem.flags;

		let mut words = Vec::new();
		if !flags.contains_opt(special.need_affix) && !flags.contains_opt(special.only_in_compound)
		{
			words.push(stem.root.clone());
		}

		let skip_cont = |cont: &crate::flags::FlagSet| {
			cont.contains_opt(special.need_affix)
				|| cont.contains_opt(special.circumfix)
				|| cont.contains_opt(special.only_in_compound)
		};

		let mut suffixed: Vec<String> = Vec::new();
		for suffix in &self.aff.suffixes {
			if words.len() >= MAX_WORDS {
				break;
			}
			if !flags.contains(suffix.flag) || skip_cont(&suffix.cont_flags) {
				continue;
			}
			// only suffixes that resemble the tail of the misspelling
			if !suffix.add.is_empty() && !bad.ends_with(&suffix.add) {
				continue;
			}
			if let Some(word) = suffix.apply(&stem.root, full_strip) {
				words.push(word.clone());
				if suffix.cross_product {
					suffixed.push(word);
				}
			}
		}

		for prefix in &self.aff.prefixes {
			if words.len() >= MAX_WORDS {
				break;
			}
			if !flags.contains(prefix.flag) || skip_cont(&prefix.cont_flags) {
				continue;
			}
			if !prefix.add.is_empty() && !bad.starts_with(&prefix.add) {
				continue;
			}
			if let Some(word) = prefix.apply(&stem.root, full_strip) {
				words.push(word);
			}
			if prefix.cross_product {
				for word in &suffixed {
					if words.len() >= MAX_WORDS {
						break;
					}
					if let Some(both) = prefix.apply(word, full_strip) {
						words.push(both);
					}
				}
			}
		}

		words.truncate(MAX_WORDS);
		words
	}
}

fn push_unique(sugs: &mut Vec<String>, candidate: String) {
	if !sugs.iter().any(|s| s == &candidate) {
		sugs.push(candidate);
	}
}

fn push_unique_capped(sugs: &mut Vec<String>, candidate: String, budget: usize) {
	if sugs.len() < budget {
		push_unique(sugs, candidate);
	}
}
