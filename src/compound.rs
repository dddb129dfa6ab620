//! Compound word formation: flag driven joining, `COMPOUNDRULE` patterns
//! and the `CHECKCOMPOUND*` boundary constraints

use nom::combinator::all_consuming;

use crate::{
	deadline::Deadline,
	dic::Casing,
	flags::{Flag, FlagSet, FlagType},
	lookup::Compound,
	Dictionary,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum RuleParseError {
	#[error("unreadable flag `{0}`")]
	BadFlag(String),
	#[error("`{0}` must follow a flag")]
	DanglingModifier(char),
	#[error("unclosed parenthesis")]
	UnclosedGroup,
	#[error("numeric flags need parentheses here")]
	BareNumeric,
	#[error("rule is empty")]
	Empty,
}

/// How often one slot of a compound rule may match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
	One,
	/// Trailed by `*`
	ZeroOrMore,
	/// Trailed by `?`
	ZeroOrOne,
}

#[derive(Debug, Clone, Copy)]
struct RuleItem {
	flag: Flag,
	rep: Repeat,
}

/// One `COMPOUNDRULE` line: a flag pattern the members of a compound must
/// match in sequence
#[derive(Debug, Clone)]
pub(crate) struct CompoundRule {
	items: Vec<RuleItem>,
}

impl CompoundRule {
	pub(crate) fn parse(source: &str, flag_ty: FlagType) -> Result<Self, RuleParseError> {
		let chars: Vec<char> = source.chars().collect();
		let mut items: Vec<RuleItem> = Vec::new();

		let mut at = 0;
		while at < chars.len() {
			match chars[at] {
				'(' => {
					let close = chars[at..]
						.iter()
						.position(|&c| c == ')')
						.ok_or(RuleParseError::UnclosedGroup)?;
					let inner: String = chars[at + 1..at + close].iter().collect();
					items.push(RuleItem {
						flag: parse_one_flag(&inner, flag_ty)?,
						rep: Repeat::One,
					});
					at += close + 1;
				}
				modifier @ ('*' | '?') => {
					let last = items
						.last_mut()
						.ok_or(RuleParseError::DanglingModifier(modifier))?;
					last.rep = match modifier {
						'*' => Repeat::ZeroOrMore,
						_ => Repeat::ZeroOrOne,
					};
					at += 1;
				}
				_ => {
					let token: String = match flag_ty {
						FlagType::Short | FlagType::Utf8 => chars[at..=at].iter().collect(),
						FlagType::Long => {
							let pair = chars.get(at..at + 2).ok_or_else(|| {
								RuleParseError::BadFlag(chars[at..].iter().collect())
							})?;
							pair.iter().collect()
						}
						FlagType::Numeric => return Err(RuleParseError::BareNumeric),
					};
					at += token.chars().count();
					items.push(RuleItem {
						flag: parse_one_flag(&token, flag_ty)?,
						rep: Repeat::One,
					});
				}
			}
		}

		if items.is_empty() {
			return Err(RuleParseError::Empty);
		}
		Ok(Self { items })
	}

	/// Match the member flag sets against the rule, backtracking over `*`
	/// and `?` slots. In `partial` mode the members only need to match a
	/// prefix of the rule, so a compound under construction can be probed.
	pub(crate) fn matches(&self, members: &[&FlagSet], partial: bool) -> bool {
		struct Choice {
			item: usize,
			member: usize,
		}

		let mut stack: Vec<Choice> = Vec::new();
		let mut item = 0;
		let mut member = 0;

		loop {
			let advanced = if member == members.len() {
				if partial
					|| self.items[item..]
						.iter()
						.all(|i| i.rep != Repeat::One)
				{
					return true;
				}
				false
			} else if item < self.items.len() {
				let slot = self.items[item];
				let hit = members[member].contains(slot.flag);
				match slot.rep {
					Repeat::One if hit => {
						item += 1;
						member += 1;
						true
					}
					Repeat::One => false,
					Repeat::ZeroOrOne | Repeat::ZeroOrMore if hit => {
						// greedy take, remember the skip
						stack.push(Choice {
							item: item + 1,
							member,
						});
						if slot.rep == Repeat::ZeroOrOne {
							item += 1;
						}
						member += 1;
						true
					}
					Repeat::ZeroOrOne | Repeat::ZeroOrMore => {
						item += 1;
						true
					}
				}
			} else {
				false
			};

			if !advanced {
				let Some(choice) = stack.pop() else {
					return false;
				};
				item = choice.item;
				member = choice.member;
			}
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum PatternParseError {
	#[error("expected `end begin [replacement]`")]
	MissingPart,
	#[error("unreadable flag `{0}`")]
	BadFlag(String),
}

/// One `CHECKCOMPOUNDPATTERN` line, forbidding a junction where the first
/// member ends with `end` and the second begins with `begin`
#[derive(Debug, Clone)]
pub(crate) struct CompoundPattern {
	pub(crate) end: String,
	pub(crate) end_flag: Option<Flag>,
	pub(crate) begin: String,
	pub(crate) begin_flag: Option<Flag>,
	/// Replacement member of the simplified syntax, parsed but unused
	pub(crate) replacement: Option<String>,
}

impl CompoundPattern {
	pub(crate) fn parse(source: &str, flag_ty: FlagType) -> Result<Self, PatternParseError> {
		let mut tokens = source.split_whitespace();
		let (end, end_flag) = split_pattern_part(
			tokens.next().ok_or(PatternParseError::MissingPart)?,
			flag_ty,
		)?;
		let (begin, begin_flag) = split_pattern_part(
			tokens.next().ok_or(PatternParseError::MissingPart)?,
			flag_ty,
		)?;
		let replacement = tokens.next().map(str::to_owned);

		Ok(Self {
			end,
			end_flag,
			begin,
			begin_flag,
			replacement,
		})
	}
}

/// `chars[/flag]`, where `0` stands for no character condition
fn split_pattern_part(
	token: &str,
	flag_ty: FlagType,
) -> Result<(String, Option<Flag>), PatternParseError> {
	let (chars, flag) = match token.split_once('/') {
		Some((chars, flag)) => (chars, Some(parse_one_flag(flag, flag_ty)?)),
		None => (token, None),
	};
	let chars = if chars == "0" { "" } else { chars };
	Ok((chars.to_owned(), flag))
}

fn parse_one_flag(token: &str, flag_ty: FlagType) -> Result<Flag, BadFlagText> {
	all_consuming(flag_ty.parse_flag())(token)
		.map(|(_, flag)| flag)
		.map_err(|_| BadFlagText(token.to_owned()))
}

/// Carrier for the flag text of a failed parse, converted into the caller's
/// error type
pub(crate) struct BadFlagText(String);

impl From<BadFlagText> for RuleParseError {
	fn from(bad: BadFlagText) -> Self {
		Self::BadFlag(bad.0)
	}
}

impl From<BadFlagText> for PatternParseError {
	fn from(bad: BadFlagText) -> Self {
		Self::BadFlag(bad.0)
	}
}

/// One accepted member of a compound under construction
struct Member {
	text: String,
	flags: FlagSet,
}

struct CompoundCtx<'a> {
	/// Casing of the word as the user wrote it, for `FORCEUCASE`
	origin: Casing,
	/// Suggestion probes ignore `FORCEUCASE`
	is_sug: bool,
	/// Member count cap on top of `COMPOUNDWORDMAX`, for the two-word
	/// suggestion pass
	member_cap: Option<usize>,
	deadline: &'a Deadline,
}

/// Compound analysis of the [`Dictionary`]
impl Dictionary {
	/// Whether `word` splits into a valid compound under the flag scheme or
	/// a `COMPOUNDRULE`. Gives up quietly when the deadline runs out.
	pub(crate) fn compound_check(
		&self,
		word: &str,
		origin: Casing,
		is_sug: bool,
		member_cap: Option<usize>,
		deadline: &Deadline,
	) -> bool {
		let options = &self.aff.options;
		let special = &self.aff.special;

		let flag_scheme = special.compound.is_some() || special.compound_begin.is_some();
		if !flag_scheme && options.compound_rules.is_empty() {
			return false;
		}

		let chars: Vec<char> = word.chars().collect();
		if chars.len() < options.compound_min.max(1) * 2 {
			return false;
		}

		if options.check_compound_rep && self.rep_rewrite_is_word(word) {
			return false;
		}

		let ctx = CompoundCtx {
			origin,
			is_sug,
			member_cap,
			deadline,
		};
		self.compound_split(&chars, &mut Vec::new(), &ctx)
	}

	/// Walk every split point of `tail`, validating the head as a begin or
	/// middle member and the rest as the final member or a deeper compound
	fn compound_split(&self, tail: &[char], members: &mut Vec<Member>, ctx: &CompoundCtx) -> bool {
		if ctx.deadline.expired() {
			return false;
		}

		let options = &self.aff.options;
		if let Some(cap) = ctx.member_cap {
			if members.len() + 2 > cap {
				return false;
			}
		}
		if let Some(max) = options.compound_word_max {
			// an open compound still needs at least one more plain member
			if self.compound_weight(members, None) + 2 > max {
				return false;
			}
		}

		let cmin = options.compound_min.max(1);
		if tail.len() < cmin * 2 {
			return false;
		}

		for at in cmin..=(tail.len() - cmin) {
			let before = tail[at - 1];
			let after = tail[at];

			if options.check_compound_case
				&& before != '-' && after != '-'
				&& (before.is_uppercase() || after.is_uppercase())
			{
				continue;
			}

			let mut first: String = tail[..at].iter().collect();
			if options.check_compound_triple {
				let triple = before == after
					&& ((at >= 2 && tail[at - 2] == before)
						|| (at + 1 < tail.len() && tail[at + 1] == after));
				if triple {
					if !options.simplified_triple {
						continue;
					}
					// the condensed spelling stands for a doubled letter
					first.push(before);
				}
			}

			let rest: String = tail[at..].iter().collect();

			if members.is_empty() {
				// a listed word pair forbids the joined spelling
				let pair = format!("{first} {rest}");
				if self.homonyms_all(&pair).next().is_some() {
					return false;
				}
			}

			if options.check_compound_dup && members.last().is_some_and(|m| m.text == first) {
				continue;
			}

			if self.pattern_blocks(&first, &rest) {
				continue;
			}

			let position = if members.is_empty() {
				Compound::Begin
			} else {
				Compound::Middle
			};
			for flags in self.member_readings(&first, position, members) {
				members.push(Member {
					text: first.clone(),
					flags,
				});
				let done = self.final_member_ok(&rest, members, ctx)
					|| self.compound_split(&tail[at..], members, ctx);
				members.pop();
				if done {
					return true;
				}
			}
		}

		false
	}

	/// Member count against `COMPOUNDWORDMAX`, with `COMPOUNDROOT` stems
	/// counting double
	fn compound_weight(&self, members: &[Member], closing: Option<&FlagSet>) -> usize {
		let root = self.aff.special.compound_root;
		members
			.iter()
			.map(|m| 1 + usize::from(m.flags.contains_opt(root)))
			.sum::<usize>()
			+ closing.map_or(0, |flags| 1 + usize::from(flags.contains_opt(root)))
	}

	/// Every reading of `text` usable as a non-final compound member,
	/// one flag set per admissible stem
	fn member_readings(&self, text: &str, position: Compound, members: &[Member]) -> Vec<FlagSet> {
		let options = &self.aff.options;
		let special = &self.aff.special;
		let positional = match position {
			Compound::Begin => special.compound_begin,
			Compound::Middle => special.compound_middle,
			Compound::End => special.compound_end,
			Compound::No => None,
		};

		let mut readings = Vec::new();
		for stem in self.homonyms_all(text) {
			if stem.flags.contains(Flag::ONLY_UPCASE)
				|| stem.flags.contains_opt(special.forbidden_word)
				|| stem.flags.contains_opt(special.need_affix)
			{
				continue;
			}

			if stem.flags.contains_opt(special.compound) || stem.flags.contains_opt(positional) {
				readings.push(stem.flags.clone());
				continue;
			}

			if !options.compound_rules.is_empty() {
				let mut sets: Vec<&FlagSet> = members.iter().map(|m| &m.flags).collect();
				sets.push(&stem.flags);
				if options.compound_rules.iter().any(|r| r.matches(&sets, true)) {
					readings.push(stem.flags.clone());
				}
			}
		}

		if readings.is_empty() {
			// an affixed form may carry the compound flag instead
			for needflag in [special.compound, positional].into_iter().flatten() {
				if let Some(found) = self
					.affix_matches(text, Some(needflag), position, false, false)
					.into_iter()
					.next()
				{
					readings.push(found.stem.flags.clone());
					break;
				}
			}
		}

		readings
	}

	/// Whether `text` closes the compound held in `members`
	fn final_member_ok(&self, text: &str, members: &[Member], ctx: &CompoundCtx) -> bool {
		let options = &self.aff.options;
		let special = &self.aff.special;

		if options.check_compound_dup && members.last().is_some_and(|m| m.text == text) {
			return false;
		}

		let force_ok = |flags: &FlagSet| {
			!flags.contains_opt(special.force_ucase)
				|| ctx.is_sug
				|| matches!(ctx.origin, Casing::Init | Casing::HuhInit | Casing::All)
		};

		let within_max = |flags: &FlagSet| {
			options
				.compound_word_max
				.map_or(true, |max| self.compound_weight(members, Some(flags)) <= max)
		};

		for stem in self.homonyms_all(text) {
			if stem.flags.contains(Flag::ONLY_UPCASE)
				|| stem.flags.contains_opt(special.forbidden_word)
				|| stem.flags.contains_opt(special.need_affix)
				|| !within_max(&stem.flags)
			{
				continue;
			}

			let flagged = stem.flags.contains_opt(special.compound)
				|| stem.flags.contains_opt(special.compound_end);
			if flagged && force_ok(&stem.flags) {
				return true;
			}

			if !options.compound_rules.is_empty() && force_ok(&stem.flags) {
				let mut sets: Vec<&FlagSet> = members.iter().map(|m| &m.flags).collect();
				sets.push(&stem.flags);
				if options.compound_rules.iter().any(|r| r.matches(&sets, false)) {
					return true;
				}
			}
		}

		for needflag in [special.compound, special.compound_end]
			.into_iter()
			.flatten()
		{
			for found in self.affix_matches(text, Some(needflag), Compound::End, false, false) {
				if force_ok(&found.stem.flags) && within_max(&found.stem.flags) {
					return true;
				}
			}
		}

		false
	}

	/// `CHECKCOMPOUNDREP`: the joined word must not be one `REP` rewrite
	/// away from a listed word
	fn rep_rewrite_is_word(&self, word: &str) -> bool {
		for entry in &self.aff.options.replacements.entries {
			for (at, _) in word.match_indices(&entry.pattern) {
				let at_start = at == 0;
				let at_end = at + entry.pattern.len() == word.len();
				let Some(out) = entry.out_for(at_start, at_end) else {
					continue;
				};
				let candidate =
					format!("{}{out}{}", &word[..at], &word[at + entry.pattern.len()..]);
				if self.homonyms_all(&candidate).next().is_some() {
					return true;
				}
			}
		}
		false
	}

	/// `CHECKCOMPOUNDPATTERN`: forbid the junction when both sides match,
	/// including their optional flag conditions
	fn pattern_blocks(&self, first: &str, rest: &str) -> bool {
		self.aff.options.compound_patterns.iter().any(|pattern| {
			if !first.ends_with(&pattern.end) || !rest.starts_with(&pattern.begin) {
				return false;
			}
			let end_ok = pattern.end_flag.map_or(true, |f| {
				self.homonyms_all(first).any(|s| s.flags.contains(f))
			});
			let begin_ok = pattern.begin_flag.map_or(true, |f| {
				self.homonyms_all(rest).any(|s| s.flags.contains(f))
			});
			end_ok && begin_ok
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn set(flags: &str) -> FlagSet {
		FlagSet::new(flags.chars().map(|c| Flag(c as u16)).collect())
	}

	#[test]
	fn rule_parses_modifiers_and_groups() {
		let rule = CompoundRule::parse("A*B?C", FlagType::Short).unwrap();
		assert_eq!(rule.items.len(), 3);
		assert_eq!(rule.items[0].rep, Repeat::ZeroOrMore);
		assert_eq!(rule.items[1].rep, Repeat::ZeroOrOne);
		assert_eq!(rule.items[2].rep, Repeat::One);

		let grouped = CompoundRule::parse("(101)(102)*", FlagType::Numeric).unwrap();
		assert_eq!(grouped.items[0].flag, Flag(101));
		assert_eq!(grouped.items[1].rep, Repeat::ZeroOrMore);
	}

	#[test]
	fn rule_rejects_malformed_sources() {
		assert!(CompoundRule::parse("*A", FlagType::Short).is_err());
		assert!(CompoundRule::parse("(AB", FlagType::Short).is_err());
		assert!(CompoundRule::parse("", FlagType::Short).is_err());
		assert!(CompoundRule::parse("12", FlagType::Numeric).is_err());
		// unreadable flags convert into each caller's error type
		assert!(matches!(
			CompoundRule::parse("(xy)", FlagType::Numeric),
			Err(RuleParseError::BadFlag(_))
		));
		assert!(matches!(
			CompoundPattern::parse("ph/ t", FlagType::Short),
			Err(PatternParseError::BadFlag(_))
		));
	}

	#[test]
	fn rule_matching_backtracks_over_stars() {
		// the classic ordinal rule shape: digits then a closing flag
		let rule = CompoundRule::parse("N*S", FlagType::Short).unwrap();

		let n = set("N");
		let s = set("S");
		let ns = set("NS");

		assert!(rule.matches(&[&s], false));
		assert!(rule.matches(&[&n, &s], false));
		assert!(rule.matches(&[&n, &n, &n, &s], false));
		assert!(!rule.matches(&[&n, &s, &n], false));
		assert!(!rule.matches(&[&n], false));

		// a member carrying both flags can serve either slot
		assert!(rule.matches(&[&ns, &ns], false));
	}

	#[test]
	fn partial_matching_accepts_prefixes_of_the_rule() {
		let rule = CompoundRule::parse("ABC", FlagType::Short).unwrap();
		let a = set("A");
		let b = set("B");

		assert!(rule.matches(&[&a], true));
		assert!(rule.matches(&[&a, &b], true));
		assert!(!rule.matches(&[&a, &b], false));
		assert!(!rule.matches(&[&b], true));
	}

	#[test]
	fn optional_slots_may_be_skipped() {
		let rule = CompoundRule::parse("A?B", FlagType::Short).unwrap();
		let a = set("A");
		let b = set("B");

		assert!(rule.matches(&[&b], false));
		assert!(rule.matches(&[&a, &b], false));
		assert!(!rule.matches(&[&a], false));
	}

	#[test]
	fn pattern_lines_split_their_flag_conditions() {
		let pattern = CompoundPattern::parse("ph/X t", FlagType::Short).unwrap();
		assert_eq!(pattern.end, "ph");
		assert_eq!(pattern.end_flag, Some(Flag('X' as u16)));
		assert_eq!(pattern.begin, "t");
		assert_eq!(pattern.begin_flag, None);

		let zero = CompoundPattern::parse("0/Y z", FlagType::Short).unwrap();
		assert!(zero.end.is_empty());
		assert_eq!(zero.end_flag, Some(Flag('Y' as u16)));
	}
}
