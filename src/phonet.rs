//! Rule-table phonetic transliteration
//!
//! Built from the `PHONE` table of an affix file, in the Aspell phonetic
//! code tradition. Rules are byte patterns with a handful of operators:
//! `(abc)` alternates, `-` to leave letters for the next rule, `<` to
//! rewrite in place and rescan, `^`/`$` anchors, a priority digit, and
//! `^^` to restart matching. Input is uppercased by the caller; letters
//! no rule covers are dropped, which is why real tables carry identity
//! rules for the whole alphabet.

/// Longest input we bother transliterating
const MAX_PHONET_LEN: usize = 256;

fn is_letter(b: u8) -> bool {
	// bytes above ASCII are taken to be letters of some encoding
	b >= 128 || b.is_ascii_alphabetic()
}

/// A compiled `PHONE` table
#[derive(Debug)]
pub(crate) struct PhonetTable {
	/// `(pattern, replacement)` pairs in file order
	rules: Vec<(Vec<u8>, Vec<u8>)>,
	/// First rule index per leading byte
	buckets: [Option<usize>; 256],
}

impl PhonetTable {
	pub(crate) fn new(pairs: &[(String, String)]) -> Self {
		let rules: Vec<(Vec<u8>, Vec<u8>)> = pairs
			.iter()
			.map(|(pat, rep)| {
				// an underscore stands for the empty replacement
				let rep = if rep == "_" { "" } else { rep.as_str() };
				(pat.as_bytes().to_vec(), rep.as_bytes().to_vec())
			})
			.collect();

		let mut buckets = [None; 256];
		for (n, (pat, _)) in rules.iter().enumerate() {
			if let Some(&first) = pat.first() {
				if buckets[usize::from(first)].is_none() {
					buckets[usize::from(first)] = Some(n);
				}
			}
		}

		Self { rules, buckets }
	}

	/// Transliterate an uppercased word
	#[allow(clippy::too_many_lines, clippy::cognitive_complexity)]
	pub(crate) fn phonet(&self, inword: &str) -> String {
		if inword.len() > MAX_PHONET_LEN || self.rules.is_empty() {
			return String::new();
		}

		let len = inword.len();
		let mut word: Vec<u8> = inword.as_bytes().to_vec();
		let mut target: Vec<u8> = Vec::with_capacity(len);

		// the NUL-terminated view the rule scans expect
		let at = |w: &[u8], idx: usize| w.get(idx).copied().unwrap_or(0);

		let mut i = 0_usize;
		let mut z = false;
		let mut k = 0_usize;
		let mut p0 = -333_i32;

		loop {
			let mut c = at(&word, i);
			if c == 0 {
				break;
			}
			let mut z0 = false;

			if let Some(start) = self.buckets[usize::from(c)] {
				let mut n = start;

				// check all rules for the same letter
				while self.rules.get(n).is_some_and(|r| r.0.first() == Some(&c)) {
					let s = &self.rules[n].0;
					k = 1;
					let mut p = 5_i32;
					let mut sp = 1_usize;

					// literal part of the pattern
					while sp < s.len()
						&& at(&word, i + k) == s[sp]
						&& !s[sp].is_ascii_digit()
						&& !b"(-<^$".contains(&s[sp])
					{
						k += 1;
						sp += 1;
					}
					if s.get(sp) == Some(&b'(') {
						// letter alternates in "(..)"
						let next = at(&word, i + k);
						if is_letter(next) && s[sp + 1..].contains(&next) {
							k += 1;
							while sp < s.len() && s[sp] != b')' {
								sp += 1;
							}
							if s.get(sp) == Some(&b')') {
								sp += 1;
							}
						}
					}
					p0 = i32::from(at(s, sp));
					let mut k0 = k;
					while s.get(sp) == Some(&b'-') && k > 1 {
						k -= 1;
						sp += 1;
					}
					if s.get(sp) == Some(&b'<') {
						sp += 1;
					}
					if s.get(sp).is_some_and(u8::is_ascii_digit) {
						p = i32::from(s[sp] - b'0');
						sp += 1;
					}
					if s.get(sp) == Some(&b'^') && s.get(sp + 1) == Some(&b'^') {
						sp += 1;
					}

					let matched = sp >= s.len()
						|| (s[sp] == b'^'
							&& (i == 0 || !is_letter(at(&word, i - 1)))
							&& (s.get(sp + 1) != Some(&b'$') || !is_letter(at(&word, i + k0))))
						|| (s[sp] == b'$'
							&& i > 0 && is_letter(at(&word, i - 1))
							&& !is_letter(at(&word, i + k0)));

					if matched {
						// search for a higher priority follow-up rule on the
						// last matched letter
						let c0 = at(&word, i + k - 1);
						let followup = self.buckets[usize::from(c0)];

						if let Some(fstart) = followup {
							if k > 1 && p0 != i32::from(b'-') && at(&word, i + k) != 0 {
								let mut n0 = fstart;
								while self.rules.get(n0).is_some_and(|r| r.0.first() == Some(&c0)) {
									let s0 = &self.rules[n0].0;
									k0 = k;
									p0 = 5;
									let mut sp0 = 1_usize;
									while sp0 < s0.len()
										&& at(&word, i + k0) == s0[sp0]
										&& !s0[sp0].is_ascii_digit()
										&& !b"(-<^$".contains(&s0[sp0])
									{
										k0 += 1;
										sp0 += 1;
									}
									if s0.get(sp0) == Some(&b'(') {
										let next = at(&word, i + k0);
										if is_letter(next) && s0[sp0 + 1..].contains(&next) {
											k0 += 1;
											while sp0 < s0.len() && s0[sp0] != b')' {
												sp0 += 1;
											}
											if s0.get(sp0) == Some(&b')') {
												sp0 += 1;
											}
										}
									}
									// "k0" is deliberately not reduced here
									while s0.get(sp0) == Some(&b'-') {
										sp0 += 1;
									}
									if s0.get(sp0) == Some(&b'<') {
										sp0 += 1;
									}
									if s0.get(sp0).is_some_and(u8::is_ascii_digit) {
										p0 = i32::from(s0[sp0] - b'0');
										sp0 += 1;
									}

									let f_matched = sp0 >= s0.len()
										|| (s0[sp0] == b'$' && !is_letter(at(&word, i + k0)));
									if f_matched {
										if k0 == k {
											// just a piece of the string
											n0 += 1;
											continue;
										}
										if p0 < p {
											// priority too low
											n0 += 1;
											continue;
										}
										break;
									}
									n0 += 1;
								}

								if p0 >= p
									&& self.rules.get(n0).is_some_and(|r| r.0.first() == Some(&c0))
								{
									// the follow-up rule wins, retry the rest
									n += 1;
									continue;
								}
							}
						}

						// apply the replacement
						let rep = self.rules[n].1.clone();
						let rewrites = self.rules[n].0[1..].contains(&b'<');
						p0 = i32::from(rewrites);
						if rewrites && !z {
							// rewrite the word in place and rescan from here
							if !target.is_empty()
								&& !rep.is_empty()
								&& (target.last() == Some(&c) || target.last() == rep.first())
							{
								target.pop();
							}
							z0 = true;
							z = true;
							let mut written = 0;
							while written < rep.len() && i + written < word.len() {
								word[i + written] = rep[written];
								written += 1;
							}
							if k > written {
								word.drain(i + written..(i + k).min(word.len()));
							}
						} else {
							i += k - 1;
							z = false;
							let mut rp = 0;
							// all but the last byte, condensing doubles
							while rp + 1 < rep.len() && target.len() < len {
								if target.last() != Some(&rep[rp]) {
									target.push(rep[rp]);
								}
								rp += 1;
							}
							c = at(&rep, rp);
							if self.rules[n].0[1..].windows(2).any(|w| w == b"^^") {
								if c != 0 {
									target.push(c);
								}
								word.drain(..(i + 1).min(word.len()));
								i = 0;
								z0 = true;
							}
						}
						break;
					}
					n += 1;
				}
			}

			if !z0 {
				if k != 0 && p0 == 0 && target.len() < len && c != 0 {
					// the pending last byte of the matched replacement
					target.push(c);
				}
				i += 1;
				z = false;
				k = 0;
			}
		}

		String::from_utf8_lossy(&target).into_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table(pairs: &[(&str, &str)]) -> PhonetTable {
		let owned: Vec<(String, String)> = pairs
			.iter()
			.map(|(a, b)| ((*a).to_owned(), (*b).to_owned()))
			.collect();
		PhonetTable::new(&owned)
	}

	#[test]
	fn identity_rules_pass_letters_through() {
		let t = table(&[("A", "A"), ("B", "B"), ("C", "C")]);
		assert_eq!(t.phonet("ABCA"), "ABCA");
	}

	#[test]
	fn multi_letter_patterns_collapse() {
		let t = table(&[("PH", "F"), ("P", "P"), ("H", "H"), ("O", "O"), ("T", "T")]);
		assert_eq!(t.phonet("PHOTO"), "FOTO");
	}

	#[test]
	fn uncovered_letters_are_dropped() {
		let t = table(&[("A", "A")]);
		assert_eq!(t.phonet("AXA"), "AA");
	}

	#[test]
	fn double_letters_condense() {
		let t = table(&[("T", "T"), ("O", "O")]);
		// "OTTO": both Ts map to T, the duplicate output survives because
		// each rule consumes its own letter
		assert_eq!(t.phonet("OTTO"), "OTTO");
		let t = table(&[("TT", "T"), ("T", "T"), ("O", "O")]);
		assert_eq!(t.phonet("OTTO"), "OTO");
	}

	#[test]
	fn empty_replacement_via_underscore() {
		let t = table(&[("H", "_"), ("A", "A")]);
		assert_eq!(t.phonet("AHA"), "AA");
	}

	#[test]
	fn oversized_input_yields_nothing() {
		let t = table(&[("A", "A")]);
		let long = "A".repeat(MAX_PHONET_LEN + 1);
		assert_eq!(t.phonet(&long), "");
	}
}
