//! Similarity primitives behind the ranked suggestion fallback
//!
//! Everything works on `&[char]` slices: scoring runs in tight loops over
//! the whole stem table, so callers decompose words once up front.

/// Tuning knobs for [`ngram`] scoring
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NgramOpts {
	/// Penalise missing n-grams instead of merely not rewarding them
	pub(crate) weighted: bool,
	/// Subtract when the second word is longer than the first
	pub(crate) longer_worse: bool,
	/// Subtract on any length difference
	pub(crate) any_mismatch: bool,
}

fn contains_sub(haystack: &[char], needle: &[char]) -> bool {
	haystack.windows(needle.len()).any(|w| w == needle)
}

/// Count shared n-grams of length 1 to `n` between `s1` and `s2`
pub(crate) fn ngram(n: usize, s1: &[char], s2: &[char], opts: NgramOpts) -> i32 {
	if s2.is_empty() {
		return 0;
	}
	let l1 = s1.len();
	let mut nscore = 0_i32;

	for j in 1..=n {
		let mut ns = 0_i32;
		if l1 >= j {
			for i in 0..=(l1 - j) {
				if contains_sub(s2, &s1[i..i + j]) {
					ns += 1;
				} else if opts.weighted {
					ns -= 1;
					// a miss on either edge weighs double
					if i == 0 || i == l1 - j {
						ns -= 1;
					}
				}
			}
		}
		nscore += ns;
		if ns < 2 && !opts.weighted {
			break;
		}
	}

	let l1 = i32::try_from(l1).unwrap_or(i32::MAX);
	let l2 = i32::try_from(s2.len()).unwrap_or(i32::MAX);
	let penalty = if opts.longer_worse {
		(l2 - l1) - 2
	} else if opts.any_mismatch {
		(l2 - l1).abs() - 2
	} else {
		0
	};
	if penalty > 0 {
		nscore -= penalty;
	}
	nscore
}

/// Length of the common prefix, tolerating a capitalized first letter in `s2`
pub(crate) fn leftcommonsubstring(s1: &[char], s2: &[char]) -> i32 {
	let (Some(&c1), Some(&c2)) = (s1.first(), s2.first()) else {
		return 0;
	};
	if c1 != c2 && Some(c1) != c2.to_lowercase().next() {
		return 0;
	}

	let common = s1
		.iter()
		.zip(s2)
		.take_while(|(a, b)| a == b)
		.count()
		.max(1);
	i32::try_from(common).unwrap_or(i32::MAX)
}

/// Count positions holding the same character, and detect a lone swap
pub(crate) fn commoncharacterpositions(s1: &[char], s2: &[char]) -> (i32, bool) {
	let mut num = 0_i32;
	let mut diffs = Vec::with_capacity(2);

	for (i, (a, b)) in s1.iter().zip(s2).enumerate() {
		let b = b.to_lowercase().next().unwrap_or(*b);
		if *a == b {
			num += 1;
		} else if diffs.len() < 2 {
			diffs.push(i);
		} else {
			diffs.push(usize::MAX);
		}
	}

	let is_swap = s1.len() == s2.len()
		&& diffs.len() == 2
		&& diffs[1] != usize::MAX
		&& s1[diffs[0]] == s2[diffs[1]].to_lowercase().next().unwrap_or(s2[diffs[1]])
		&& s1[diffs[1]] == s2[diffs[0]].to_lowercase().next().unwrap_or(s2[diffs[0]]);
	(num, is_swap)
}

/// Longest common subsequence length, the classic dynamic programme
pub(crate) fn lcslen(s1: &[char], s2: &[char]) -> i32 {
	let (n, m) = (s1.len(), s2.len());
	if n == 0 || m == 0 {
		return 0;
	}

	let mut prev = vec![0_i32; m + 1];
	let mut row = vec![0_i32; m + 1];
	for i in 1..=n {
		for j in 1..=m {
			row[j] = if s1[i - 1] == s2[j - 1] {
				prev[j - 1] + 1
			} else {
				prev[j].max(row[j - 1])
			};
		}
		std::mem::swap(&mut prev, &mut row);
	}
	prev[m]
}

pub(crate) fn lowercase(s: &[char]) -> Vec<char> {
	s.iter().flat_map(|c| c.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chars(s: &str) -> Vec<char> {
		s.chars().collect()
	}

	#[test]
	fn identical_words_score_highest() {
		let w = chars("letter");
		let same = ngram(3, &w, &w, NgramOpts { any_mismatch: true, ..NgramOpts::default() });
		let other = ngram(
			3,
			&w,
			&chars("better"),
			NgramOpts { any_mismatch: true, ..NgramOpts::default() },
		);
		assert!(same > other);
	}

	#[test]
	fn longer_worse_punishes_long_candidates() {
		let w = chars("cat");
		let short = ngram(3, &w, &chars("cats"), NgramOpts { longer_worse: true, ..NgramOpts::default() });
		let long = ngram(
			3,
			&w,
			&chars("catastrophes"),
			NgramOpts { longer_worse: true, ..NgramOpts::default() },
		);
		assert!(short > long);
	}

	#[test]
	fn left_common_substring_tolerates_initial_caps() {
		assert_eq!(leftcommonsubstring(&chars("word"), &chars("Word")), 1);
		assert_eq!(leftcommonsubstring(&chars("word"), &chars("worse")), 3);
		assert_eq!(leftcommonsubstring(&chars("word"), &chars("sword")), 0);
	}

	#[test]
	fn swap_detection() {
		let (_, swap) = commoncharacterpositions(&chars("form"), &chars("from"));
		assert!(swap);
		let (_, noswap) = commoncharacterpositions(&chars("form"), &chars("fort"));
		assert!(!noswap);
	}

	#[test]
	fn lcs_counts_subsequences_not_substrings() {
		assert_eq!(lcslen(&chars("abcdef"), &chars("axcxex")), 3);
		assert_eq!(lcslen(&chars("abc"), &chars("abc")), 3);
		assert_eq!(lcslen(&chars("abc"), &chars("xyz")), 0);
	}
}
