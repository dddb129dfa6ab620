mod utils;

use orthos::Dictionary;
use std::time::{Duration, Instant};

#[test]
fn flag_compounds_join_freely() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
COMPOUNDFLAG X
",
		"\
3
foo/X
bar/X
baz/X
",
		&["foobar", "barfoo", "foobarbaz", "bazbarfoo"],
		&["fooba", "zoobar", "foobax"],
		None,
	)
}

#[test]
fn compound_rules_gate_member_order() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
COMPOUNDMIN 1
ONLYINCOMPOUND o
COMPOUNDRULE 1
COMPOUNDRULE A*B
",
		"\
2
xy/Ao
z/Bo
",
		&["xyz", "xyxyz", "xyxyxyz"],
		&["xy", "zxy", "xyxy", "zz"],
		None,
	)
}

#[test]
fn adjacent_duplicate_members_can_be_forbidden() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
COMPOUNDFLAG X
CHECKCOMPOUNDDUP
",
		"\
2
foo/X
bar/X
",
		&["foobar", "foobarfoo"],
		&["foofoo", "barfoofoo"],
		None,
	)
}

#[test]
fn compound_word_count_is_bounded() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
COMPOUNDFLAG X
COMPOUNDWORDMAX 2
",
		"\
2
foo/X
bar/X
",
		&["foobar", "barfoo"],
		&["foobarfoo", "barbarfoo"],
		None,
	)
}

#[test]
fn root_members_count_double_toward_the_bound() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
COMPOUNDFLAG X
COMPOUNDROOT R
COMPOUNDMIN 1
COMPOUNDWORDMAX 3
",
		"\
2
a/XR
b/X
",
		&["ab", "ba", "bbb"],
		&["aba", "abb", "bba", "bab"],
		None,
	)
}

#[test]
fn uppercase_junctions_can_be_forbidden() -> Result<(), Box<dyn std::error::Error>> {
	utils::test_dictionary_pair(
		"\
COMPOUNDFLAG X
CHECKCOMPOUNDCASE
",
		"\
3
foo/X
Bar/X
nob/X
",
		&["foonob", "nobfoo", "Barfoo"],
		&["fooBar", "fooBarfoo"],
		None,
	)
}

#[test]
fn adversarial_compounds_give_up_within_the_time_budget() {
	let _ = pretty_env_logger::try_init();

	let dict = Dictionary::from_slice(
		"\
COMPOUNDFLAG X
COMPOUNDMIN 1
",
		"\
2
a/X
b/X
",
	)
	.expect("fixture pair parses");

	// 98 splittable chars with an unsatisfiable tail invites exponential
	// backtracking; the deadline has to cut it short
	let word = format!("{}az", "ab".repeat(49));
	let started = Instant::now();
	let fine = dict.lookup(&word).expect("word is under the length cap");
	assert!(!fine);
	assert!(started.elapsed() < Duration::from_secs(10));
}
