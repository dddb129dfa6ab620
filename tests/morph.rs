use orthos::Dictionary;

const AFF: &str = "\
SFX S Y 1
SFX S 0 s . is:plural
";

const DIC: &str = "\
2
drink/S	po:noun st:drink
eat/S
";

fn dict() -> Dictionary {
	let _ = pretty_env_logger::try_init();
	Dictionary::from_slice(AFF, DIC).expect("fixture pair parses")
}

#[test]
fn analysis_collects_stem_and_affix_fields() {
	let dict = dict();

	let direct = dict.analyze("drink");
	assert_eq!(direct, vec!["po:noun st:drink"]);

	let suffixed = dict.analyze("drinks");
	assert_eq!(suffixed, vec!["po:noun st:drink is:plural"]);

	assert!(dict.analyze("gibberish").is_empty());
}

#[test]
fn stemming_prefers_the_st_field() {
	let dict = dict();
	assert_eq!(dict.stem("drinks"), vec!["drink"]);
	assert_eq!(dict.stem("eats"), vec!["eat"]);
	assert!(dict.stem("gibberish").is_empty());
}

#[test]
fn generation_follows_the_example_form() {
	let dict = dict();
	assert_eq!(dict.generate("eat", "drinks"), vec!["eats"]);
	// the example carries no affix to mirror
	assert!(dict.generate("eat", "drink").is_empty());
	assert!(dict.generate("missing", "drinks").is_empty());
}
