use orthos::Dictionary;

#[derive(Debug, thiserror::Error)]
#[error("{0} word failed to be correctly spellchecked")]
struct SpellCheckErrors(usize);

pub(crate) fn test_dictionary_pair(
	aff: &str,
	dic: &str,
	good: &[&str],
	wrong: &[&str],
	suggestions: Option<&[Vec<&str>]>,
) -> Result<(), Box<dyn std::error::Error>> {
	let _ = pretty_env_logger::try_init();

	let dict = Dictionary::from_slice(aff, dic)?;

	let mut errors = 0;

	errors += good
		.iter()
		.filter(|w| {
			if dict.lookup(w).unwrap_or_default() {
				log::info!("{w} is indeed fine");
				false
			} else {
				log::error!("{w} is supposed to be fine but is wrong");
				true
			}
		})
		.count();

	errors += wrong
		.iter()
		.filter(|w| {
			if dict.lookup(w).unwrap_or_default() {
				log::error!("{w} is supposed to be wrong but is fine");
				true
			} else {
				log::info!("{w} is indeed wrong");
				false
			}
		})
		.count();

	if let Some(suggs) = suggestions {
		assert_eq!(suggs.len(), wrong.len());

		for (word, expected) in wrong.iter().zip(suggs) {
			let actual = dict.suggest(word);
			for want in expected {
				if actual.iter().any(|s| s == want) {
					log::info!("`{want}` is indeed suggested for `{word}`");
				} else {
					log::error!("`{want}` should be suggested for `{word}`, got {actual:?}");
					errors += 1;
				}
			}
		}
	}

	if errors == 0 {
		Ok(())
	} else {
		Err(Box::new(SpellCheckErrors(errors)))
	}
}
