pub mod error;

/// Lowercases `value` and folds the Turkish letters outside ASCII onto their
/// closest ASCII counterparts, so the result can be used inside e-mail
/// addresses and host names.
///
/// Characters that have no mapping and are not ASCII alphanumerics are dropped.
pub fn ascii_slug(value: &str) -> String {
	value
		.chars()
		.flat_map(char::to_lowercase)
		.filter_map(|c| match c {
			'ı' | 'i' | 'î' => Some('i'),
			'ş' => Some('s'),
			'ç' => Some('c'),
			'ğ' => Some('g'),
			'ü' | 'û' => Some('u'),
			'ö' => Some('o'),
			'â' => Some('a'),
			// `İ` lowercases to `i` followed by a combining dot
			'\u{307}' => None,
			c if c.is_ascii_alphanumeric() => Some(c),
			_ => None,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_turkish_letters() {
		assert_eq!(ascii_slug("Şahin"), "sahin");
		assert_eq!(ascii_slug("İstanbul"), "istanbul");
		assert_eq!(ascii_slug("Kahramanmaraş"), "kahramanmaras");
		assert_eq!(ascii_slug("Çağrı Öztürk"), "cagriozturk");
		assert_eq!(ascii_slug("Elazığ"), "elazig");
	}
}
