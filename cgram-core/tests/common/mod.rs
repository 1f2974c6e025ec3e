use std::fs;
use std::path::Path;

/// Environment variable that rewrites golden files instead of comparing.
pub const UPDATE_GOLDEN: &str = "CGRAM_UPDATE_GOLDEN";

pub fn update_requested() -> bool {
	std::env::var_os(UPDATE_GOLDEN).is_some_and(|value| !value.is_empty() && value != "0")
}

/// Compares `actual` with the golden file at `path`, or rewrites the file when
/// `update` is set.
pub fn check_golden(path: &Path, actual: &str, update: bool) {
	if update {
		fs::write(path, actual).unwrap_or_else(|err| panic!("writing {}: {err}", path.display()));
		return;
	}
	let expected = fs::read_to_string(path)
		.unwrap_or_else(|err| panic!("reading {}: {err} (set {UPDATE_GOLDEN}=1 to create it)", path.display()));
	assert_eq!(actual, expected, "golden mismatch for {}", path.display());
}
