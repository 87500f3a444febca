/// Default maximum edit distance for "did you mean" suggestions.
pub const DEFAULT_SUGGEST_DISTANCE: usize = 3;

/// Returns the candidate closest to `key` by Levenshtein distance, if within `max_distance`.
///
/// Ties are broken by lexical order so the result does not depend on map iteration order.
/// A `max_distance` of zero disables suggestions.
pub(crate) fn closest<'a>(key: &str, candidates: impl IntoIterator<Item = &'a str>, max_distance: usize) -> Option<String> {
	if max_distance == 0 {
		return None;
	}

	candidates
		.into_iter()
		.map(|candidate| (strsim::levenshtein(key, candidate), candidate))
		.filter(|(distance, _)| *distance <= max_distance)
		.min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
		.map(|(_, candidate)| candidate.to_string())
}
