//! Nearest-tool-name suggestions for unknown references.

/// Maximum number of suggested names.
const MAX_SUGGESTIONS: usize = 3;

/// Levenshtein edit distance over characters.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }

    prev[b.len()]
}

/// Rank known tool names by closeness to an unknown reference.
///
/// When the reference contains a dot (`github.list_files`), the suffix
/// after the last dot is also tried as a query and the better distance
/// wins. Ties break lexicographically.
pub fn suggest_tool_names(unknown: &str, known: &[String]) -> Vec<String> {
    let suffix = unknown.rsplit_once('.').map(|(_, s)| s);

    let mut ranked: Vec<(usize, &String)> = known
        .iter()
        .map(|name| {
            let mut distance = edit_distance(unknown, name);
            if let Some(suffix) = suffix {
                distance = distance.min(edit_distance(suffix, name));
            }
            (distance, name)
        })
        .collect();

    ranked.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    ranked
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| name.clone())
        .collect()
}

/// Build the space-prefixed "Did you mean" phrase for an unknown tool
/// reference, or an empty string when nothing can be suggested.
pub fn suggestion_phrase(unknown: &str, known: &[String]) -> String {
    let suggestions = suggest_tool_names(unknown, known);
    match suggestions.as_slice() {
        [] => String::new(),
        [only] => format!(" Did you mean \"{only}\"?"),
        many => {
            let quoted: Vec<String> = many.iter().map(|n| format!("\"{n}\"")).collect();
            format!(" Did you mean one of: {}?", quoted.join(", "))
        }
    }
}

#[cfg(test)]
#[path = "suggestion.test.rs"]
mod tests;
