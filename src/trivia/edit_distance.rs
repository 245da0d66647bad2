/// Guesses within this many edits of the answer count as correct.
pub const MAX_GUESS_DISTANCE: usize = 2;

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case, spacing and punctuation are ignored ("kaisa" matches "Kai'Sa").
pub fn is_correct_guess(guess: &str, answer: &str) -> bool {
    let guess = normalize(guess);
    if guess.is_empty() {
        return false;
    }
    edit_distance(&guess, &normalize(answer)) <= MAX_GUESS_DISTANCE
}
