//! Multiple-choice option generation.
//!
//! A full option set needs at least [`OPTION_COUNT`] distinct words in the
//! pool. Smaller pools yield shorter option sets; callers that render a
//! fixed number of options must check [`distinct_count`] first.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::Word;

/// Size of a full option set: the correct word plus three distractors.
pub const OPTION_COUNT: usize = 4;

const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

/// Build the options for a multiple-choice question.
///
/// Shuffles a copy of `pool`, takes the first three entries that differ from
/// `correct` (skipping repeats), and inserts `correct` at a uniformly random
/// position. The result holds `correct` exactly once and no duplicates.
pub fn generate_options<R: Rng + ?Sized>(correct: &Word, pool: &[Word], rng: &mut R) -> Vec<Word> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);

    let mut options: Vec<Word> = Vec::with_capacity(OPTION_COUNT);
    for candidate in shuffled {
        if options.len() == DISTRACTOR_COUNT {
            break;
        }
        if candidate != *correct && !options.contains(&candidate) {
            options.push(candidate);
        }
    }

    let position = rng.gen_range(0..=options.len());
    options.insert(position, correct.clone());
    options
}

/// Number of distinct words in a pool.
pub fn distinct_count(pool: &[Word]) -> usize {
    pool.iter().collect::<HashSet<_>>().len()
}

/// Whether `pool` can always produce a full option set.
pub fn supports_full_options(pool: &[Word]) -> bool {
    distinct_count(pool) >= OPTION_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool() -> Vec<Word> {
        vec![
            Word::new("Hola", "Hello"),
            Word::new("Amigo", "Friend"),
            Word::new("Rojo", "Red"),
            Word::new("Gato", "Cat"),
            Word::new("Perro", "Dog"),
            Word::new("Casa", "House"),
        ]
    }

    #[test]
    fn full_pool_yields_four_unique_options() {
        let words = pool();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for correct in &words {
            for _ in 0..50 {
                let options = generate_options(correct, &words, &mut rng);
                assert_eq!(options.len(), OPTION_COUNT);
                assert_eq!(options.iter().filter(|w| *w == correct).count(), 1);
                assert_eq!(distinct_count(&options), options.len());
            }
        }
    }

    #[test]
    fn exactly_four_words_uses_the_other_three() {
        let words: Vec<Word> = pool().into_iter().take(4).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let options = generate_options(&words[0], &words, &mut rng);
        let mut sorted = options.clone();
        sorted.sort_by(|a, b| a.original.cmp(&b.original));
        let mut expected = words.clone();
        expected.sort_by(|a, b| a.original.cmp(&b.original));
        assert_eq!(sorted, expected);
    }

    #[test]
    fn small_pool_yields_short_option_set() {
        let words: Vec<Word> = pool().into_iter().take(2).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let options = generate_options(&words[0], &words, &mut rng);
        assert_eq!(options.len(), 2);
        assert!(!supports_full_options(&words));
    }

    #[test]
    fn correct_word_missing_from_pool_still_included() {
        let words = pool();
        let outsider = Word::new("Sol", "Sun");
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let options = generate_options(&outsider, &words, &mut rng);
        assert_eq!(options.len(), OPTION_COUNT);
        assert!(options.contains(&outsider));
    }

    #[test]
    fn empty_pool_yields_only_correct() {
        let correct = Word::new("Hola", "Hello");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(generate_options(&correct, &[], &mut rng), vec![correct]);
    }

    #[test]
    fn duplicates_in_pool_are_not_repeated() {
        let correct = Word::new("Hola", "Hello");
        let words = vec![
            correct.clone(),
            correct.clone(),
            Word::new("Gato", "Cat"),
            Word::new("Gato", "Cat"),
            Word::new("Gato", "Cat"),
            Word::new("Rojo", "Red"),
        ];
        assert_eq!(distinct_count(&words), 3);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let options = generate_options(&correct, &words, &mut rng);
            assert_eq!(options.len(), 3);
            assert_eq!(distinct_count(&options), 3);
        }
    }

    #[test]
    fn same_seed_same_options() {
        let words = pool();
        let a = generate_options(&words[2], &words, &mut ChaCha8Rng::seed_from_u64(42));
        let b = generate_options(&words[2], &words, &mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn correct_position_is_roughly_uniform() {
        let words = pool();
        let correct = &words[0];
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut counts = [0usize; OPTION_COUNT];
        let trials = 8000;
        for _ in 0..trials {
            let options = generate_options(correct, &words, &mut rng);
            let position = options.iter().position(|w| w == correct).unwrap();
            counts[position] += 1;
        }
        // Expected 2000 per slot; allow a wide band.
        for count in counts {
            assert!(
                (1700..=2300).contains(&count),
                "position counts not uniform: {counts:?}"
            );
        }
    }
}
