// ============================================================
// Layer 4 - Dataset Splitters
// ============================================================
// Two splits are needed:
//
//   stratified_split - train/test partition that keeps the
//                      phishing/legitimate ratio equal in both
//                      halves. Each class is shuffled and cut
//                      separately, then both halves are shuffled
//                      again so the classes are interleaved.
//
//   split_tail       - carves the validation set off the END of
//                      the training partition without shuffling.
//                      Because the partition was shuffled by
//                      stratified_split, the tail is a random
//                      sample of it.
//
// Shuffling uses ChaCha8Rng seeded from the run configuration,
// so the same seed always produces the same partitions.
//
// Reference: rand / rand_chacha crate documentation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Stratified split of `samples` into (train, test).
///
/// `label_of` returns the class (0 or 1) of a sample. Each class
/// contributes `round(class_len * test_fraction)` samples to the
/// test set.
pub fn stratified_split<T, F>(
    samples:       Vec<T>,
    test_fraction: f64,
    seed:          u64,
    label_of:      F,
) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> u8,
{
    let test_fraction = test_fraction.clamp(0.0, 1.0);
    let mut by_class: [Vec<T>; 2] = [Vec::new(), Vec::new()];
    for s in samples {
        let class = label_of(&s).min(1) as usize;
        by_class[class].push(s);
    }

    let mut rng   = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test  = Vec::new();

    for mut class in by_class {
        class.shuffle(&mut rng);
        let n_test = ((class.len() as f64) * test_fraction).round() as usize;
        let cut    = class.len() - n_test.min(class.len());
        test.extend(class.split_off(cut));
        train.extend(class);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);

    tracing::debug!("Stratified split: {} train, {} test", train.len(), test.len());
    (train, test)
}

/// Split off the last `holdout_fraction` of `samples` without
/// reordering. Returns (head, tail).
pub fn split_tail<T>(mut samples: Vec<T>, holdout_fraction: f64) -> (Vec<T>, Vec<T>) {
    let total    = samples.len();
    let holdout  = ((total as f64) * holdout_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = total - holdout.min(total);

    // split_off(n) removes elements [n..] from the Vec and returns them
    let tail = samples.split_off(split_at);
    (samples, tail)
}
