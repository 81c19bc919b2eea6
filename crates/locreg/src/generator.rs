use crate::config::Config;

/// Enumerates the full candidate location space in a fixed order: odd shelf
/// numbers first, then even, nesting number → letter → sub-number.
///
/// Deterministic for a given config. Checkpoint-based resume depends on the
/// same config always producing the identical sequence.
pub fn generate_all(config: &Config) -> Vec<String> {
    let odd = (1..=config.max_odd_shelf).step_by(2);
    let even = (2..=config.max_even_shelf).step_by(2);
    let mut codes = Vec::new();
    for number in odd.chain(even) {
        for &letter in &config.shelf_letters {
            for sub in 1..=config.sub_slots_per_shelf {
                codes.push(format!("{} {:02} {}{:02}", config.prefix, number, letter, sub));
            }
        }
    }
    codes
}
