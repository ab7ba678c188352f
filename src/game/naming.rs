use rand::Rng;
use std::collections::HashSet;

pub const PLANET_NAME_PREFIXES: &[&str] = &[
    "Xylo", "Zeta", "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Omega", "Neo", "Terra", "Aqua",
    "Ignis",
];
pub const PLANET_NAME_SUFFIXES: &[&str] = &[
    " Prime",
    " Minor",
    " Major",
    " Secundus",
    " IV",
    " IX",
    " Station",
    " Point",
    " Landing",
    " Rock",
    " Reach",
    "'s World",
];

const RANDOM_NAME_ATTEMPTS: usize = 500;

/// Number of distinct names the prefix/suffix pool can produce.
pub fn name_pool_size() -> usize {
    PLANET_NAME_PREFIXES.len() * PLANET_NAME_SUFFIXES.len()
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &'a [&str]) -> &'a str {
    let idx = rng.gen_range(0..options.len());
    options[idx]
}

fn combine(prefix: &str, suffix: &str) -> String {
    format!("{prefix}{suffix}")
}

/// Draws a prefix+suffix name not yet in `used` and records it.
///
/// Random draws are rejected on duplicates; once the random budget is spent the
/// first free combination in pool order is taken. Returns `None` only when the
/// whole pool is already in use.
pub fn generate_planet_name<R: Rng + ?Sized>(
    rng: &mut R,
    used: &mut HashSet<String>,
) -> Option<String> {
    for _ in 0..RANDOM_NAME_ATTEMPTS {
        let candidate = combine(
            pick(rng, PLANET_NAME_PREFIXES),
            pick(rng, PLANET_NAME_SUFFIXES),
        );
        if used.insert(candidate.clone()) {
            return Some(candidate);
        }
    }

    let fallback = PLANET_NAME_PREFIXES.iter().find_map(|prefix| {
        PLANET_NAME_SUFFIXES
            .iter()
            .map(|suffix| combine(prefix, suffix))
            .find(|name| !used.contains(name))
    })?;
    used.insert(fallback.clone());
    Some(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn names_are_deterministic_for_a_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        let mut used_a = HashSet::new();
        let mut used_b = HashSet::new();
        for _ in 0..10 {
            assert_eq!(
                generate_planet_name(&mut a, &mut used_a),
                generate_planet_name(&mut b, &mut used_b)
            );
        }
    }

    #[test]
    fn names_come_from_the_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut used = HashSet::new();
        let name = generate_planet_name(&mut rng, &mut used).expect("pool has room");
        assert!(PLANET_NAME_PREFIXES.iter().any(|p| name.starts_with(p)));
        assert!(PLANET_NAME_SUFFIXES.iter().any(|s| name.ends_with(s)));
    }

    #[test]
    fn whole_pool_can_be_drained_without_duplicates() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut used = HashSet::new();
        for _ in 0..name_pool_size() {
            assert!(generate_planet_name(&mut rng, &mut used).is_some());
        }
        assert_eq!(used.len(), name_pool_size());
        assert_eq!(generate_planet_name(&mut rng, &mut used), None);
    }
}
