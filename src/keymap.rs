//! Keyboard-to-note tables for the two live-play channels.

/// Home row: C4..B4, played on channel 0.
pub const CHANNEL1_KEYS: [(char, f32); 7] = [
    ('a', 261.63),
    ('s', 293.66),
    ('d', 329.63),
    ('f', 349.23),
    ('g', 392.00),
    ('h', 440.00),
    ('j', 493.88),
];

/// Bottom row: C5..B5, played on channel 1.
pub const CHANNEL2_KEYS: [(char, f32); 7] = [
    ('z', 523.25),
    ('x', 587.33),
    ('c', 659.26),
    ('v', 698.46),
    ('b', 783.99),
    ('n', 880.00),
    ('m', 987.77),
];

/// Resolve a pressed key to its `(channel, frequency)` binding.
pub fn key_binding(key: char) -> Option<(usize, f32)> {
    CHANNEL1_KEYS
        .iter()
        .find(|&&(k, _)| k == key)
        .map(|&(_, f)| (0, f))
        .or_else(|| {
            CHANNEL2_KEYS
                .iter()
                .find(|&&(k, _)| k == key)
                .map(|&(_, f)| (1, f))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::staff_position;

    #[test]
    fn rows_map_to_their_channels() {
        assert_eq!(key_binding('a'), Some((0, 261.63)));
        assert_eq!(key_binding('h'), Some((0, 440.00)));
        assert_eq!(key_binding('z'), Some((1, 523.25)));
        assert_eq!(key_binding('m'), Some((1, 987.77)));
    }

    #[test]
    fn unmapped_keys_resolve_to_nothing() {
        assert_eq!(key_binding('p'), None);
        assert_eq!(key_binding('A'), None);
        assert_eq!(key_binding(' '), None);
    }

    #[test]
    fn every_key_frequency_is_placeable() {
        for (_, frequency) in CHANNEL1_KEYS.iter().chain(CHANNEL2_KEYS.iter()) {
            assert!(staff_position(*frequency).is_some());
        }
    }
}
