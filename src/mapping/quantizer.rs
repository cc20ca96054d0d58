/*
Inclusive-Endpoint Quantizer
============================

Maps a continuous control value onto one entry of an ordered table.

    index = floor((len - 1) * clamp(x, 0, 1))

Both endpoints land exactly on table entries: x = 0 picks the first entry,
x = 1 picks the last. This is NOT an equal-width-bucket quantizer. With
four entries:

    x:      0.0        0.333      0.667       1.0
            |----------|----------|-----------|
    index:  0          1          2           3

Every entry except the last owns a span of width 1/(len-1); the last entry
owns the single point x = 1.0. Players relying on the exact boundaries
(recorded gestures, tests) depend on this shape, so it must not be
"improved" into even buckets.

Saturation
----------

Inputs outside [0, 1] are clamped, not rejected. A hand drifting off the
sensor's edge keeps playing the edge note. NaN saturates to 0.

Empty Tables
------------

An empty table has nothing to select; the result is None, never an index.
*/

/// Clamp to [0, 1]; NaN maps to 0.0
#[inline]
pub fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Table index selected by `x`, or None when `len == 0`
#[inline]
pub fn index_for(len: usize, x: f32) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let scaled = (last as f32 * clamp_unit(x)).floor() as usize;
    Some(scaled.min(last))
}

/// Entry of `table` selected by `x`
#[inline]
pub fn select<T>(table: &[T], x: f32) -> Option<&T> {
    index_for(table.len(), x).map(|idx| &table[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: [u8; 7] = [24, 26, 28, 29, 31, 33, 35];

    #[test]
    fn endpoints_select_first_and_last() {
        assert_eq!(select(&TABLE, 0.0), Some(&24));
        assert_eq!(select(&TABLE, 1.0), Some(&35));
    }

    #[test]
    fn out_of_range_saturates() {
        for x in [-10.0, -0.001, f32::NEG_INFINITY] {
            assert_eq!(select(&TABLE, x), select(&TABLE, 0.0));
        }
        for x in [1.001, 42.0, f32::INFINITY] {
            assert_eq!(select(&TABLE, x), select(&TABLE, 1.0));
        }
        assert_eq!(select(&TABLE, f32::NAN), Some(&24));
    }

    #[test]
    fn every_input_selects_a_member() {
        for step in 0..=1000 {
            let x = step as f32 / 1000.0;
            let picked = select(&TABLE, x).unwrap();
            assert!(TABLE.contains(picked));
        }
    }

    #[test]
    fn boundaries_follow_floor_of_scaled_input() {
        // 4 entries: spans are [0, 1/3), [1/3, 2/3), [2/3, 1), {1}
        assert_eq!(index_for(4, 0.33), Some(0));
        assert_eq!(index_for(4, 0.34), Some(1));
        assert_eq!(index_for(4, 0.66), Some(1));
        assert_eq!(index_for(4, 0.67), Some(2));
        assert_eq!(index_for(4, 0.999), Some(2));
        assert_eq!(index_for(4, 1.0), Some(3));
    }

    #[test]
    fn index_is_monotonic() {
        let mut previous = 0;
        for step in 0..=500 {
            let idx = index_for(13, step as f32 / 500.0).unwrap();
            assert!(idx >= previous);
            previous = idx;
        }
        assert_eq!(previous, 12);
    }

    #[test]
    fn single_entry_always_selected() {
        assert_eq!(select(&[60u8], 0.0), Some(&60));
        assert_eq!(select(&[60u8], 0.7), Some(&60));
    }

    #[test]
    fn empty_table_selects_nothing() {
        let empty: [u8; 0] = [];
        assert_eq!(select(&empty, 0.5), None);
        assert_eq!(index_for(0, 1.0), None);
    }
}
