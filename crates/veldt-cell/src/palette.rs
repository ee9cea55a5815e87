//! Height/slope palette for per-vertex terrain color.

const LOWLAND: [u8; 4] = [150, 124, 88, 255];
const MEADOW: [u8; 4] = [86, 132, 62, 255];
const HIGHLAND: [u8; 4] = [118, 112, 96, 255];
const PEAK: [u8; 4] = [226, 228, 234, 255];
const ROCK: [u8; 4] = [108, 104, 98, 255];

// Band upper edges; each band cross-fades into the next over BLEND units.
const LOWLAND_TOP: f32 = 18.0;
const MEADOW_TOP: f32 = 40.0;
const HIGHLAND_TOP: f32 = 58.0;
const BLEND: f32 = 4.0;

// Below this slope (normal.y) the surface reads as bare rock.
const ROCK_SLOPE: f32 = 0.72;
const ROCK_SLOPE_BLEND: f32 = 0.08;

#[inline]
fn mix(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2]), 255]
}

#[inline]
fn band_color(height: f32) -> [u8; 4] {
    if height < LOWLAND_TOP {
        mix(LOWLAND, MEADOW, (height - (LOWLAND_TOP - BLEND)) / BLEND)
    } else if height < MEADOW_TOP {
        mix(MEADOW, HIGHLAND, (height - (MEADOW_TOP - BLEND)) / BLEND)
    } else if height < HIGHLAND_TOP {
        mix(HIGHLAND, PEAK, (height - (HIGHLAND_TOP - BLEND)) / BLEND)
    } else {
        PEAK
    }
}

/// Color for a terrain vertex: lowland/meadow/highland/peak height bands,
/// pulled toward rock where the surface steepens.
pub fn vertex_color(height: f32, slope: f32) -> [u8; 4] {
    let base = band_color(height);
    if slope >= ROCK_SLOPE + ROCK_SLOPE_BLEND {
        base
    } else {
        let rockiness = 1.0 - (slope - ROCK_SLOPE) / ROCK_SLOPE_BLEND;
        mix(base, ROCK, rockiness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_meadow_is_green() {
        let c = vertex_color(28.0, 1.0);
        assert_eq!(c, MEADOW);
    }

    #[test]
    fn cliffs_read_as_rock_regardless_of_band() {
        assert_eq!(vertex_color(28.0, 0.2), ROCK);
        assert_eq!(vertex_color(70.0, 0.2), ROCK);
    }

    #[test]
    fn peaks_are_pale() {
        assert_eq!(vertex_color(70.0, 1.0), PEAK);
    }

    #[test]
    fn band_transitions_are_continuous() {
        // Stepping 0.1 units across a band edge must not jump a channel
        // by more than a few points.
        for edge in [LOWLAND_TOP, MEADOW_TOP, HIGHLAND_TOP] {
            let below = vertex_color(edge - 0.05, 1.0);
            let above = vertex_color(edge + 0.05, 1.0);
            for ch in 0..3 {
                let d = (below[ch] as i32 - above[ch] as i32).abs();
                assert!(d <= 4, "channel {ch} jumped {d} at band edge {edge}");
            }
        }
    }
}
