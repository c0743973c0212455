//! Nice-value tick locator for continuous axes (d3-style).

const E10: f64 = 7.071067811865476; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Generate approximately `count` round tick values inside `[start, stop]`.
///
/// Every returned value lies within the closed interval, so positions stay
/// inside the axis after normalization.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return vec![];
    }
    if start == stop {
        return vec![start];
    }

    let (i1, i2, inc) = tick_spec(start, stop, count as f64);
    if i2 < i1 {
        return vec![];
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut out = Vec::with_capacity(n);
    if inc < 0.0 {
        for i in 0..n {
            out.push((i1 + i as f64) / -inc);
        }
    } else {
        for i in 0..n {
            out.push((i1 + i as f64) * inc);
        }
    }
    out
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(1.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        // Fractional steps are carried as a negative reciprocal so the tick
        // values divide exactly instead of accumulating float error.
        let denom = 10f64.powf(-power) / factor;
        i1 = (start * denom).round();
        i2 = (stop * denom).round();
        if i1 / denom < start {
            i1 += 1.0;
        }
        if i2 / denom > stop {
            i2 -= 1.0;
        }
        inc = -denom;
    } else {
        inc = 10f64.powf(power) * factor;
        i1 = (start / inc).round();
        i2 = (stop / inc).round();
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
    }

    if i2 < i1 && 0.5 <= count && count < 2.0 {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_unit_interval() {
        assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(
            ticks(0.0, 1.0, 10),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
    }

    #[test]
    fn test_ticks_wide_range() {
        assert_eq!(ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_ticks_stay_inside_domain() {
        for t in ticks(0.3, 2.5, 5) {
            assert!(t >= 0.3 && t <= 2.5, "tick {} escaped the domain", t);
        }
    }

    #[test]
    fn test_ticks_degenerate_and_empty() {
        assert_eq!(ticks(5.0, 5.0, 5), vec![5.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }
}
