use super::{Evolution, Function, Interpolation};
use crate::color::Color;
use crate::interval::Interval;

/// Disjoint intervals where a presence timeline resolves to true, as [`Evolution::value_at`]
/// sees it. Times no function covers are absent whatever the default value.
///
/// The sorted bounds of every function split the timeline into points and open gaps; each
/// piece has a single resolved value, so consecutive true pieces coalesce exactly.
pub fn merged_intervals(presence: &Evolution<bool>) -> Vec<Interval> {
    let bounds = presence.change_times();
    let resolved = |t: f64| presence.function_at(t).is_some_and(|f| f.value_at(t));

    let mut out: Vec<Interval> = Vec::new();
    // (left, left_closed, right, right_closed) of the run being built
    let mut run: Option<(f64, bool, f64, bool)> = None;
    let mut close = |run: &mut Option<(f64, bool, f64, bool)>| {
        if let Some((l, lc, r, rc)) = run.take() {
            out.push(Interval::with_bounds(l, r, lc, rc));
        }
    };

    for (k, &t) in bounds.iter().enumerate() {
        if resolved(t) {
            match run.as_mut() {
                Some(current) => {
                    current.2 = t;
                    current.3 = true;
                }
                None => run = Some((t, true, t, true)),
            }
        } else {
            close(&mut run);
        }

        let Some(&next) = bounds.get(k + 1) else {
            break;
        };
        if resolved(t + (next - t) / 2.0) {
            match run.as_mut() {
                Some(current) => {
                    current.2 = next;
                    current.3 = false;
                }
                None => run = Some((t, false, next, false)),
            }
        } else {
            close(&mut run);
        }
    }
    close(&mut run);
    out
}

/// Read-only merge of a presence timeline into disjoint constant-true functions.
pub fn merge_functions(presence: &Evolution<bool>) -> Evolution<bool> {
    let mut merged = Evolution::new(*presence.default_value());
    for interval in merged_intervals(presence) {
        merged.insert(Function::constant(interval, true));
    }
    merged
}

/// Inserts fade-in, solid, and fade-out color functions for every presence interval.
///
/// When the two fades would overlap they are split at the interval midpoint.
pub fn apply_fading(
    presence: &Evolution<bool>,
    color: &mut Evolution<Color>,
    duration: f64,
    target: Color,
) {
    for interval in merged_intervals(presence) {
        let left = interval.left_bound();
        let right = interval.right_bound();
        let mut end_fade_in = left + duration;
        let mut start_fade_out = right - duration;
        if start_fade_out <= end_fade_in {
            end_fade_in = (left + right) / 2.0;
            start_fade_out = end_fade_in;
        }

        color.insert(Function::transition(
            Interval::closed(left, end_fade_in),
            Color::TRANSPARENT,
            target,
            Interpolation::SmoothStep,
        ));
        if end_fade_in != start_fade_out {
            color.insert(Function::constant(
                Interval::right_closed(end_fade_in, start_fade_out),
                target,
            ));
        }
        color.insert(Function::transition(
            Interval::right_closed(start_fade_out, right),
            target,
            Color::TRANSPARENT,
            Interpolation::SmoothStep,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_absence_splits_the_presence() {
        let mut presence = Evolution::new(false);
        presence.insert(Function::constant(Interval::closed(0.0, 10.0), true));
        presence.insert(Function::constant(Interval::closed(3.0, 5.0), false));

        assert_eq!(
            merged_intervals(&presence),
            vec![Interval::left_closed(0.0, 3.0), Interval::right_closed(5.0, 10.0)]
        );
        let before: Vec<bool> = [0.0, 2.9, 3.0, 4.0, 5.0, 5.1, 10.0]
            .iter()
            .map(|&t| presence.value_at(t))
            .collect();
        presence.merge();
        let after: Vec<bool> = [0.0, 2.9, 3.0, 4.0, 5.0, 5.1, 10.0]
            .iter()
            .map(|&t| presence.value_at(t))
            .collect();
        assert_eq!(before, vec![true, true, false, false, false, true, true]);
        assert_eq!(after, before);
    }

    #[test]
    fn open_bounds_meeting_at_a_point_stay_apart() {
        let mut presence = Evolution::new(false);
        presence.insert(Function::constant(Interval::left_closed(0.0, 5.0), true));
        presence.insert(Function::constant(Interval::right_closed(5.0, 10.0), true));

        let merged = merged_intervals(&presence);
        assert_eq!(
            merged,
            vec![Interval::left_closed(0.0, 5.0), Interval::right_closed(5.0, 10.0)]
        );
        assert!(!merged.iter().any(|i| i.contains(5.0)));
    }

    #[test]
    fn default_true_outside_functions_is_not_presence() {
        let mut presence = Evolution::new(true);
        presence.insert(Function::constant(Interval::closed(2.0, 4.0), true));
        assert_eq!(merged_intervals(&presence), vec![Interval::closed(2.0, 4.0)]);
    }

    #[test]
    fn fades_collapse_at_midpoint() {
        let mut presence = Evolution::new(false);
        presence.insert(Function::constant(Interval::closed(0.0, 2.0), true));
        let mut color = Evolution::new(Color::TRANSPARENT);
        apply_fading(&presence, &mut color, 5.0, Color::BLACK);

        assert_eq!(color.len(), 2);
        assert_eq!(color.value_at(1.0), Color::BLACK);
        assert_eq!(color.value_at(0.0).a, 0.0);
        assert_eq!(color.value_at(2.0).a, 0.0);
    }

    #[test]
    fn solid_segment_between_fades() {
        let mut presence = Evolution::new(false);
        presence.insert(Function::constant(Interval::closed(0.0, 10.0), true));
        let mut color = Evolution::new(Color::TRANSPARENT);
        apply_fading(&presence, &mut color, 1.0, Color::WHITE);

        assert_eq!(color.len(), 3);
        assert_eq!(color.value_at(5.0), Color::WHITE);
        assert!(color.value_at(0.5).a > 0.0 && color.value_at(0.5).a < 1.0);
    }
}
