//! Expenditure scheduling: component inventory to per-year replacement costs

use crate::inventory::{Component, ComponentCategory};
use serde::{Deserialize, Serialize};

/// How replacements are placed on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    /// Only the next replacement, at floor(remaining_life)
    #[default]
    SingleReplacement,
    /// Next replacement, then again every useful_life years within the horizon
    Recurring,
}

/// Expenditures of one component inside the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentExpenditure {
    pub name: String,
    pub category: ComponentCategory,
    /// (projection year index, cost) for each year with a replacement in the horizon
    pub events: Vec<(usize, f64)>,
}

impl ComponentExpenditure {
    pub fn total(&self) -> f64 {
        self.events.iter().map(|&(_, cost)| cost).sum()
    }
}

/// Replacements of a component inside the horizon as (year index, count) pairs
///
/// Replacement `k` lands in year `floor(remaining_life + k * useful_life)`.
/// Recurring replacements are counted per year rather than enumerated, so a
/// useful life shorter than a year yields one entry per year carrying the
/// number of replacements in it. The work is bounded by the horizon.
pub fn replacements(component: &Component, years: usize, mode: ScheduleMode) -> Vec<(usize, f64)> {
    let first = component.first_replacement_index();
    if first >= years {
        return Vec::new();
    }
    let life = component.useful_life;
    let recurs = mode == ScheduleMode::Recurring && life > 0.0;
    if !recurs {
        return vec![(first, 1.0)];
    }

    let start = component.remaining_life.max(0.0);
    let mut counts = Vec::new();
    // replacements already placed in earlier years
    let mut placed = 0.0;

    for year in first..years {
        // replacements landing before the end of this year; the first always does
        let through = ((year as f64 + 1.0 - start) / life).ceil().max(1.0);
        if through > placed {
            counts.push((year, through - placed));
            placed = through;
        }
    }

    counts
}

/// Year indices at which a component is replaced within `years`
///
/// Fractional lives floor toward the earlier year.
pub fn replacement_years(component: &Component, years: usize, mode: ScheduleMode) -> Vec<usize> {
    replacements(component, years, mode)
        .into_iter()
        .map(|(year, _)| year)
        .collect()
}

/// Build the expenditure vector of length `years`
///
/// `vector[floor(remaining_life)] += replacement_cost` for every component
/// replaced inside the horizon. Components at or beyond the horizon are
/// left out.
pub fn schedule_expenditures(components: &[Component], years: usize, mode: ScheduleMode) -> Vec<f64> {
    let mut expenditures = vec![0.0; years];

    for component in components {
        for (index, count) in replacements(component, years, mode) {
            expenditures[index] += component.replacement_cost * count;
        }
    }

    log::debug!(
        "scheduled {} components over {} years, total {:.2}",
        components.len(),
        years,
        expenditures.iter().sum::<f64>()
    );

    expenditures
}

/// Per-component breakdown of the schedule, in inventory order
pub fn component_expenditures(
    components: &[Component],
    years: usize,
    mode: ScheduleMode,
) -> Vec<ComponentExpenditure> {
    components
        .iter()
        .map(|c| ComponentExpenditure {
            name: c.name.clone(),
            category: c.category,
            events: replacements(c, years, mode)
                .into_iter()
                .map(|(year, count)| (year, c.replacement_cost * count))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn component(useful: f64, remaining: f64, cost: f64) -> Component {
        Component::new("c", ComponentCategory::Other, useful, remaining, cost)
    }

    #[test]
    fn test_single_component_placement() {
        let roof = component(25.0, 11.0, 448_800.0);
        let v = schedule_expenditures(&[roof], 30, ScheduleMode::SingleReplacement);

        assert_eq!(v.len(), 30);
        assert_eq!(v[11], 448_800.0);
        assert_eq!(v.iter().sum::<f64>(), 448_800.0);
    }

    #[test]
    fn test_beyond_horizon_excluded() {
        let long_life = component(50.0, 30.0, 1_000_000.0);
        let far = component(60.0, 45.5, 2_000_000.0);
        let v = schedule_expenditures(&[long_life, far], 30, ScheduleMode::SingleReplacement);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_zero_remaining_life_in_first_year() {
        let due_now = component(20.0, 0.0, 38_000.0);
        let v = schedule_expenditures(&[due_now], 5, ScheduleMode::SingleReplacement);
        assert_eq!(v, vec![38_000.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_same_year_accumulates() {
        let a = component(10.0, 4.0, 1_000.0);
        let b = component(15.0, 4.9, 2_500.0);
        let v = schedule_expenditures(&[a, b], 10, ScheduleMode::SingleReplacement);
        assert_eq!(v[4], 3_500.0);
        assert_eq!(v.iter().filter(|&&x| x != 0.0).count(), 1);
    }

    #[test]
    fn test_fractional_life_floors() {
        let c = component(10.0, 29.99, 7.0);
        let v = schedule_expenditures(&[c], 30, ScheduleMode::SingleReplacement);
        assert_eq!(v[29], 7.0);
    }

    #[test]
    fn test_recurring_replacements() {
        let paint = component(10.0, 3.0, 96_000.0);
        assert_eq!(replacement_years(&paint, 30, ScheduleMode::Recurring), vec![3, 13, 23]);
        assert_eq!(replacement_years(&paint, 30, ScheduleMode::SingleReplacement), vec![3]);

        let v = schedule_expenditures(&[paint], 30, ScheduleMode::Recurring);
        assert_eq!(v[13], 96_000.0);
        assert_eq!(v.iter().sum::<f64>(), 3.0 * 96_000.0);
    }

    #[test]
    fn test_recurring_with_fractional_lives() {
        let c = component(7.5, 2.5, 1.0);
        assert_eq!(replacement_years(&c, 20, ScheduleMode::Recurring), vec![2, 10, 17]);
    }

    #[test]
    fn test_sub_year_life_counts_per_year() {
        let c = component(0.25, 1.0, 10.0);
        assert_eq!(
            replacements(&c, 3, ScheduleMode::Recurring),
            vec![(1, 4.0), (2, 4.0)]
        );
        let v = schedule_expenditures(&[c], 3, ScheduleMode::Recurring);
        assert_eq!(v, vec![0.0, 40.0, 40.0]);
    }

    #[test]
    fn test_tiny_useful_life_stays_bounded() {
        let c = component(1e-9, 0.0, 1.0);
        let counts = replacements(&c, 30, ScheduleMode::Recurring);
        assert_eq!(counts.len(), 30);

        let breakdown = component_expenditures(&[c.clone()], 30, ScheduleMode::Recurring);
        assert_eq!(breakdown[0].events.len(), 30);

        let v = schedule_expenditures(&[c], 30, ScheduleMode::Recurring);
        assert_relative_eq!(v.iter().sum::<f64>(), 3e10, max_relative = 1e-6);
    }

    #[test]
    fn test_zero_useful_life_never_recurs() {
        let c = component(0.0, 0.0, 500.0);
        assert_eq!(replacement_years(&c, 30, ScheduleMode::Recurring), vec![0]);
    }

    #[test]
    fn test_component_breakdown() {
        let roof = Component::new("Roof", ComponentCategory::Roof, 25.0, 11.0, 448_800.0);
        let elevator = Component::new("Elevator", ComponentCategory::Other, 25.0, 40.0, 180_000.0);
        let breakdown = component_expenditures(&[roof, elevator], 30, ScheduleMode::SingleReplacement);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].events, vec![(11, 448_800.0)]);
        assert_eq!(breakdown[0].total(), 448_800.0);
        assert!(breakdown[1].events.is_empty());
    }
}
