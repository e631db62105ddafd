//! Fully funded balance: reserve accrued in proportion to each component's consumed life

use crate::inventory::Component;

/// Fraction of a component's life already used, clamped to [0, 1]
///
/// A zero useful life is treated as fully depreciated (1.0).
pub fn depreciation_ratio(component: &Component) -> f64 {
    if component.useful_life <= 0.0 {
        return 1.0;
    }
    (component.effective_age() / component.useful_life).clamp(0.0, 1.0)
}

/// Sum of replacement_cost * (effective_age / useful_life) over all components
pub fn fully_funded_balance(components: &[Component]) -> f64 {
    let mut ffb = 0.0;

    for component in components {
        if component.is_overlived() {
            log::warn!(
                "component '{}' has remaining life {} beyond useful life {}; counting as unaccrued",
                component.name,
                component.remaining_life,
                component.useful_life
            );
        }
        ffb += component.replacement_cost * depreciation_ratio(component);
    }

    log::debug!("fully funded balance {:.2} from {} components", ffb, components.len());
    ffb
}

/// Reserve balance as a percentage of the fully funded balance (0-100+)
///
/// Returns 0 when there is nothing to fund.
pub fn percent_funded(balance: f64, fully_funded_balance: f64) -> f64 {
    if fully_funded_balance > 0.0 {
        balance / fully_funded_balance * 100.0
    } else {
        0.0
    }
}
