//! Interactive selection helpers on top of the `Selector` boundary

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Plan;
use crate::infrastructure::traits::Selector;

/// Let the user pick one of `items`; returns its index.
///
/// Callers must not pass an empty list.
pub fn select_index(
    selector: &dyn Selector,
    items: &[String],
    prompt: &str,
) -> ApplicationResult<usize> {
    let index = selector
        .select_one(items, prompt)
        .with_context("interactive selection")?
        .ok_or(ApplicationError::SelectionCancelled)?;

    if index >= items.len() {
        return Err(ApplicationError::InvalidSelection {
            index,
            len: items.len(),
        });
    }
    debug!("selected {:?}", items[index]);
    Ok(index)
}

/// Let the user pick one of `items`; returns it verbatim.
pub fn list_selection(
    selector: &dyn Selector,
    items: &[String],
    prompt: &str,
) -> ApplicationResult<String> {
    let index = select_index(selector, items, prompt)?;
    Ok(items[index].clone())
}

/// Let the user pick one of the known plans.
pub fn plan_selection(selector: &dyn Selector, prompt: &str) -> ApplicationResult<Plan> {
    let plans: Vec<String> = Plan::KNOWN.iter().map(|p| p.to_string()).collect();
    let chosen = list_selection(selector, &plans, prompt)?;
    Ok(Plan::new(chosen)?)
}
