//! Scenario selection with a no-immediate-repeat rule.
use rand::Rng;

use crate::data::{EventCatalog, EventDefinition};

/// Draw the next scenario uniformly from `catalog`.
///
/// With more than one event available the draw is repeated until its id
/// differs from `previous_id`. A single-event catalog always yields that
/// event.
pub fn next<'a, R: Rng>(
    catalog: &'a EventCatalog,
    previous_id: Option<&str>,
    rng: &mut R,
) -> &'a EventDefinition {
    let events = catalog.events();
    let mut redraws = 0_u32;
    loop {
        let event = &events[rng.gen_range(0..events.len())];
        let repeats = previous_id.is_some_and(|id| id == event.id);
        if events.len() < 2 || !repeats {
            if redraws > 0 {
                log::trace!("selected {} after {redraws} redraw(s)", event.id);
            }
            return event;
        }
        redraws += 1;
        log::trace!("redrawing: {} was the previous event", event.id);
    }
}
