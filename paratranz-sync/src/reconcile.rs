//! Carrying review stages across exports.

use std::collections::HashMap;

use crate::{
    report::{Event, Reporter},
    types::{Stage, TranslationItem},
};

/// Replaces the stage of every fresh item with the stage its key had in
/// `prior`, when that stage means the item was already worked on.
///
/// Translation text is never taken from `prior`. Returns how many items
/// changed stage.
pub fn reconcile_stages(
    fresh: &mut [TranslationItem],
    prior: &[TranslationItem],
    reporter: &dyn Reporter,
) -> usize {
    let carried: HashMap<&str, Stage> = prior
        .iter()
        .filter(|item| item.stage.is_touched())
        .map(|item| (item.key.as_str(), item.stage))
        .collect();

    let mut changed = 0;
    for item in fresh.iter_mut() {
        let Some(&stage) = carried.get(item.key.as_str()) else {
            continue;
        };
        if stage != item.stage {
            reporter.report(Event::StageCarried {
                key: item.key.clone(),
                from: item.stage,
                to: stage,
            });
            item.stage = stage;
            changed += 1;
        }
    }
    changed
}
