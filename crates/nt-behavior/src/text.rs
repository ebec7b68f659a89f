//! Optional text generation for display labels.
//!
//! A [`TextGenerator`] may rewrite the activity text shown when an agent
//! arrives somewhere.  It is never consulted for decisions: the scheduler has
//! already committed the state change before asking, and any error or empty
//! reply leaves the plain activity label in place.

use crate::BehaviorResult;

pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> BehaviorResult<String>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> BehaviorResult<String>,
{
    fn generate(&self, prompt: &str) -> BehaviorResult<String> {
        self(prompt)
    }
}

/// Prompt describing an agent that just arrived at `zone`.
pub fn arrival_prompt(name: &str, activity: &str, zone: &str) -> String {
    format!("In one short sentence, describe what {name} is doing while {activity} at {zone}.")
}
