//! Merge a requested change into a parameter set.

use tracing::debug;

use crate::params::ParameterSet;
use crate::request::{ChangeRequest, State};

/// Apply `request` to `current`, returning the new set and whether it differs.
///
/// The input set is left untouched. Values compare exactly, so a bare flag,
/// an explicit empty value and any other string are three distinct states.
pub fn apply(current: &ParameterSet, request: &ChangeRequest) -> (ParameterSet, bool) {
    let mut next = current.clone();
    let changed = match request.state {
        State::Present => {
            let wanted = request.value.as_deref();
            if current.get(&request.parameter) == Some(wanted) {
                false
            } else {
                next.insert(request.parameter.clone(), request.value.clone());
                true
            }
        }
        State::Absent => next.remove(&request.parameter).is_some(),
    };
    debug!(
        parameter = %request.parameter,
        state = %request.state,
        changed,
        "merged change request"
    );
    (next, changed)
}
