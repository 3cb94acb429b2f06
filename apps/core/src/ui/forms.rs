use super::dom::{Document, Selector};

pub const VALIDATED_CLASS: &str = "was-validated";
pub const INITIAL_VALUE_ATTR: &str = "data-initial-value";

/// Native validity of the form with `form_id`; a missing form counts as valid.
pub fn validate_form<D: Document>(doc: &mut D, form_id: &str) -> bool {
    let Some(form) = doc.element_by_id(form_id) else {
        return true;
    };
    let valid = doc.check_validity(&form);
    doc.add_class(&form, VALIDATED_CLASS);
    valid
}

/// Heuristic unsaved-changes check used by the unload guard: a validated
/// form holding a filled input that carries no initial-value marker.
pub fn has_unsaved_changes<D: Document>(doc: &D) -> bool {
    doc.select_all(&Selector::Tag("form"))
        .iter()
        .filter(|form| doc.has_class(form, VALIDATED_CLASS))
        .any(|form| {
            doc.select_within(form, &Selector::Tag("input"))
                .iter()
                .any(|input| {
                    let filled = doc.value(input).is_some_and(|value| !value.is_empty());
                    filled && doc.attribute(input, INITIAL_VALUE_ATTR).is_none()
                })
        })
}
