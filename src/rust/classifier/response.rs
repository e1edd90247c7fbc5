use rand::seq::SliceRandom;
use rand::Rng;

use super::error::ClassifierError;
use crate::corpus::CategoryMap;

/// What the classifier decided to say back.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// A category was recognized and one of its responses was picked
    Matched { label: String, response: String },
    /// Nothing scored above the threshold; carries the fallback text
    Unrecognized { message: String },
}

impl ResponseOutcome {
    /// The text to deliver to the user.
    pub fn text(&self) -> &str {
        match self {
            Self::Matched { response, .. } => response,
            Self::Unrecognized { message } => message,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Matched { label, .. } => Some(label),
            Self::Unrecognized { .. } => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Picks one of the candidate responses of `label` uniformly at random.
///
/// # Errors
/// - `MissingResponsesError` if `label` has no entry in `outputs` or its list is empty
pub fn select_response<'a, R>(
    label: &str,
    outputs: &'a CategoryMap,
    rng: &mut R,
) -> Result<&'a str, ClassifierError>
where
    R: Rng + ?Sized,
{
    outputs
        .get(label)
        .and_then(|candidates| candidates.choose(rng))
        .map(String::as_str)
        .ok_or_else(|| ClassifierError::MissingResponsesError(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn outputs() -> CategoryMap {
        let mut outputs = CategoryMap::new();
        outputs.insert(
            "saludo".into(),
            vec!["¡Hola!".into(), "¡Buenas!".into(), "¿Qué tal?".into()],
        );
        outputs.insert("vacio".into(), vec![]);
        outputs
    }

    #[test]
    fn test_selection_stays_in_candidates() {
        let outputs = outputs();
        let candidates: HashSet<&str> = outputs["saludo"].iter().map(String::as_str).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let seen: HashSet<&str> = (0..200)
            .map(|_| select_response("saludo", &outputs, &mut rng).unwrap())
            .collect();

        assert!(seen.is_subset(&candidates));
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let outputs = outputs();
        let first = select_response("saludo", &outputs, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = select_response("saludo", &outputs, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_label() {
        let outs = outputs();
        let result = select_response("clima", &outs, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(ClassifierError::MissingResponsesError(label)) if label == "clima"));
    }

    #[test]
    fn test_empty_candidate_list() {
        let outs = outputs();
        let result = select_response("vacio", &outs, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(ClassifierError::MissingResponsesError(_))));
    }

    #[test]
    fn test_outcome_text() {
        let matched = ResponseOutcome::Matched { label: "saludo".into(), response: "¡Hola!".into() };
        assert_eq!(matched.text(), "¡Hola!");
        assert_eq!(matched.label(), Some("saludo"));

        let fallback = ResponseOutcome::Unrecognized { message: "?".into() };
        assert!(!fallback.is_matched());
        assert_eq!(fallback.label(), None);
    }
}
