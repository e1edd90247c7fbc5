use ndarray::Array1;

/// Turns joint log-likelihoods into a probability distribution, shifting by
/// the max score before exponentiating.
pub(crate) fn normalize_log_scores(scores: &Array1<f64>) -> Array1<f64> {
    if scores.is_empty() {
        return Array1::zeros(0);
    }
    let max = scores.fold(f64::NEG_INFINITY, |acc, &x| acc.max(x));
    if !max.is_finite() {
        return Array1::from_elem(scores.len(), 1.0 / scores.len() as f64);
    }
    let exp = scores.mapv(|x| (x - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Index of the largest value; the first index wins on exact ties.
pub(crate) fn argmax(values: &Array1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in values.iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}
