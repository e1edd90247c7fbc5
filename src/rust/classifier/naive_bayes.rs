use ndarray::{Array1, Array2, Axis};

use super::error::ClassifierError;
use super::utils::normalize_log_scores;

/// Additive (Laplace) smoothing applied to every token count.
const ALPHA: f64 = 1.0;

/// Multinomial-event Naive Bayes over raw token counts.
///
/// Labels are kept in lexicographic order, so index order doubles as the
/// tie-break order when two classes score exactly the same.
#[derive(Debug, Clone)]
pub struct MultinomialNaiveBayes {
    labels: Vec<String>,
    class_log_prior: Array1<f64>,
    /// `(classes, vocabulary)` matrix of `log P(token | class)`
    feature_log_prob: Array2<f64>,
}

impl MultinomialNaiveBayes {
    /// Fits the model.
    ///
    /// # Arguments
    /// * `features` - `(examples, vocabulary)` count matrix
    /// * `targets` - label of each row of `features`
    ///
    /// # Errors
    /// - `EmptyCorpusError` if there are no examples
    /// - `ValidationError` if `features` and `targets` disagree in length
    pub fn fit(features: &Array2<f64>, targets: &[String]) -> Result<Self, ClassifierError> {
        if targets.is_empty() {
            return Err(ClassifierError::EmptyCorpusError("No training examples".into()));
        }
        if features.nrows() != targets.len() {
            return Err(ClassifierError::ValidationError(format!(
                "Got {} feature rows for {} labels",
                features.nrows(),
                targets.len()
            )));
        }

        let mut labels: Vec<String> = targets.to_vec();
        labels.sort();
        labels.dedup();

        let n_features = features.ncols();
        let mut class_count = Array1::<f64>::zeros(labels.len());
        let mut feature_count = Array2::<f64>::zeros((labels.len(), n_features));

        for (row, target) in features.axis_iter(Axis(0)).zip(targets) {
            // labels is sorted and contains every target
            let class = labels.binary_search(target).unwrap_or_else(|i| i);
            class_count[class] += 1.0;
            let mut counts = feature_count.row_mut(class);
            counts += &row;
        }

        let total = class_count.sum();
        let class_log_prior = class_count.mapv(|n| (n / total).ln());

        let class_tokens = feature_count.sum_axis(Axis(1));
        let mut feature_log_prob = feature_count.mapv(|n| n + ALPHA);
        for (mut row, &tokens) in feature_log_prob
            .axis_iter_mut(Axis(0))
            .zip(class_tokens.iter())
        {
            let denominator = (tokens + ALPHA * n_features as f64).ln();
            row.mapv_inplace(|n| n.ln() - denominator);
        }

        Ok(Self {
            labels,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Class labels in score order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn class_log_prior(&self) -> &Array1<f64> {
        &self.class_log_prior
    }

    pub fn feature_log_prob(&self) -> &Array2<f64> {
        &self.feature_log_prob
    }

    /// `log P(c) + Σ count(t) · log P(t | c)` for every class.
    pub fn joint_log_likelihood(&self, counts: &Array1<f64>) -> Array1<f64> {
        if counts.is_empty() {
            return self.class_log_prior.clone();
        }
        self.feature_log_prob.dot(counts) + &self.class_log_prior
    }

    /// Posterior distribution over the classes for a count vector.
    pub fn predict_proba(&self, counts: &Array1<f64>) -> Array1<f64> {
        normalize_log_scores(&self.joint_log_likelihood(counts))
    }
}
