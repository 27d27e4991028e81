use crate::config::ModelConfig;
use crate::domain::errors::ForecastError;
use crate::domain::ports::BinaryClassifier;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::{
    DecisionTreeClassifier, DecisionTreeClassifierParameters,
};

type Tree = DecisionTreeClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// One bagged member of the forest.
enum Member {
    Fitted(Tree),
    /// Bootstrap sample drew a single class; smartcore refuses to fit those.
    Constant(u8),
}

/// Bagged smartcore decision trees behind the `BinaryClassifier` port.
///
/// Each tree is fit on a bootstrap sample drawn from a `StdRng` seeded with
/// `ModelConfig::seed`. Class probabilities are the mean of the per-tree
/// `predict_proba` outputs and the predicted class is their argmax, ties going
/// to class 0.
pub struct RandomForestModel {
    members: Vec<Member>,
}

impl std::fmt::Debug for RandomForestModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomForestModel")
            .field("trees", &self.members.len())
            .finish_non_exhaustive()
    }
}

fn to_matrix(features: &[Vec<f64>]) -> Result<DenseMatrix<f64>, ForecastError> {
    DenseMatrix::from_2d_vec(&features.to_vec())
        .map_err(|e| ForecastError::computation(format!("Matrix creation failed: {}", e)))
}

impl RandomForestModel {
    pub fn n_trees(&self) -> usize {
        self.members.len()
    }

    /// Mean probability of class 1 for every row of `features`.
    fn buy_probabilities(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ForecastError> {
        let x = to_matrix(features)?;
        let mut sums = vec![0.0; features.len()];

        for member in &self.members {
            match member {
                Member::Constant(class) => {
                    let p = f64::from(*class);
                    sums.iter_mut().for_each(|s| *s += p);
                }
                Member::Fitted(tree) => {
                    let proba = tree.predict_proba(&x).map_err(|e| {
                        ForecastError::computation(format!("Probability estimate failed: {}", e))
                    })?;
                    // fitted trees saw both labels, so column 1 is class 1
                    for (row, sum) in sums.iter_mut().enumerate() {
                        *sum += *proba.get((row, 1));
                    }
                }
            }
        }

        let n = self.members.len() as f64;
        Ok(sums.into_iter().map(|s| s / n).collect())
    }
}

impl BinaryClassifier for RandomForestModel {
    fn fit(features: &[Vec<f64>], labels: &[u8], params: &ModelConfig) -> Result<Self, ForecastError> {
        if features.is_empty() {
            return Err(ForecastError::computation("Cannot fit on an empty training set"));
        }
        if features.len() != labels.len() {
            return Err(ForecastError::computation(format!(
                "Feature/label length mismatch: {} vs {}",
                features.len(),
                labels.len()
            )));
        }
        if labels.iter().all(|&l| l == labels[0]) {
            return Err(ForecastError::computation(format!(
                "Training set has a single class ({}); need both up and down days",
                labels[0]
            )));
        }

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut members = Vec::with_capacity(usize::from(params.n_trees));

        for _ in 0..params.n_trees {
            let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            let tree_seed: u64 = rng.random();

            let first = labels[sample[0]];
            if sample.iter().all(|&i| labels[i] == first) {
                members.push(Member::Constant(first));
                continue;
            }

            let x_sample: Vec<Vec<f64>> = sample.iter().map(|&i| features[i].clone()).collect();
            let y_sample: Vec<i32> = sample.iter().map(|&i| i32::from(labels[i])).collect();
            let parameters = DecisionTreeClassifierParameters {
                min_samples_split: params.min_samples_split,
                seed: Some(tree_seed),
                ..Default::default()
            };

            let tree = Tree::fit(&to_matrix(&x_sample)?, &y_sample, parameters)
                .map_err(|e| ForecastError::computation(format!("Training error: {}", e)))?;
            members.push(Member::Fitted(tree));
        }

        Ok(Self { members })
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u8>, ForecastError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .buy_probabilities(features)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }

    fn predict_probability(&self, features: &[f64]) -> Result<[f64; 2], ForecastError> {
        let p_buy = self
            .buy_probabilities(&[features.to_vec()])?
            .first()
            .copied()
            .ok_or_else(|| ForecastError::computation("No probability returned"))?;
        Ok([1.0 - p_buy, p_buy])
    }

    fn name(&self) -> &str {
        "Bagged SmartCore Decision Trees"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two well separated clusters: low first feature means class 0.
    fn clusters(n: usize) -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..n {
            let jitter = (i % 7) as f64 * 0.1;
            if i % 2 == 0 {
                x.push(vec![1.0 + jitter, 10.0 - jitter]);
                y.push(0);
            } else {
                x.push(vec![5.0 + jitter, 2.0 + jitter]);
                y.push(1);
            }
        }
        (x, y)
    }

    /// Clean classes at both ends plus a block of identical feature rows in
    /// the middle carrying both labels, which no split can separate.
    fn overlapping() -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..30 {
            x.push(vec![i as f64]);
            y.push(0);
            x.push(vec![100.0 + i as f64]);
            y.push(1);
        }
        for i in 0..20 {
            x.push(vec![50.0]);
            y.push(u8::from(i % 2 == 0));
        }
        (x, y)
    }

    fn small_config() -> ModelConfig {
        ModelConfig {
            n_trees: 21,
            min_samples_split: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_and_predict_separable() {
        let (x, y) = clusters(60);
        let model = RandomForestModel::fit(&x, &y, &small_config()).unwrap();
        assert_eq!(model.n_trees(), 21);
        let preds = model.predict(&[vec![1.2, 9.8], vec![5.1, 2.3]]).unwrap();
        assert_eq!(preds, vec![0, 1]);
    }

    #[test]
    fn test_probability_distribution() {
        let (x, y) = clusters(60);
        let model = RandomForestModel::fit(&x, &y, &small_config()).unwrap();
        let dist = model.predict_probability(&[5.1, 2.3]).unwrap();
        assert!((dist[0] + dist[1] - 1.0).abs() < 1e-9);
        assert!(dist[1] > dist[0]);
    }

    #[test]
    fn test_ambiguous_sample_gets_partial_confidence() {
        let (x, y) = overlapping();
        let config = ModelConfig {
            n_trees: 51,
            min_samples_split: 2,
            ..Default::default()
        };
        let model = RandomForestModel::fit(&x, &y, &config).unwrap();

        let dist = model.predict_probability(&[50.0]).unwrap();
        let class = model.predict(&[vec![50.0]]).unwrap()[0];
        let confidence = dist[usize::from(class)];
        assert!(confidence > 0.5 && confidence < 1.0, "confidence = {}", confidence);

        // clean regions stay confident
        assert!(model.predict_probability(&[5.0]).unwrap()[0] > 0.9);
        assert!(model.predict_probability(&[110.0]).unwrap()[1] > 0.9);
    }

    #[test]
    fn test_same_seed_same_probabilities() {
        let (x, y) = overlapping();
        let a = RandomForestModel::fit(&x, &y, &small_config()).unwrap();
        let b = RandomForestModel::fit(&x, &y, &small_config()).unwrap();
        assert_eq!(
            a.predict_probability(&[50.0]).unwrap(),
            b.predict_probability(&[50.0]).unwrap()
        );
    }

    #[test]
    fn test_single_class_is_rejected() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        let result = RandomForestModel::fit(&x, &[1, 1, 1], &small_config());
        assert!(matches!(result, Err(ForecastError::Computation { .. })));
    }

    #[test]
    fn test_fit_rejects_empty_set() {
        let result = RandomForestModel::fit(&[], &[], &small_config());
        assert!(matches!(result, Err(ForecastError::Computation { .. })));
    }

    #[test]
    fn test_fit_rejects_length_mismatch() {
        let (x, _) = clusters(10);
        let result = RandomForestModel::fit(&x, &[1, 0], &small_config());
        assert!(matches!(result, Err(ForecastError::Computation { .. })));
    }
}
