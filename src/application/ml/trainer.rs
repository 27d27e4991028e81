use super::random_forest::RandomForestModel;
use crate::config::ModelConfig;
use crate::domain::errors::ForecastError;
use crate::domain::ml::EnrichedRow;
use crate::domain::ml::feature_registry::{predictor_names, predictor_vector};
use crate::domain::ports::BinaryClassifier;
use tracing::{debug, info, warn};

/// Precision and support counts on the held-out evaluation window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// TP / (TP + FP) for the Buy class; 0.0 when nothing was predicted Buy
    pub precision: f64,
    pub true_positives: usize,
    pub predicted_positives: usize,
    pub evaluated: usize,
}

impl Evaluation {
    pub fn from_predictions(predicted: &[u8], actual: &[u8]) -> Self {
        let mut true_positives = 0;
        let mut predicted_positives = 0;
        for (&p, &a) in predicted.iter().zip(actual) {
            if p == 1 {
                predicted_positives += 1;
                if a == 1 {
                    true_positives += 1;
                }
            }
        }

        let precision = if predicted_positives == 0 {
            0.0
        } else {
            true_positives as f64 / predicted_positives as f64
        };

        Self {
            precision,
            true_positives,
            predicted_positives,
            evaluated: predicted.len().min(actual.len()),
        }
    }
}

/// A fitted classifier bound to the predictor columns it was trained on
pub struct TrainedModel {
    pub classifier: Box<dyn BinaryClassifier>,
    pub predictors: Vec<String>,
    pub evaluation: Evaluation,
    pub training_rows: usize,
}

impl TrainedModel {
    pub fn precision(&self) -> f64 {
        self.evaluation.precision
    }
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("classifier", &self.classifier.name())
            .field("predictors", &self.predictors)
            .field("evaluation", &self.evaluation)
            .field("training_rows", &self.training_rows)
            .finish()
    }
}

/// Trains the default random forest. See [`train_with`].
pub fn train(rows: &[EnrichedRow], config: &ModelConfig) -> Result<TrainedModel, ForecastError> {
    train_with::<RandomForestModel>(rows, config)
}

/// Fits `C` on every row except the last `evaluation_window`, then scores it
/// on that tail. Requires strictly more rows than the evaluation window so the
/// training set is never empty.
pub fn train_with<C>(rows: &[EnrichedRow], config: &ModelConfig) -> Result<TrainedModel, ForecastError>
where
    C: BinaryClassifier + 'static,
{
    if rows.len() < config.min_rows() {
        return Err(ForecastError::InsufficientData {
            available: rows.len(),
            required: config.min_rows(),
        });
    }

    let split = rows.len() - config.evaluation_window;
    let (train_rows, eval_rows) = rows.split_at(split);

    let (x_train, y_train) = to_dataset(train_rows);
    let (x_eval, y_eval) = to_dataset(eval_rows);

    let positives = y_train.iter().filter(|&&l| l == 1).count();
    if positives == 0 || positives == y_train.len() {
        warn!(
            "Trainer: training set of {} rows has a single class, refusing to fit",
            y_train.len()
        );
        return Err(ForecastError::computation(format!(
            "Training set of {} rows has a single class ({}); need both up and down days",
            y_train.len(),
            u8::from(positives > 0)
        )));
    }

    debug!(
        "Trainer: fitting on {} rows ({} up), evaluating on {}",
        train_rows.len(),
        positives,
        eval_rows.len()
    );
    let classifier = C::fit(&x_train, &y_train, config)?;

    let predicted = classifier.predict(&x_eval)?;
    let evaluation = Evaluation::from_predictions(&predicted, &y_eval);

    info!(
        "Trainer: {} trained on {} rows, precision {:.3} ({}/{} Buy calls correct)",
        classifier.name(),
        train_rows.len(),
        evaluation.precision,
        evaluation.true_positives,
        evaluation.predicted_positives
    );

    Ok(TrainedModel {
        classifier: Box::new(classifier),
        predictors: predictor_names(),
        evaluation,
        training_rows: train_rows.len(),
    })
}

fn to_dataset(rows: &[EnrichedRow]) -> (Vec<Vec<f64>>, Vec<u8>) {
    rows.iter().map(|r| (predictor_vector(r), r.label)).unzip()
}
