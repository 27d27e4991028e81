use super::trainer::TrainedModel;
use crate::domain::errors::ForecastError;
use crate::domain::ml::feature_registry::{matches_registry, predictor_vector};
use crate::domain::ml::{EnrichedRow, Prediction, Signal};

/// Predicts the next move from the most recent enriched row.
///
/// Confidence is the probability the model assigns to the class it picked,
/// not the probability of Buy.
pub fn predict_latest(model: &TrainedModel, rows: &[EnrichedRow]) -> Result<Prediction, ForecastError> {
    let latest = rows.last().ok_or(ForecastError::InsufficientData {
        available: 0,
        required: 1,
    })?;

    if !matches_registry(&model.predictors) {
        return Err(ForecastError::computation(format!(
            "Model was trained on columns {:?}, which differ from the inference columns",
            model.predictors
        )));
    }

    let features = predictor_vector(latest);
    let class = model
        .classifier
        .predict(std::slice::from_ref(&features))?
        .first()
        .copied()
        .ok_or_else(|| ForecastError::computation("No prediction returned"))?;
    let distribution = model.classifier.predict_probability(&features)?;

    let signal = Signal::from_class(class);
    let confidence = distribution[usize::from(signal.class())];

    Ok(Prediction {
        signal,
        confidence: if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        },
        as_of: latest.bar.timestamp,
    })
}
