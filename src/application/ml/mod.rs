pub mod predictor;
pub mod random_forest;
pub mod trainer;

pub use predictor::predict_latest;
pub use random_forest::RandomForestModel;
pub use trainer::{Evaluation, TrainedModel, train, train_with};
