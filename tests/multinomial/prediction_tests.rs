//! Prediction tests: class labels, probabilities, and their agreement.

use multinom_rs::softmax::{argmax, softmax};
use multinom_rs::{MultinomError, MultinomialRegression, Prediction, PredictionType};
use ndarray::{array, Array1, Array2};

use crate::test_helpers::{four_class_clusters, overlapping_clusters, separated_clusters};

#[test]
fn test_separated_clusters_converge_and_predict_centroids() {
    let (x, y) = separated_clusters(100);
    let fit = MultinomialRegression::new()
        .with_max_iterations(100)
        .with_tol(1e-6)
        .fit(x.view(), &y)
        .unwrap();

    assert!(fit.converged(), "status: {:?}", fit.status);
    assert!(fit.iterations <= 100);

    let centroids = array![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]];
    let labels = fit.predict_class(centroids.view()).unwrap();
    assert_eq!(labels, vec![0, 1, 2]);

    let probs = fit.predict_proba(centroids.view()).unwrap();
    for (k, row) in probs.outer_iter().enumerate() {
        assert!(row[k] > 0.9, "class {} centroid probability {}", k, row[k]);
    }
}

#[test]
fn test_overlapping_clusters_predict_centroids() {
    let (x, y) = overlapping_clusters(101);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
    assert!(fit.converged());

    let centroids = array![[0.0, 0.0], [3.0, 0.0], [0.0, 3.0]];
    let probs = fit.predict_proba(centroids.view()).unwrap();
    for (k, row) in probs.outer_iter().enumerate() {
        assert_eq!(argmax(row), k);
        assert!(row[k] > 0.8, "class {} centroid probability {}", k, row[k]);
    }
}

#[test]
fn test_probabilities_argmax_matches_class_mode() {
    for (x, y) in [overlapping_clusters(102), four_class_clusters(103)] {
        let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();

        let probs = match fit.predict(x.view(), PredictionType::Probabilities).unwrap() {
            Prediction::Probabilities(p) => p,
            Prediction::Classes(_) => panic!("Expected probabilities"),
        };
        let classes = match fit.predict(x.view(), PredictionType::default()).unwrap() {
            Prediction::Classes(c) => c,
            Prediction::Probabilities(_) => panic!("Expected classes"),
        };

        assert_eq!(classes.len(), x.nrows());
        for (row, &label) in probs.outer_iter().zip(classes.iter()) {
            assert_eq!(argmax(row), label);
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_training_predictions_match_fitted_probabilities() {
    let (x, y) = four_class_clusters(104);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();
    let probs = fit.predict_proba(x.view()).unwrap();
    for (a, b) in probs.iter().zip(fit.fitted_probabilities.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_prediction_type_parsing() {
    assert_eq!("probs".parse::<PredictionType>().unwrap(), PredictionType::Probabilities);
    assert_eq!("proba".parse::<PredictionType>().unwrap(), PredictionType::Probabilities);
    assert_eq!("class".parse::<PredictionType>().unwrap(), PredictionType::Class);
    assert_eq!(PredictionType::default(), PredictionType::Class);
    assert!(matches!(
        "votes".parse::<PredictionType>(),
        Err(MultinomError::InvalidInput(_))
    ));
}

#[test]
fn test_prediction_rejects_wrong_feature_count() {
    let (x, y) = overlapping_clusters(105);
    let fit = MultinomialRegression::new().fit(x.view(), &y).unwrap();

    let wrong = Array2::<f64>::zeros((2, 3));
    assert!(matches!(
        fit.predict_proba(wrong.view()),
        Err(MultinomError::DimensionMismatch(_))
    ));

    let nan = array![[f64::NAN, 0.0]];
    assert!(matches!(
        fit.predict_class(nan.view()),
        Err(MultinomError::InvalidInput(_))
    ));
}

#[test]
fn test_softmax_is_stable_for_huge_logits() {
    let logits: Array1<f64> = array![0.0, 1e6, -1e6, 5e5];
    let p = softmax(logits.view());
    assert!(p.iter().all(|v| v.is_finite()));
    assert!((p.sum() - 1.0).abs() < 1e-12);
    assert_eq!(argmax(p.view()), 1);
}
