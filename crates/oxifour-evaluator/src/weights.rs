use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feature::{FEATURE_COUNT, Feature, FeatureVector};

/// Coefficients of the linear evaluation model, one per [`Feature`].
///
/// Serialized with named fields so stored models stay readable; the array
/// form used by training follows [`Feature::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationWeights {
    pub win: f64,
    pub lose: f64,
    pub my_even_threats: f64,
    pub their_even_threats: f64,
    pub my_odd_threats: f64,
    pub their_odd_threats: f64,
}

impl EvaluationWeights {
    /// Hand-picked weights from an earlier training run, used when no model
    /// is supplied.
    pub const BASELINE: Self = Self {
        win: 0.250_294_394_330_106_9,
        lose: -0.495_231_664_948_370_1,
        my_even_threats: 0.393_253_970_081_962_5,
        their_even_threats: -0.274_245_261_675_988_9,
        my_odd_threats: 0.474_688_113_788_428_2,
        their_odd_threats: 0.209_109_112_719_114_7,
    };

    #[must_use]
    pub const fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        let [
            win,
            lose,
            my_even_threats,
            their_even_threats,
            my_odd_threats,
            their_odd_threats,
        ] = values;
        Self {
            win,
            lose,
            my_even_threats,
            their_even_threats,
            my_odd_threats,
            their_odd_threats,
        }
    }

    #[must_use]
    pub const fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.win,
            self.lose,
            self.my_even_threats,
            self.their_even_threats,
            self.my_odd_threats,
            self.their_odd_threats,
        ]
    }

    #[must_use]
    pub const fn get(&self, feature: Feature) -> f64 {
        self.to_array()[feature.index()]
    }

    /// Scores a feature vector.
    #[must_use]
    pub fn dot(&self, features: &FeatureVector) -> f64 {
        features.dot(&self.to_array())
    }
}

impl From<[f64; FEATURE_COUNT]> for EvaluationWeights {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_array(values)
    }
}

impl From<EvaluationWeights> for [f64; FEATURE_COUNT] {
    fn from(weights: EvaluationWeights) -> Self {
        weights.to_array()
    }
}

impl fmt::Display for EvaluationWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, feature) in Feature::ALL.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:.4}", feature.id(), self.get(feature))?;
        }
        Ok(())
    }
}
