use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LagEvaluation {
    pub lag: usize,
    pub coefficient: f64,
    pub p_value: f64,
    pub samples: usize,
}
