use crate::value_objects::classification::Classification;

/// Text sentiment model behind some transport. Returns one classification per input, in order.
pub trait SentimentClassifier {
    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, String>;
}
