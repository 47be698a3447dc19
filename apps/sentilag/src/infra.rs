use sentilag_application::config::Config;
use sentilag_domain::repositories::artifacts::ArtifactWriter;
use sentilag_domain::repositories::classifier::SentimentClassifier;
use sentilag_domain::repositories::market_data::PriceRepository;
use sentilag_domain::repositories::posts::PostRepository;
use sentilag_domain::repositories::sentiment::SentimentRepository;
use sentilag_infrastructure::artifacts::FilesystemArtifactWriter;
use sentilag_infrastructure::classifier::HttpClassifier;
use sentilag_infrastructure::market_data::FilesystemPriceRepository;
use sentilag_infrastructure::posts::FilesystemPostRepository;
use sentilag_infrastructure::sentiment::FilesystemSentimentRepository;

pub struct AnalysisDeps {
    pub posts: Box<dyn PostRepository>,
    pub sentiment_repo: Box<dyn SentimentRepository>,
    pub prices: Box<dyn PriceRepository>,
    pub artifacts: Box<dyn ArtifactWriter>,
}

pub struct ClassifyDeps {
    pub posts: Box<dyn PostRepository>,
    pub classifier: Box<dyn SentimentClassifier>,
    pub artifacts: Box<dyn ArtifactWriter>,
}

pub fn build_analysis_deps() -> AnalysisDeps {
    AnalysisDeps {
        posts: Box::new(FilesystemPostRepository),
        sentiment_repo: Box::new(FilesystemSentimentRepository),
        prices: Box::new(FilesystemPriceRepository),
        artifacts: Box::new(FilesystemArtifactWriter::new()),
    }
}

pub fn build_classify_deps(config: &Config) -> Result<ClassifyDeps, String> {
    Ok(ClassifyDeps {
        posts: Box::new(FilesystemPostRepository),
        classifier: build_classifier(config)?,
        artifacts: Box::new(FilesystemArtifactWriter::new()),
    })
}

fn build_classifier(config: &Config) -> Result<Box<dyn SentimentClassifier>, String> {
    let classifier = config
        .classifier
        .as_ref()
        .ok_or_else(|| "missing [classifier] section in config".to_string())?;
    let client = HttpClassifier::new(
        classifier.url.clone(),
        classifier.timeout_ms,
        classifier.retries,
        classifier.model_version.clone(),
        classifier.max_seq_length,
    )
    .map_err(|err| {
        format!(
            "failed to init classifier client (url={}): {err}",
            classifier.url
        )
    })?;
    Ok(Box::new(client))
}
