use crate::value_objects::raw_post::RawPost;
use std::path::Path;

pub trait PostRepository {
    fn load_posts(&self, path: &Path) -> Result<Vec<RawPost>, String>;

    /// Symbols with a `<symbol>-weibo.csv` under `dir`, sorted by name.
    fn discover_symbols(&self, dir: &Path) -> Result<Vec<String>, String>;
}
