use crate::compiler::ArtifactCache;
use crate::error::Error;
use crate::eval::EvalScope;
use crate::mapping::{self, JsonMappingProvider, MappingError, MappingProvider};
use crate::value::Value;
use log::{debug, trace};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_LRU_CACHE_SIZE: usize = 100;

/// Shared settings for a family of reads: the mapping provider, the
/// compiled-artifact cache, and the error-suppression policy.
///
/// Cloning a configuration is cheap and every clone shares the same cache,
/// so compiled expressions are reused across all reads that started from
/// the same configuration.
#[derive(Clone)]
pub struct Configuration {
    mapping_provider: Arc<dyn MappingProvider>,
    suppress_errors: bool,
    cache: Arc<ArtifactCache>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn mapping_provider(&self) -> &Arc<dyn MappingProvider> {
        &self.mapping_provider
    }

    pub fn suppress_errors(&self) -> bool {
        self.suppress_errors
    }

    pub(crate) fn cache(&self) -> &ArtifactCache {
        &self.cache
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::builder().build()
    }
}

pub struct ConfigurationBuilder {
    mapping_provider: Arc<dyn MappingProvider>,
    lru_cache_size: usize,
    suppress_errors: bool,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        ConfigurationBuilder {
            mapping_provider: Arc::new(JsonMappingProvider::new()),
            lru_cache_size: DEFAULT_LRU_CACHE_SIZE,
            suppress_errors: false,
        }
    }
}

impl ConfigurationBuilder {
    pub fn mapping_provider(mut self, provider: impl MappingProvider + 'static) -> Self {
        self.mapping_provider = Arc::new(provider);
        self
    }

    /// Capacity of the compiled-expression cache. Matchers and projectors
    /// each get this many slots.
    pub fn lru_cache_size(mut self, size: usize) -> Self {
        self.lru_cache_size = size;
        self
    }

    /// When set, read failures of any kind collapse to an empty result
    /// instead of an error.
    pub fn suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    pub fn build(self) -> Configuration {
        Configuration {
            mapping_provider: self.mapping_provider,
            suppress_errors: self.suppress_errors,
            cache: Arc::new(ArtifactCache::new(self.lru_cache_size)),
        }
    }
}

/// Parse a document with the default configuration.
pub fn parse(input: &str) -> Result<ReadContext, Error> {
    using(Configuration::default()).parse(input)
}

/// Start a fluent chain from an explicit configuration.
pub fn using(configuration: Configuration) -> ParseContext {
    ParseContext { configuration }
}

/// One-shot convenience: parse, filter, project, and serialize in a single
/// call with the default configuration.
pub fn read(input: &str, select: &str, filter: &str) -> Result<String, Error> {
    parse(input)?.read(select, filter)
}

/// A configuration waiting for input.
pub struct ParseContext {
    configuration: Configuration,
}

impl ParseContext {
    pub fn parse(&self, input: &str) -> Result<ReadContext, Error> {
        let records = match self.configuration.mapping_provider.deserialize(input) {
            Ok(records) => records,
            Err(_) if self.configuration.suppress_errors => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(self.context(records))
    }

    /// Take an already-parsed document, skipping the provider's text path.
    pub fn parse_value(&self, value: serde_json::Value) -> ReadContext {
        let records = match value {
            serde_json::Value::Array(elements) => {
                elements.into_iter().map(mapping::json_to_value).collect()
            }
            other => vec![mapping::json_to_value(other)],
        };
        self.context(records)
    }

    pub fn parse_reader(&self, mut reader: impl Read) -> Result<ReadContext, Error> {
        let records = match self.configuration.mapping_provider.deserialize_reader(&mut reader) {
            Ok(records) => records,
            Err(_) if self.configuration.suppress_errors => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(self.context(records))
    }

    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ReadContext, Error> {
        let file = File::open(path)?;
        self.parse_reader(BufReader::new(file))
    }

    fn context(&self, records: Vec<Value>) -> ReadContext {
        ReadContext {
            configuration: self.configuration.clone(),
            records,
        }
    }
}

/// Parsed records, ready to be queried any number of times.
pub struct ReadContext {
    configuration: Configuration,
    records: Vec<Value>,
}

impl std::fmt::Debug for ReadContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadContext")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl ReadContext {
    /// Whether any record satisfies the filter.
    pub fn exists(&self, filter: &str) -> Result<bool, Error> {
        match self.internal_read("", filter) {
            Ok(kept) => Ok(!kept.is_empty()),
            Err(_) if self.configuration.suppress_errors => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Filter with `filter`, reshape with `select`, and serialize through
    /// the configured mapping provider.
    pub fn read(&self, select: &str, filter: &str) -> Result<String, Error> {
        let result = self
            .internal_read(select, filter)
            .and_then(|kept| Ok(self.configuration.mapping_provider.serialize(&kept)?));
        match result {
            Err(_) if self.configuration.suppress_errors => Ok("{}".to_string()),
            other => other,
        }
    }

    /// Like [`read`](ReadContext::read), but deserializes the collapsed
    /// result into `T` instead of rendering text. Conversion failures are
    /// reported even when error suppression is on.
    pub fn read_as<T: DeserializeOwned>(&self, select: &str, filter: &str) -> Result<T, Error> {
        let kept = match self.internal_read(select, filter) {
            Ok(kept) => kept,
            Err(_) if self.configuration.suppress_errors => Vec::new(),
            Err(e) => return Err(e),
        };
        let collapsed = mapping::collapse(&kept);
        serde_json::from_value(collapsed)
            .map_err(|e| Error::Mapping(MappingError::Deserialize(e.to_string())))
    }

    fn internal_read(&self, select: &str, filter: &str) -> Result<Vec<Value>, Error> {
        let matcher = self.configuration.cache().matcher(filter)?;
        let projector = self.configuration.cache().projector(select)?;

        let mut kept = Vec::new();
        for record in &self.records {
            match single_array_wrapper(record) {
                Some((key, elements)) => {
                    trace!("record is a single-array wrapper under {:?}", key);
                    // filter and project element by element, then put the
                    // survivors back under the wrapper key
                    let mut survivors = Vec::new();
                    for element in elements {
                        let scope = EvalScope::with_prefix(element, key);
                        if !matcher.is_match_scoped(&scope)? {
                            continue;
                        }
                        let projected = projector.project_scoped(&scope, element)?;
                        if !projected.is_empty_record() {
                            survivors.push(projected);
                        }
                    }
                    if !survivors.is_empty() {
                        let mut wrapper = std::collections::HashMap::new();
                        wrapper.insert(key.to_string(), Value::Array(survivors));
                        kept.push(Value::Object(wrapper));
                    }
                }
                None => {
                    let scope = EvalScope::new(record);
                    if matcher.is_match_scoped(&scope)? {
                        let projected = projector.project_scoped(&scope, record)?;
                        // a record projected down to nothing does not count
                        // as a result, same as an emptied wrapper element
                        if !projected.is_empty_record() {
                            kept.push(projected);
                        }
                    }
                }
            }
        }
        debug!("read kept {} of {} records", kept.len(), self.records.len());
        Ok(kept)
    }
}

/// Detects the wrapped-array record shape: an object with exactly one key
/// whose value is an array.
fn single_array_wrapper(record: &Value) -> Option<(&str, &[Value])> {
    let Value::Object(map) = record else {
        return None;
    };
    if map.len() != 1 {
        return None;
    }
    let (key, value) = map.iter().next()?;
    let Value::Array(elements) = value else {
        return None;
    };
    Some((key.as_str(), elements.as_slice()))
}
