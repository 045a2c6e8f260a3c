use cutline::DesignParams;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// Offset strategy used for board and cutline
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OffsetStrategy {
    /// Exact offset with a smoothing pass
    #[default]
    Smooth,
    /// Exact Euclidean distance transform, unsmoothed
    Distance,
}

fn default_true() -> bool {
    true
}

/// One artwork to turn into a board
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BoardJob {
    pub input_path: String,
    pub output_dir: String,
    /// Base name for output files; defaults to the input file stem
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub offset_strategy: OffsetStrategy,
    /// Embed a cut-out preview in the design JSON
    #[serde(default = "default_true")]
    pub preview: bool,
    #[serde(default)]
    pub params: DesignParams,
}

impl BoardJob {
    pub fn new(input_path: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            name: None,
            offset_strategy: OffsetStrategy::default(),
            preview: true,
            params: DesignParams::default(),
        }
    }

    /// Name shared by every output file of this job
    pub fn output_stem(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            Path::new(&self.input_path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("design")
                .to_string()
        })
    }

    /// `<output_dir>/<stem><suffix>`
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        Path::new(&self.output_dir).join(format!("{}{}", self.output_stem(), suffix))
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, JobError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, JobError> {
        Ok(serde_json::from_str(content)?)
    }

    /// `.toml` or `.json`, by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(JobError::UnsupportedFileFormat),
        }
    }

    /// Save by extension, the counterpart of [`BoardJob::from_file`]
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), JobError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml_file(path),
            Some("json") => self.to_json_file(path),
            _ => Err(JobError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), JobError> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, JobError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), JobError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, JobError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_takes_defaults() {
        let job = BoardJob::from_toml(
            r#"
            input_path = "art/cat.png"
            output_dir = "out"

            [params.offsets]
            borderMM = 3.0
            cutOffsetMM = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(job.params.offsets.border_mm, 3.0);
        assert_eq!(job.params.size, goods_kit_common::SizeSpec::default());
        assert_eq!(job.offset_strategy, OffsetStrategy::Smooth);
        assert!(job.preview);
        assert_eq!(job.output_stem(), "cat");
        assert_eq!(job.output_path(".svg"), Path::new("out").join("cat.svg"));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut job = BoardJob::new("a.png", "out");
        job.offset_strategy = OffsetStrategy::Distance;
        job.params.template_shape = Some("circle".into());
        let parsed = BoardJob::from_toml(&job.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, job);
    }

    #[test]
    fn test_json_uses_camel_case_params() {
        let job = BoardJob::from_json(
            r#"{"input_path": "a.png", "output_dir": "o", "params": {"assumeTransparent": true}}"#,
        )
        .unwrap();
        assert!(job.params.assume_transparent);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            BoardJob::from_file("job.yaml"),
            Err(JobError::UnsupportedFileFormat)
        ));
    }
}
