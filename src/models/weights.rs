// Model weights - safetensors inspection and random initialisation

use anyhow::{Context, Result};
use safetensors::tensor::Metadata;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const SINGLE_WEIGHTS_FILE: &str = "model.safetensors";
pub const WEIGHTS_INDEX_FILE: &str = "model.safetensors.index.json";

// Header length prefix and the largest header the safetensors format allows
const HEADER_LEN_BYTES: u64 = 8;
const MAX_HEADER_BYTES: u64 = 100_000_000;

/// Where a model's parameters come from
#[derive(Debug, Clone, PartialEq)]
pub enum ModelWeights {
    /// Randomly initialised from the architecture config
    RandomInit { seed: u64 },
    /// Safetensors files on disk
    Safetensors(WeightsSummary),
    /// Weights live behind an API
    Remote,
}

impl ModelWeights {
    pub fn num_parameters(&self) -> Option<u64> {
        match self {
            ModelWeights::Safetensors(summary) => Some(summary.num_parameters),
            _ => None,
        }
    }
}

/// Summary of the safetensors weights backing a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightsSummary {
    pub files: Vec<PathBuf>,
    pub num_tensors: usize,
    pub num_parameters: u64,
}

impl WeightsSummary {
    /// Inspect every safetensors file of a model directory
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let files = weight_files_in_dir(dir)?;
        Self::from_files(files)
    }

    /// Inspect the given safetensors files
    pub fn from_files(files: Vec<PathBuf>) -> Result<Self> {
        anyhow::ensure!(!files.is_empty(), "No safetensors weights found");

        let mut num_tensors = 0;
        let mut num_parameters = 0u64;

        for file in &files {
            let metadata = read_header(file)
                .with_context(|| format!("Invalid safetensors file {}", file.display()))?;

            for info in metadata.tensors().values() {
                num_tensors += 1;
                num_parameters += info.shape.iter().map(|dim| *dim as u64).product::<u64>();
            }
        }

        tracing::debug!(
            "Inspected {} weight files: {} tensors, {} parameters",
            files.len(),
            num_tensors,
            num_parameters
        );

        Ok(Self {
            files,
            num_tensors,
            num_parameters,
        })
    }
}

/// Read the JSON header of a safetensors file without touching the tensor data
///
/// The payload length implied by the header must match the file size.
fn read_header(path: &Path) -> Result<Metadata> {
    let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let file_len = file.metadata()?.len();

    let mut len_bytes = [0u8; HEADER_LEN_BYTES as usize];
    file.read_exact(&mut len_bytes).context("File too small for a safetensors header")?;
    let header_len = u64::from_le_bytes(len_bytes);
    anyhow::ensure!(
        header_len <= MAX_HEADER_BYTES && HEADER_LEN_BYTES + header_len <= file_len,
        "Header length {} does not fit a {} byte file",
        header_len,
        file_len
    );

    let mut header = vec![0u8; header_len as usize];
    file.read_exact(&mut header).context("Truncated safetensors header")?;
    let metadata: Metadata = serde_json::from_slice(&header).context("Malformed safetensors header")?;

    let mut data_len = 0u64;
    for (name, info) in metadata.tensors() {
        let (start, end) = info.data_offsets;
        let num_elements = info.shape.iter().map(|dim| *dim as u64).product::<u64>();
        anyhow::ensure!(
            end >= start && (end - start) as u64 == num_elements * info.dtype.size() as u64,
            "Tensor {} has offsets {:?} inconsistent with its shape",
            name,
            info.data_offsets
        );
        data_len = data_len.max(end as u64);
    }
    anyhow::ensure!(
        HEADER_LEN_BYTES + header_len + data_len == file_len,
        "Expected {} bytes of tensor data, file holds {}",
        data_len,
        file_len - HEADER_LEN_BYTES - header_len
    );

    Ok(metadata)
}

#[derive(Deserialize)]
struct WeightsIndex {
    weight_map: HashMap<String, String>,
}

/// Shard file names listed in a `model.safetensors.index.json`
pub fn shard_files_from_index(contents: &str) -> Result<Vec<String>> {
    let index: WeightsIndex =
        serde_json::from_str(contents).context("Failed to parse safetensors index")?;
    let shards: BTreeSet<String> = index.weight_map.into_values().collect();
    anyhow::ensure!(!shards.is_empty(), "Safetensors index lists no shards");
    Ok(shards.into_iter().collect())
}

/// Locate the weight files of a model directory
///
/// Preference: the shard index, then `model.safetensors`, then any
/// `*.safetensors` file in the directory.
pub fn weight_files_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let index_path = dir.join(WEIGHTS_INDEX_FILE);
    if index_path.exists() {
        let contents = std::fs::read_to_string(&index_path)
            .with_context(|| format!("Failed to read {}", index_path.display()))?;
        return Ok(shard_files_from_index(&contents)?
            .into_iter()
            .map(|name| dir.join(name))
            .collect());
    }

    let single = dir.join(SINGLE_WEIGHTS_FILE);
    if single.exists() {
        return Ok(vec![single]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "safetensors"))
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use safetensors::tensor::{Dtype, TensorView};

    fn write_weights(path: &Path, shapes: &[(&str, Vec<usize>)]) {
        let buffers: Vec<Vec<u8>> = shapes
            .iter()
            .map(|(_, shape)| vec![0u8; shape.iter().product::<usize>() * 4])
            .collect();
        let views: Vec<(&str, TensorView)> = shapes
            .iter()
            .zip(&buffers)
            .map(|((name, shape), data)| {
                (*name, TensorView::new(Dtype::F32, shape.clone(), data).unwrap())
            })
            .collect();
        let bytes = safetensors::serialize(views.iter().map(|(n, v)| (*n, v)), &None).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_summary_counts_parameters_across_shards() {
        let dir = tempfile::tempdir().unwrap();
        write_weights(
            &dir.path().join("model-00001-of-00002.safetensors"),
            &[("embed", vec![10, 4])],
        );
        write_weights(
            &dir.path().join("model-00002-of-00002.safetensors"),
            &[("head.weight", vec![4, 2]), ("head.bias", vec![2])],
        );
        std::fs::write(
            dir.path().join(WEIGHTS_INDEX_FILE),
            r#"{"metadata": {}, "weight_map": {
                "embed": "model-00001-of-00002.safetensors",
                "head.weight": "model-00002-of-00002.safetensors",
                "head.bias": "model-00002-of-00002.safetensors"}}"#,
        )
        .unwrap();

        let summary = WeightsSummary::from_dir(dir.path()).unwrap();
        assert_eq!(summary.files.len(), 2);
        assert_eq!(summary.num_tensors, 3);
        assert_eq!(summary.num_parameters, 40 + 8 + 2);
    }

    #[test]
    fn test_single_file_preferred_without_index() {
        let dir = tempfile::tempdir().unwrap();
        write_weights(&dir.path().join(SINGLE_WEIGHTS_FILE), &[("w", vec![3, 3])]);
        write_weights(&dir.path().join("extra.safetensors"), &[("w", vec![1])]);

        let files = weight_files_in_dir(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join(SINGLE_WEIGHTS_FILE)]);
    }

    #[test]
    fn test_empty_directory_has_no_weights() {
        let dir = tempfile::tempdir().unwrap();
        assert!(WeightsSummary::from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_large_file_summarised_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SINGLE_WEIGHTS_FILE);
        let num_elements: u64 = 1 << 30;

        // Sparse file: a real header followed by 1 GiB of unwritten payload
        let header = format!(
            r#"{{"embed":{{"dtype":"U8","shape":[{n}],"data_offsets":[0,{n}]}}}}"#,
            n = num_elements
        );
        let mut file = File::create(&path).unwrap();
        std::io::Write::write_all(&mut file, &(header.len() as u64).to_le_bytes()).unwrap();
        std::io::Write::write_all(&mut file, header.as_bytes()).unwrap();
        file.set_len(HEADER_LEN_BYTES + header.len() as u64 + num_elements).unwrap();

        let summary = WeightsSummary::from_files(vec![path]).unwrap();
        assert_eq!(summary.num_tensors, 1);
        assert_eq!(summary.num_parameters, num_elements);
    }

    #[test]
    fn test_truncated_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SINGLE_WEIGHTS_FILE);
        write_weights(&path, &[("w", vec![4, 4])]);

        let len = std::fs::metadata(&path).unwrap().len();
        File::options().write(true).open(&path).unwrap().set_len(len - 4).unwrap();

        let err = WeightsSummary::from_files(vec![path]).unwrap_err();
        assert!(format!("{:#}", err).contains("tensor data"));
    }

    #[test]
    fn test_index_deduplicates_shards() {
        let shards = shard_files_from_index(
            r#"{"weight_map": {"a": "s2.safetensors", "b": "s1.safetensors", "c": "s2.safetensors"}}"#,
        )
        .unwrap();
        assert_eq!(shards, vec!["s1.safetensors", "s2.safetensors"]);
    }
}
