//! JSON persistence of evaluator models and training checkpoints.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

use crate::schema::model::EvaluatorModel;

/// Writes a trained model to `path`, or to stdout when no path is given.
pub fn save_model(model: &EvaluatorModel, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => save_json_file("evaluator model", model, path),
        None => write_json(io::stdout().lock(), model)
            .context("Failed to write evaluator model to stdout"),
    }
}

/// Overwrites the checkpoint at `path`.
pub fn save_checkpoint<T>(file_kind: &str, checkpoint: &T, path: &Path) -> anyhow::Result<()>
where
    T: Serialize,
{
    save_json_file(file_kind, checkpoint, path)?;
    tracing::debug!(path = %path.display(), "saved {file_kind}");
    Ok(())
}

/// Reads an evaluator model, or returns the built-in one when no path is
/// given.
pub fn read_model_file<P>(path: Option<P>) -> anyhow::Result<EvaluatorModel>
where
    P: AsRef<Path>,
{
    match path {
        Some(path) => read_json_file("evaluator model", path.as_ref()),
        None => Ok(EvaluatorModel::baseline()),
    }
}

/// Reads a training checkpoint.
///
/// A missing file means a fresh start. An unreadable or corrupt file is
/// logged and also treated as a fresh start.
pub fn load_checkpoint<T, P>(file_kind: &str, path: P) -> Option<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("no {file_kind} at {}, starting fresh", path.display());
        return None;
    }
    match read_json_file(file_kind, path) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("ignoring {file_kind}, starting fresh: {err:#}");
            None
        }
    }
}

fn save_json_file<T>(file_kind: &str, value: &T, path: &Path) -> anyhow::Result<()>
where
    T: Serialize,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create {file_kind} file: {}", path.display()))?;
    write_json(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {file_kind} file: {}", path.display()))
}

fn write_json<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::{env, path::PathBuf, process};

    use chrono::DateTime;
    use oxifour_evaluator::EvaluationWeights;

    use crate::schema::checkpoint::GaCheckpoint;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("oxifour-{}-{name}", process::id()))
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let path = temp_path("round-trip.json");
        let checkpoint = GaCheckpoint {
            generation: 7,
            population: vec![[0.25; 6], [-0.5; 6]],
            best_genome: [0.25; 6],
            best_fitness: 2.0,
            saved_at: DateTime::UNIX_EPOCH,
        };
        save_checkpoint("GA checkpoint", &checkpoint, &path).unwrap();
        let loaded: Option<GaCheckpoint> = load_checkpoint("GA checkpoint", &path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, Some(checkpoint));
    }

    #[test]
    fn test_missing_checkpoint_starts_fresh() {
        let loaded: Option<GaCheckpoint> = load_checkpoint("checkpoint", temp_path("missing.json"));
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_corrupt_checkpoint_starts_fresh() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        let loaded: Option<GaCheckpoint> = load_checkpoint("checkpoint", &path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_saved_model_is_read_back() {
        let path = temp_path("model.json");
        let model = EvaluatorModel {
            name: "ga-generation-3".to_owned(),
            trained_at: DateTime::UNIX_EPOCH,
            weights: EvaluationWeights::from_array([0.5, -0.5, 0.25, -0.25, 0.125, -0.125]),
        };
        save_model(&model, Some(path.as_path())).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let loaded = read_model_file(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert_eq!(loaded, model);
    }

    #[test]
    fn test_default_model_is_baseline() {
        let model = read_model_file(None::<&Path>).unwrap();
        assert_eq!(model, EvaluatorModel::baseline());
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let err = read_model_file(Some(temp_path("no-model.json"))).unwrap_err();
        assert!(err.to_string().contains("evaluator model"));
    }
}
