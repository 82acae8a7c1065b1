//! Directory-level drivers
//!
//!     The two entry points hosts actually call. [`start_session`] cuts a
//!     target subtree out of a real tree and leaves a resumable session
//!     directory behind; [`advance_session`] replays one prediction
//!     against that directory. [`build_dataset`] is the offline path: a
//!     batch of serialized trees in, a coded sample corpus and its
//!     vocabulary out.
//!
//!     A tree that fails to parse or yields nothing skips with a recorded
//!     reason; one bad input never aborts a batch.

use rand::Rng;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use treepath_core::dataset::{skip_too_big, DatasetSample, IntegerSample, Vocabulary};
use treepath_core::extraction::create_dataset_samples;
use treepath_core::sampling::{elements_from_depth_range, smartly_take};
use treepath_core::shadow::{Origin, ShadowTree};
use treepath_core::tree::{json, SourceTree};

use crate::decode::KindRegistry;
use crate::error::{SnapshotError, SynthesisError, SynthesisResult};
use crate::session::{advance, next_paths, StepResponse, SynthesisState};
use crate::snapshot;
use crate::types::{SemanticChecker, TypeCatalog};

/// Model-facing description of the session's types, next to the snapshot.
pub const CATALOG_FILE: &str = "classes.json";

/// File of newline-delimited coded samples a batch run produces.
pub const SAMPLES_FILE: &str = "dataset.jsonl";

/// What the model receives when a session opens.
#[derive(Debug)]
pub struct StartedSession {
    /// Features of the first prediction position.
    pub sample: IntegerSample,
    /// The type catalog, already serialized for the wire.
    pub catalog_json: String,
}

/// Cuts a target subtree out of `tree` and persists the open session in
/// `dir`. The target is drawn from the depth range with the usual
/// sentinel bias; sentinel and root draws are passed over.
#[allow(clippy::too_many_arguments)]
pub fn start_session<R: Rng>(
    dir: &Path,
    tree: &SourceTree,
    depths: RangeInclusive<usize>,
    count: usize,
    checker: &dyn SemanticChecker,
    catalog: &TypeCatalog,
    vocab: &Vocabulary,
    rng: &mut R,
) -> SynthesisResult<StartedSession> {
    let mut shadow = ShadowTree::build(tree);
    shadow.add_after_last(&HashSet::new());

    let candidates = elements_from_depth_range(&shadow, depths);
    let target = smartly_take(&shadow, &candidates, count, rng)
        .into_iter()
        .find_map(|drawn| match shadow.origin(drawn) {
            Origin::Source(original) if shadow.parent(drawn).is_some() => Some(original),
            _ => None,
        })
        .ok_or(SynthesisError::NoTarget)?;

    // Everything on the path to the cut stays open; the subtree itself
    // and its later siblings are the future the model must predict.
    let anchor = tree
        .parent(target)
        .expect("the target was drawn below the root");
    let state = SynthesisState::new(tree.clone(), tree.ancestor_chain(anchor));

    snapshot::save(dir, &state, Some(target))?;
    vocab.save(dir).map_err(SnapshotError::Io)?;
    let catalog_json = catalog.to_json()?;
    fs::write(dir.join(CATALOG_FILE), &catalog_json).map_err(SnapshotError::Io)?;

    // Reload so the first sample sees exactly the cut tree a later step
    // will.
    let reloaded = snapshot::load(dir)?;
    let sample = next_paths(&reloaded, checker, vocab)?;
    Ok(StartedSession {
        sample,
        catalog_json,
    })
}

/// Replays one prediction against the session persisted in `dir`.
pub fn advance_session<R: Rng>(
    dir: &Path,
    predicted_kind: &str,
    predicted_type: Option<i64>,
    registry: &KindRegistry,
    checker: &dyn SemanticChecker,
    rng: &mut R,
) -> SynthesisResult<StepResponse> {
    let mut state = snapshot::load(dir)?;
    let vocab = Vocabulary::load(dir).map_err(SnapshotError::Io)?;
    let catalog_text = fs::read_to_string(dir.join(CATALOG_FILE)).map_err(SnapshotError::Io)?;
    let catalog: TypeCatalog = serde_json::from_str(&catalog_text)?;

    let response = advance(
        &mut state,
        predicted_kind,
        predicted_type,
        registry,
        checker,
        &catalog,
        &vocab,
        rng,
    )?;
    snapshot::save(dir, &state, None)?;
    Ok(response)
}

/// Outcome of a batch extraction run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub written: usize,
    /// Inputs that contributed nothing, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Extracts training samples from every serialized tree in `inputs`,
/// builds the vocabulary over all of them and writes the coded corpus
/// plus the vocabulary pair into `out_dir`.
pub fn build_dataset<R: Rng>(
    inputs: &[PathBuf],
    out_dir: &Path,
    depths: RangeInclusive<usize>,
    count: usize,
    rng: &mut R,
) -> SynthesisResult<BatchOutcome> {
    let mut outcome = BatchOutcome::default();
    let mut samples: Vec<DatasetSample> = Vec::new();

    for input in inputs {
        match samples_from_file(input, depths.clone(), count, rng) {
            Ok(extracted) if extracted.is_empty() => {
                outcome
                    .skipped
                    .push((input.clone(), "no samples in the depth range".to_string()));
            }
            Ok(extracted) => samples.extend(extracted),
            Err(reason) => outcome.skipped.push((input.clone(), reason)),
        }
    }

    let vocab = Vocabulary::from_tokens(samples.iter().flat_map(DatasetSample::tokens));
    vocab.save(out_dir).map_err(SnapshotError::Io)?;

    let mut out = fs::File::create(out_dir.join(SAMPLES_FILE)).map_err(SnapshotError::Io)?;
    for sample in &samples {
        let coded = sample
            .to_integer(&vocab)
            .expect("the vocabulary was built over these samples");
        let line = serde_json::to_string(&coded)?;
        writeln!(out, "{line}").map_err(SnapshotError::Io)?;
    }

    outcome.written = samples.len();
    Ok(outcome)
}

fn samples_from_file<R: Rng>(
    input: &Path,
    depths: RangeInclusive<usize>,
    count: usize,
    rng: &mut R,
) -> Result<Vec<DatasetSample>, String> {
    let text = fs::read_to_string(input).map_err(|err| err.to_string())?;
    let (tree, _) = json::from_json_str(&text).map_err(|err| err.to_string())?;
    if tree.is_empty() {
        return Err("empty tree".to_string());
    }
    Ok(skip_too_big(create_dataset_samples(
        &tree, depths, count, None, rng,
    )))
}
