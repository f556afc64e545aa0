use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use ph_source::folder::{output_path_for, scan_images};
use rayon::prelude::*;

use crate::pipeline::Pipeline;

/// Un fichier du lot qui n'a pas pu être converti.
#[derive(Debug)]
pub struct FileFailure {
    /// Fichier d'entrée fautif.
    pub input: PathBuf,
    /// Cause, avec son contexte.
    pub error: anyhow::Error,
}

/// Bilan d'un lot, dans l'ordre lexicographique des entrées.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Fichiers écrits.
    pub written: Vec<PathBuf>,
    /// Fichiers en échec (politique « continuer »).
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// `true` if no file failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Options d'exécution d'un lot.
#[derive(Clone, Copy, Debug)]
pub struct BatchOptions {
    /// Images processed in parallel; 1 runs sequentially.
    pub jobs: usize,
    /// Stop at the first failing file instead of collecting it.
    pub fail_fast: bool,
}

/// Entrées à traiter : l'image seule, ou les images du dossier.
///
/// # Errors
/// Returns an error if `input` is neither a file nor a readable directory.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        Ok(vec![input.to_path_buf()])
    } else {
        scan_images(input)
    }
}

/// Convertit toutes les images de `input` vers `out_dir`.
///
/// # Errors
/// Returns an error if the input cannot be scanned, the output directory
/// cannot be created, or, with `fail_fast`, on the first failing file.
pub fn run_batch(
    pipeline: &Pipeline,
    input: &Path,
    out_dir: &Path,
    options: BatchOptions,
) -> Result<BatchReport> {
    let files = collect_inputs(input)?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Création impossible : {}", out_dir.display()))?;

    if files.is_empty() {
        log::warn!("Aucune image trouvée dans {}", input.display());
        return Ok(BatchReport::default());
    }
    log::info!(
        "{} image(s) à traiter, palette {}, {} job(s)",
        files.len(),
        pipeline.palette().name(),
        options.jobs
    );

    let convert = |file: &PathBuf| -> (PathBuf, Result<()>) {
        let output = output_path_for(out_dir, file, pipeline.palette().name());
        let result = pipeline.process_file(file, &output).map(|_| ());
        (output, result)
    };

    let mut report = BatchReport::default();

    if options.jobs <= 1 {
        for file in &files {
            let (output, result) = convert(file);
            record(&mut report, file, output, result, options.fail_fast)?;
        }
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()
            .context("Impossible de créer le pool de threads")?;
        // En fail-fast, un échec empêche les fichiers pas encore commencés de démarrer.
        let stop = AtomicBool::new(false);
        let results: Vec<Option<(PathBuf, Result<()>)>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    if stop.load(Ordering::Relaxed) {
                        return None;
                    }
                    let (output, result) = convert(file);
                    if options.fail_fast && result.is_err() {
                        stop.store(true, Ordering::Relaxed);
                    }
                    Some((output, result))
                })
                .collect()
        });
        for (file, entry) in files.iter().zip(results) {
            if let Some((output, result)) = entry {
                record(&mut report, file, output, result, options.fail_fast)?;
            }
        }
    }

    Ok(report)
}

/// Range le résultat d'un fichier dans le bilan, ou l'interrompt en fail-fast.
fn record(
    report: &mut BatchReport,
    file: &Path,
    output: PathBuf,
    result: Result<()>,
    fail_fast: bool,
) -> Result<()> {
    match result {
        Ok(()) => report.written.push(output),
        Err(error) => {
            let error = error.context(format!("Échec sur {}", file.display()));
            if fail_fast {
                return Err(error);
            }
            log::warn!("{error:#}");
            report.failures.push(FileFailure {
                input: file.to_path_buf(),
                error,
            });
        }
    }
    Ok(())
}
