//! Assemble command implementation.

use crate::bundler::{AssembledBundle, Assembler, BundleKind, resources};
use crate::cli::{Args, RuntimeConfig};
use crate::error::{CliError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Machine-readable result of one run, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct BundleSummary {
    /// Bundle kind short name
    pub kind: &'static str,
    /// Bundle root
    pub bundle: PathBuf,
    /// Installed executable
    pub executable: PathBuf,
    /// Written Info.plist
    pub manifest: PathBuf,
    /// Written PkgInfo, library bundles only
    pub pkginfo: Option<PathBuf>,
    /// Copied resources
    pub resources: Vec<PathBuf>,
    /// Copied dynamic libraries
    pub libraries: Vec<PathBuf>,
    /// Resource arguments that did not exist
    pub missing: Vec<PathBuf>,
    /// Resource directories skipped because they contain the bundle
    pub enclosing: Vec<PathBuf>,
    /// CFBundleIconFile, if any
    pub icon: Option<String>,
    /// Requested load-path rewrites
    pub rewrites: Vec<RewriteSummary>,
    /// Tolerated manifest render error
    pub manifest_error: Option<String>,
}

/// One load-path rewrite in a [`BundleSummary`].
#[derive(Debug, Serialize)]
pub struct RewriteSummary {
    /// Path the executable referenced
    pub old_path: String,
    /// Bundle-relative replacement
    pub new_path: String,
    /// Outcome
    pub status: String,
}

impl From<&AssembledBundle> for BundleSummary {
    fn from(bundle: &AssembledBundle) -> Self {
        let report = &bundle.resources;
        Self {
            kind: bundle.kind.short_name(),
            bundle: bundle.bundle_path.clone(),
            executable: bundle.executable.clone(),
            manifest: bundle.manifest.clone(),
            pkginfo: bundle.pkginfo.clone(),
            resources: report.copied.clone(),
            libraries: report.libraries.clone(),
            missing: report.missing.clone(),
            enclosing: report.enclosing.clone(),
            icon: report.icon.clone(),
            rewrites: report
                .rewrites
                .iter()
                .map(|r| RewriteSummary {
                    old_path: r.old_path.clone(),
                    new_path: r.new_path.clone(),
                    status: r.status.to_string(),
                })
                .collect(),
            manifest_error: bundle.manifest_error.as_ref().map(|e| e.to_string()),
        }
    }
}

/// Execute the assemble command
pub(super) async fn execute_assemble(
    kind: BundleKind,
    args: &Args,
    config: &RuntimeConfig,
) -> Result<i32> {
    let builder = args
        .descriptor_builder(kind)
        .ok_or_else(|| CliError::MissingArgument {
            argument: "<package> <executable>".to_string(),
        })?;
    let descriptor = builder.build()?;

    config.verbose_println(&format!(
        "Assembling {} into {}",
        descriptor.executable_path().display(),
        descriptor.bundle_path().display()
    ));

    // Warned up front so the lines survive a run that fails later.
    let warned: Vec<PathBuf> = resources::missing_resources(&descriptor)
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    for missing in &warned {
        config.warning_println(&format!("Could not find {}", missing.display()));
    }

    let mut assembler = Assembler::new(descriptor).render_policy(args.render_policy());
    if let Some(template) = &args.template {
        assembler = assembler.template(template);
    }

    let bundle = assembler.assemble().await?;

    if config.is_json() {
        let summary = BundleSummary::from(&bundle);
        let _ = config
            .output()
            .raw(&serde_json::to_string_pretty(&summary)?);
        return Ok(0);
    }

    print_summary(&bundle, &warned, config);
    Ok(0)
}

fn print_summary(bundle: &AssembledBundle, warned: &[PathBuf], config: &RuntimeConfig) {
    let report = &bundle.resources;

    // Resources removed along with a previous bundle go missing during the run.
    for missing in report.missing.iter().filter(|m| !warned.contains(*m)) {
        config.warning_println(&format!("Could not find {}", missing.display()));
    }
    for enclosing in &report.enclosing {
        config.warning_println(&format!(
            "Skipping {}: it contains the bundle",
            enclosing.display()
        ));
    }

    for rewrite in &report.rewrites {
        config.verbose_println(&format!(
            "{} -> {}: {}",
            rewrite.old_path, rewrite.new_path, rewrite.status
        ));
    }

    if let Some(e) = &bundle.manifest_error {
        config.error_println(&e.to_string());
    }

    config.success_println(&format!("Created {}", bundle.bundle_path.display()));
    config.indent(&format!(
        "{} resource{}, {} librar{}, {} missing",
        report.copied.len(),
        if report.copied.len() == 1 { "" } else { "s" },
        report.libraries.len(),
        if report.libraries.len() == 1 { "y" } else { "ies" },
        report.missing.len()
    ));
    if let Some(icon) = &report.icon {
        config.indent(&format!("icon: {}", icon));
    }
    if config.is_verbose() {
        for path in report.copied.iter().chain(&report.libraries) {
            config.indent(&path.display().to_string());
        }
    }
}
