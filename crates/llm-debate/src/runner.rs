//! Wires the command line and settings into one debate run.

use anyhow::{Context, Result};
use chrono::Local;
use coordination::debate::{default_basename, write_outputs};
use coordination::{
    build_provider, DebateOrchestrator, OutputPaths, Participant, PromptStyle, Stance,
    TemplateSet,
};
use tracing::{error, info};

use crate::cli::Args;
use crate::config::{resolve_template_dir, Settings};

/// Run the debate described by `args` and write both output files.
///
/// Templates and credentials are checked before the first model call. If
/// the debate fails, the error template is rendered to stdout and no file
/// is written.
pub async fn run(args: &Args, settings: &Settings) -> Result<OutputPaths> {
    let template_dir = resolve_template_dir(args.template_dir.as_deref());
    let templates = TemplateSet::load(&template_dir).context("failed to load templates")?;

    let for_backend = build_provider(args.llm_type, &settings.providers)
        .with_context(|| format!("cannot use {} for the \"for\" side", args.llm_type))?;
    let against_kind = args.against_provider();
    let against_backend = if against_kind == args.llm_type {
        for_backend.clone()
    } else {
        build_provider(against_kind, &settings.providers)
            .with_context(|| format!("cannot use {} for the \"against\" side", against_kind))?
    };

    let style = PromptStyle {
        cite_sources: args.cite_sources,
    };
    let for_side = Participant::new(
        Stance::For,
        args.model.clone(),
        args.topic.clone(),
        style.clone(),
        for_backend,
    );
    let against_side = Participant::new(
        Stance::Against,
        args.against_model_name(),
        args.topic.clone(),
        style,
        against_backend,
    );

    let debate_id = uuid::Uuid::new_v4().to_string();
    let mut debate =
        DebateOrchestrator::new(&debate_id, &args.topic, args.rounds, for_side, against_side)?
            .with_cite_sources(args.cite_sources);

    let transcript = match debate.run().await {
        Ok(transcript) => transcript,
        Err(err) => {
            error!(debate = %debate_id, "{}", err);
            println!("{}", templates.render_error(&args.topic, &err.to_string()));
            return Err(err).context("debate failed; no output written");
        }
    };

    let basename = args
        .output
        .clone()
        .unwrap_or_else(|| default_basename(&args.topic, Local::now()));
    let paths = write_outputs(&transcript, &templates, &args.output_dir, &basename)
        .await
        .context("failed to save debate results")?;

    info!("Debate results saved to JSON: {}", paths.json.display());
    info!("Debate results saved to HTML: {}", paths.html.display());
    Ok(paths)
}
