//! Handler for `mvtree tree`.

use std::path::PathBuf;

use miette::Result;
use mvtree_core::artifact_filter::{ArtifactFilter, PatternArtifactFilter};
use mvtree_core::request::ResolutionRequest;
use mvtree_graph::filter::AncestorOrSelfFilter;
use mvtree_graph::json::JsonNode;
use mvtree_graph::traversal::{SerializingVisitor, TreeTokens};
use mvtree_graph::DependencyNode;
use mvtree_maven::LocalRepository;
use mvtree_resolver::Resolver;
use mvtree_util::errors::MvtreeError;

use crate::cli::OutputFormat;

/// Options for `mvtree tree`.
pub struct TreeOptions {
    pub request: PathBuf,
    pub repo: PathBuf,
    pub verbose: bool,
    pub tokens: String,
    pub include: Vec<String>,
    pub why: Option<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub conflicts: bool,
}

pub async fn exec(opts: TreeOptions) -> Result<()> {
    let mut request = ResolutionRequest::from_path(&opts.request)?;
    request.verbose |= opts.verbose;
    request.include.extend(opts.include);

    if !opts.repo.is_dir() {
        return Err(MvtreeError::Repository {
            message: format!("{} is not a directory", opts.repo.display()),
        }
        .into());
    }
    let tokens = TreeTokens::by_name(&opts.tokens).ok_or_else(|| MvtreeError::Generic {
        message: format!("unknown tree tokens `{}`", opts.tokens),
    })?;
    let why = opts
        .why
        .as_ref()
        .map(|pattern| PatternArtifactFilter::new([pattern]))
        .transpose()?;

    let repo = LocalRepository::new(&opts.repo);
    let resolution = Resolver::new(&repo).resolve(&request).await?;
    tracing::debug!(
        "resolved {} node(s), {} conflict(s)",
        resolution.tree.len(),
        resolution.conflicts.len()
    );

    let rendered = if opts.conflicts {
        resolution.conflicts.to_string()
    } else {
        let root = resolution.tree.root();
        let targets: Vec<DependencyNode<'_>> = match &why {
            Some(filter) => root
                .tree()
                .nodes()
                .filter(|n| !n.is_root() && filter.include(n.coordinate()))
                .collect(),
            None => Vec::new(),
        };
        if let (Some(pattern), true) = (&opts.why, targets.is_empty()) {
            println!("Dependency '{pattern}' not found in the graph.");
            return Ok(());
        }
        let filter = why.is_some().then(|| AncestorOrSelfFilter::new(targets));
        render(root, tokens, opts.format, filter)?
    };

    match &opts.output {
        Some(path) => tokio::fs::write(path, rendered)
            .await
            .map_err(MvtreeError::Io)?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn render(
    root: DependencyNode<'_>,
    tokens: TreeTokens,
    format: OutputFormat,
    filter: Option<AncestorOrSelfFilter<'_>>,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let view = match &filter {
                Some(f) => JsonNode::from_node_filtered(root, f),
                None => JsonNode::from_node(root),
            };
            let json = serde_json::to_string_pretty(&view).map_err(|e| MvtreeError::Generic {
                message: format!("Failed to serialize tree: {e}"),
            })?;
            Ok(format!("{json}\n"))
        }
        OutputFormat::Text => {
            let mut visitor = SerializingVisitor::new(Vec::new(), tokens);
            if let Some(f) = filter {
                visitor = visitor.with_filter(f);
            }
            root.accept(&mut visitor);
            let bytes = visitor.finish().map_err(MvtreeError::Io)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}
