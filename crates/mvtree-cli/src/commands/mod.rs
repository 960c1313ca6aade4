//! Command dispatch and handler modules.

mod tree;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Tree {
            request,
            repo,
            verbose,
            tokens,
            include,
            why,
            format,
            output,
            conflicts,
        } => {
            tree::exec(tree::TreeOptions {
                request,
                repo,
                verbose,
                tokens,
                include,
                why,
                format,
                output,
                conflicts,
            })
            .await
        }
    }
}
