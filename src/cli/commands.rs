use tracing::{debug, info, instrument};

use crate::arena::SetTree;
use crate::cli::args::Cli;
use crate::cli::output;
use crate::config::Settings;
use crate::errors::AppResult;
use crate::template::{self, Dictionary, Variable, ROOT_KEY};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> AppResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let templates = if cli.templates.is_empty() {
        settings.templates.clone()
    } else {
        cli.templates.clone()
    };
    debug!(templates = templates.len(), "resolving templates");

    let dictionary = settings.dictionary();
    for (i, text) in templates.iter().enumerate() {
        if i > 0 {
            output::rule();
        }
        _resolve(text, &dictionary, cli.tree)?;
    }
    Ok(())
}

#[instrument(skip(dictionary))]
fn _resolve(text: &str, dictionary: &Dictionary, show_tree: bool) -> AppResult<()> {
    let mut tree = SetTree::new(Variable::new(ROOT_KEY, text));
    let root = tree.root();

    template::expand(&mut tree, root, dictionary)?;
    info!(depth = tree.height(root), "template expanded");
    output::header(&tree.display(root));
    if show_tree {
        println!("{}", tree.to_tree_string(root));
    }

    let resolved = template::build(&mut tree, root);
    output::action("resolved", &resolved);
    Ok(())
}
