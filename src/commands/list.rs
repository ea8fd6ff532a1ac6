use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::Result,
    file_uri,
    output::{print_json, print_sketch_tree},
};

/// List the sketches below `root`, or below the configured sketchbook
pub fn execute_list(options: &StoreOptions, root: Option<String>) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let root = root.as_deref().map(file_uri::parse).transpose()?;

    let container = store.get_sketches(root.as_ref())?;
    log::debug!("Discovered {} sketches", container.sketch_count());

    if options.json {
        return print_json(&container);
    }
    print_sketch_tree(&container);
    Ok(())
}
