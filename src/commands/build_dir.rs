use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::Result,
    file_uri,
    output::print_json,
};

/// Print the build folder assigned to the sketch at `sketch`
pub fn execute_build_dir(options: &StoreOptions, sketch: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketch = store.load_sketch(&file_uri::parse(sketch)?)?;

    if options.json {
        return print_json(&store.get_ide_temp_folder_uri(&sketch)?);
    }
    println!("{}", store.get_ide_temp_folder_path(&sketch)?.display());
    Ok(())
}
