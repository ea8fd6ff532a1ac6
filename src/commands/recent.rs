use crate::core::{
    command_init::{StoreInit, StoreOptions},
    error::Result,
    file_uri,
    output::{print_info, print_json, print_section_header, print_sketch_list, print_success},
};

/// Mark the sketch at `sketch` as recently opened
pub fn execute_open(options: &StoreOptions, sketch: &str) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let uri = file_uri::parse(sketch)?;

    let recorded = store.mark_as_recently_opened(&uri)?;
    let sketches = store.recently_opened_sketches(false)?;

    if options.json {
        return print_json(&sketches);
    }
    if !recorded {
        print_info(&format!(
            "{sketch} is not a sketch or is a temp sketch. Not recorded as recently opened"
        ));
        return Ok(());
    }
    print_success(&format!("Marked {sketch} as recently opened"));
    println!();
    Ok(())
}

/// Show the recently opened sketches, most recent first
pub fn execute_recent(options: &StoreOptions, refresh: bool) -> Result<()> {
    let store = StoreInit::initialize(options)?;
    let sketches = store.recently_opened_sketches(refresh)?;

    if options.json {
        return print_json(&sketches);
    }
    if sketches.is_empty() {
        print_info("No recently opened sketches");
        return Ok(());
    }
    print_section_header("Recently opened sketches");
    print_sketch_list(&sketches);
    Ok(())
}
