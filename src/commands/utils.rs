use crate::parser::FormatRegistry;
use crate::utils::config::{DEFAULT_NUM_IN_TOP, DEFAULT_ROUTE_MERGE_FACTOR, REPORT_VERSION};

/// Display the registered line formats
pub fn display_formats(show_templates: bool) {
    let registry = FormatRegistry::builtin();

    println!("Known log formats ({}):", registry.len());
    for (name, template) in registry.iter() {
        if show_templates {
            println!("  {}", name);
            println!("    {}", template);
        } else {
            println!("  {}", name);
        }
    }

    if !show_templates {
        println!("Use --show to print the templates");
    }
}

/// Display version information
pub fn display_version() {
    println!("loganalyzer v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_VERSION);
    println!(
        "Defaults: top {} | merge factor {}",
        DEFAULT_NUM_IN_TOP, DEFAULT_ROUTE_MERGE_FACTOR
    );
}
