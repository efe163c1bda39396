//! Info command implementation
//!
//! Lists the letter catalog and the default style configuration.

use anyhow::Result;
use graff::prelude::*;

use crate::cli::InfoArgs;

pub fn run(args: &InfoArgs) -> Result<()> {
    let show_all = !args.catalog && !args.style_defaults;

    if show_all || args.catalog {
        println!("Graff v{}", env!("CARGO_PKG_VERSION"));
        println!();
        print_catalog(&AssetCatalog::builtin());
        if show_all {
            println!();
        }
    }

    if show_all || args.style_defaults {
        let defaults = serde_json::to_string_pretty(&StyleConfiguration::default())?;
        println!("{defaults}");
    }

    Ok(())
}

fn print_catalog(catalog: &AssetCatalog) {
    println!("Letters ({} drawings):", catalog.entries().count());
    for (key, file) in catalog.entries() {
        println!("  {:<12} {file}", key.to_string());
    }
}
